use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{
    ChatReply, ChatRequest, DomainError, LlmProvider, StopReason, TokenUsage,
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible chat completions API
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    endpoint: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Target a compatible server, e.g. a local proxy
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let endpoint = format!(
            "{}/v1/chat/completions",
            base_url.into().trim_end_matches('/')
        );

        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            endpoint,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, DomainError> {
        let body = serde_json::to_value(CompletionBody::from(request)).map_err(|e| {
            DomainError::internal(format!("Failed to encode OpenAI request: {}", e))
        })?;

        let headers = [("Authorization", self.auth_header.as_str())];
        let json = self
            .client
            .post_json(&self.endpoint, &headers, &body)
            .await
            .map_err(|e| e.into_domain(self.name()))?;

        let completion: Completion = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(self.name(), format!("Unexpected response shape: {}", e))
        })?;

        completion.into_reply()
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatRequest> for CompletionBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    model: String,
    choices: Vec<Choice>,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl Completion {
    fn into_reply(self) -> Result<ChatReply, DomainError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "Response contained no choices"))?;

        let mut reply = ChatReply::new(choice.message.content.unwrap_or_default(), self.model);

        if let Some(reason) = choice.finish_reason {
            reply = reply.with_stop_reason(finish_reason(&reason));
        }
        if let Some(usage) = self.usage {
            reply = reply.with_usage(TokenUsage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(reply)
    }
}

fn finish_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::Finished,
        "length" => StopReason::TokenLimit,
        "content_filter" => StopReason::ContentFilter,
        other => StopReason::Other(other.to_string()),
    }
}
