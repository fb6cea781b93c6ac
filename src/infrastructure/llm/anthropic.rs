use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{
    ChatMessage, ChatReply, ChatRequest, ChatRole, DomainError, LlmProvider, StopReason,
    TokenUsage,
};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Used when the request sets no limit; the Messages API requires one
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    endpoint: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let endpoint = format!("{}/v1/messages", base_url.into().trim_end_matches('/'));

        Self {
            client,
            api_key: api_key.into(),
            endpoint,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, DomainError> {
        let body = serde_json::to_value(MessagesBody::from(request)).map_err(|e| {
            DomainError::internal(format!("Failed to encode Anthropic request: {}", e))
        })?;

        let headers = [
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", API_VERSION),
        ];
        let json = self
            .client
            .post_json(&self.endpoint, &headers, &body)
            .await
            .map_err(|e| e.into_domain(self.name()))?;

        let message: MessagesResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(self.name(), format!("Unexpected response shape: {}", e))
        })?;

        Ok(message.into_reply())
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

/// System turns travel in the top-level `system` field, joined by newlines
fn split_system(messages: &[ChatMessage]) -> (Option<String>, Vec<&ChatMessage>) {
    let (system, turns): (Vec<&ChatMessage>, Vec<&ChatMessage>) = messages
        .iter()
        .partition(|m| m.role == ChatRole::System);

    let system = (!system.is_empty()).then(|| {
        system
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    });

    (system, turns)
}

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Turn<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatRequest> for MessagesBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        let (system, turns) = split_system(&request.messages);

        Self {
            model: &request.model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system,
            messages: turns
                .into_iter()
                .map(|m| Turn {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn into_reply(self) -> ChatReply {
        let text: String = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        let mut reply = ChatReply::new(text, self.model);

        if let Some(reason) = self.stop_reason {
            reply = reply.with_stop_reason(stop_reason(&reason));
        }
        if let Some(usage) = self.usage {
            reply = reply.with_usage(TokenUsage::new(usage.input_tokens, usage.output_tokens));
        }

        reply
    }
}

fn stop_reason(reason: &str) -> StopReason {
    match reason {
        "end_turn" | "stop_sequence" => StopReason::Finished,
        "max_tokens" => StopReason::TokenLimit,
        other => StopReason::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

    fn message(blocks: serde_json::Value, stop_reason: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": blocks,
            "stop_reason": stop_reason,
            "usage": {"input_tokens": 12, "output_tokens": 10}
        })
    }

    fn text_message(text: &str, stop_reason: &str) -> serde_json::Value {
        message(serde_json::json!([{"type": "text", "text": text}]), stop_reason)
    }

    #[tokio::test]
    async fn test_chat_reply() {
        let client =
            MockHttpClient::new().with_json(ENDPOINT, text_message("Paris.", "end_turn"));
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        let reply = provider
            .chat(&ChatRequest::single_turn("claude-3-5-sonnet-20241022", "q", 0.0))
            .await
            .unwrap();

        assert_eq!(reply.text, "Paris.");
        assert_eq!(reply.stop_reason, Some(StopReason::Finished));
        assert_eq!(reply.usage, Some(TokenUsage::new(12, 10)));
    }

    #[tokio::test]
    async fn test_request_body_and_headers() {
        let client = MockHttpClient::new().with_json(ENDPOINT, text_message("ok", "end_turn"));
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        let request = ChatRequest::new(
            "claude-3-5-sonnet-20241022",
            vec![
                ChatMessage::system("System prompt 1"),
                ChatMessage::system("System prompt 2"),
                ChatMessage::user("Hello"),
            ],
            0.0,
        );
        provider.chat(&request).await.unwrap();

        let posted = provider.client.posted();
        assert_eq!(posted[0].header("x-api-key"), Some("sk-ant-test"));
        assert_eq!(posted[0].header("anthropic-version"), Some(API_VERSION));

        let body = &posted[0].body;
        assert_eq!(body["system"], "System prompt 1\nSystem prompt 2");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["temperature"], 0.0);
    }

    #[tokio::test]
    async fn test_no_system_field_without_system_turns() {
        let client = MockHttpClient::new().with_json(ENDPOINT, text_message("ok", "end_turn"));
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        provider
            .chat(&ChatRequest::single_turn("claude", "q", 0.0).with_max_tokens(Some(300)))
            .await
            .unwrap();

        let body = &provider.client.posted()[0].body;
        assert!(body.get("system").is_none());
        assert_eq!(body["max_tokens"], 300);
    }

    #[tokio::test]
    async fn test_text_blocks_are_joined_and_others_skipped() {
        let blocks = serde_json::json!([
            {"type": "text", "text": "Paris "},
            {"type": "tool_use", "id": "toolu_1", "name": "lookup", "input": {}},
            {"type": "text", "text": "is the capital."}
        ]);
        let client = MockHttpClient::new().with_json(ENDPOINT, message(blocks, "max_tokens"));
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        let reply = provider
            .chat(&ChatRequest::single_turn("claude", "q", 0.0))
            .await
            .unwrap();

        assert_eq!(reply.text, "Paris is the capital.");
        assert!(reply.is_truncated());
    }

    #[tokio::test]
    async fn test_http_error_is_attributed_to_anthropic() {
        let client = MockHttpClient::new().with_status(ENDPOINT, 529, "Overloaded");
        let provider = AnthropicProvider::new(client, "sk-ant-test");

        let error = provider
            .chat(&ChatRequest::single_turn("claude", "q", 0.0))
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Provider error: anthropic - HTTP 529: Overloaded"
        );
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let client = MockHttpClient::new().with_json(
            "http://localhost:8081/v1/messages",
            text_message("local", "end_turn"),
        );
        let provider = AnthropicProvider::with_base_url(client, "sk-ant-test", "http://localhost:8081");

        let reply = provider
            .chat(&ChatRequest::single_turn("claude", "q", 0.0))
            .await
            .unwrap();

        assert_eq!(reply.text, "local");
    }
}
