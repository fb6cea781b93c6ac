//! Adapter from chat providers to the pipeline's completion boundary

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{ChatRequest, CompletionModel, DomainError, LlmProvider};

/// Sends each prompt as a single user turn to one model of a chat provider
#[derive(Debug, Clone)]
pub struct ProviderCompletionModel {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: Option<u32>,
}

impl ProviderCompletionModel {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionModel for ProviderCompletionModel {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, DomainError> {
        let request = ChatRequest::single_turn(self.model.as_str(), prompt, temperature)
            .with_max_tokens(self.max_tokens);

        let reply = self.provider.chat(&request).await?;

        if reply.is_truncated() {
            warn!(
                "{} reply was cut short ({:?})",
                self.provider.name(),
                reply.stop_reason
            );
        }
        debug!(
            "{} completion from {} ({} tokens)",
            self.provider.name(),
            reply.model,
            reply.usage.map(|u| u.total()).unwrap_or_default()
        );

        Ok(reply.text.trim().to_string())
    }
}
