use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::http_client::HttpClient;
use super::{AnthropicProvider, OpenAiProvider};
use crate::config::{LlmConfig, LlmProviderKind};
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the provider described by `config`.
    ///
    /// The api key comes from the config, falling back to the provider's
    /// environment variable.
    pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = Self::resolve_api_key(config, |var| std::env::var(var).ok())?;

        let http_client = match config.timeout_secs {
            Some(secs) => HttpClient::with_timeout(Duration::from_secs(secs))?,
            None => HttpClient::new(),
        };

        info!(
            "Using {:?} provider with model {}",
            config.provider, config.model
        );

        let provider: Arc<dyn LlmProvider> = match (config.provider, &config.base_url) {
            (LlmProviderKind::OpenAi, Some(base_url)) => {
                Arc::new(OpenAiProvider::with_base_url(http_client, api_key, base_url))
            }
            (LlmProviderKind::OpenAi, None) => Arc::new(OpenAiProvider::new(http_client, api_key)),
            (LlmProviderKind::Anthropic, Some(base_url)) => Arc::new(
                AnthropicProvider::with_base_url(http_client, api_key, base_url),
            ),
            (LlmProviderKind::Anthropic, None) => {
                Arc::new(AnthropicProvider::new(http_client, api_key))
            }
        };

        Ok(provider)
    }

    fn resolve_api_key(
        config: &LlmConfig,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<String, DomainError> {
        if let Some(key) = config.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }

        let var = config.provider.api_key_env_var();
        lookup_env(var).filter(|k| !k.is_empty()).ok_or_else(|| {
            DomainError::configuration(format!(
                "No api key configured: set llm.api_key or {}",
                var
            ))
        })
    }

    /// Create an OpenAI provider directly
    pub fn create_openai(api_key: impl Into<String>) -> Arc<dyn LlmProvider> {
        Arc::new(OpenAiProvider::new(HttpClient::new(), api_key))
    }

    /// Create an OpenAI provider with custom base URL
    pub fn create_openai_with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Arc<dyn LlmProvider> {
        Arc::new(OpenAiProvider::with_base_url(
            HttpClient::new(),
            api_key,
            base_url,
        ))
    }

    /// Create an Anthropic provider directly
    pub fn create_anthropic(api_key: impl Into<String>) -> Arc<dyn LlmProvider> {
        Arc::new(AnthropicProvider::new(HttpClient::new(), api_key))
    }
}
