//! Astute RAG
//!
//! Answers questions by reconciling a language model's internal knowledge
//! with externally retrieved passages:
//! - internal knowledge generation with explicit abstention
//! - consolidation of agreeing and conflicting documents
//! - final answer with a confidence judgment
//! - OpenAI and Anthropic chat providers

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{AstuteRagPipeline, CompletionModel, DomainError, PipelineOutcome};

use std::sync::Arc;

use infrastructure::llm::{LlmProviderFactory, ProviderCompletionModel};
use infrastructure::logging;

/// Load `.env` and layered configuration, then install logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Create the completion model described by the `llm` config section
pub fn create_completion_model(config: &AppConfig) -> anyhow::Result<Arc<dyn CompletionModel>> {
    let provider = LlmProviderFactory::from_config(&config.llm)?;
    let model = ProviderCompletionModel::new(provider, config.llm.model.clone())
        .with_max_tokens(config.llm.max_tokens);

    Ok(Arc::new(model))
}

/// Create a pipeline backed by the configured provider
pub fn create_pipeline(config: &AppConfig) -> anyhow::Result<AstuteRagPipeline> {
    let model = create_completion_model(config)?;
    Ok(AstuteRagPipeline::new(model, config.rag.clone()))
}
