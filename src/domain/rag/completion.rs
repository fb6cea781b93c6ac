//! Text completion boundary used by the pipeline stages

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Temperature every pipeline stage decodes with
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// A black-box text completion service
#[async_trait]
pub trait CompletionModel: Send + Sync + Debug {
    /// Complete `prompt` and return the model's raw reply text
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, DomainError>;
}
