//! Retrieval-free baseline answers, for comparison with the pipeline

use std::sync::Arc;

use super::completion::{CompletionModel, DETERMINISTIC_TEMPERATURE};
use super::config::{RagConfig, render_template};
use crate::domain::DomainError;

/// Answers straight from the model, with no retrieved context
#[derive(Debug, Clone)]
pub struct DirectAnswerer {
    model: Arc<dyn CompletionModel>,
    config: RagConfig,
}

impl DirectAnswerer {
    pub fn new(model: Arc<dyn CompletionModel>, config: RagConfig) -> Self {
        Self { model, config }
    }

    pub async fn answer(&self, question: &str) -> Result<String, DomainError> {
        let prompt = render_template(
            self.config.get_direct_answer_prompt(),
            &[("question", question)],
        );

        self.model
            .complete(&prompt, DETERMINISTIC_TEMPERATURE)
            .await
    }
}
