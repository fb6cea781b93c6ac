//! Internal knowledge generation

use std::sync::Arc;

use tracing::debug;

use super::abstention::{AbstentionDetector, PhraseAbstentionDetector};
use super::completion::{CompletionModel, DETERMINISTIC_TEMPERATURE};
use super::config::{RagConfig, render_template};
use super::document::Document;
use crate::domain::DomainError;

/// Asks the model for a passage from its own memorized knowledge
#[derive(Debug, Clone)]
pub struct InternalKnowledgeGenerator {
    model: Arc<dyn CompletionModel>,
    detector: Arc<dyn AbstentionDetector>,
    config: RagConfig,
}

impl InternalKnowledgeGenerator {
    /// Create a generator using a phrase detector built from `config`
    pub fn new(model: Arc<dyn CompletionModel>, config: RagConfig) -> Self {
        let detector = Arc::new(PhraseAbstentionDetector::new(
            config.abstention_phrase.clone(),
        ));

        Self {
            model,
            detector,
            config,
        }
    }

    /// Replace the abstention predicate
    pub fn with_detector(mut self, detector: Arc<dyn AbstentionDetector>) -> Self {
        self.detector = detector;
        self
    }

    fn build_prompt(&self, question: &str) -> String {
        render_template(
            self.config.get_generation_prompt(),
            &[
                ("question", question),
                ("abstention_phrase", &self.config.abstention_phrase),
            ],
        )
    }

    /// Generate zero or one internal document for `question`.
    ///
    /// Model failures propagate; an abstaining reply yields no document.
    pub async fn generate(&self, question: &str) -> Result<Vec<Document>, DomainError> {
        let prompt = self.build_prompt(question);
        let response = self
            .model
            .complete(&prompt, DETERMINISTIC_TEMPERATURE)
            .await?;

        if self.detector.is_abstention(&response) {
            debug!("Model abstained from internal knowledge generation");
            return Ok(Vec::new());
        }

        debug!("Generated internal passage ({} chars)", response.len());
        Ok(vec![Document::internal(response)])
    }
}
