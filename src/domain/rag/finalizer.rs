//! Final answer generation from initial and consolidated context

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::completion::{CompletionModel, DETERMINISTIC_TEMPERATURE};
use super::config::{RagConfig, render_template};
use super::document::{Document, render_documents};
use super::parse::{ParseResult, parse_json};
use crate::domain::DomainError;

const INITIAL_LABEL: &str = "Initial Document";
const CONSOLIDATED_LABEL: &str = "Consolidated Document";

/// The structured finalization reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinalizationReply {
    pub answer: String,
    #[serde(default)]
    pub confidence: Option<serde_json::Value>,
}

impl FinalizationReply {
    /// Confidence as text; non-string values keep their JSON form
    pub fn confidence_text(&self) -> Option<String> {
        match &self.confidence {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Parse a finalization reply
pub fn parse_finalization(response: &str) -> ParseResult<FinalizationReply> {
    parse_json(response)
}

/// The pipeline's answer with the model's confidence judgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalAnswer {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    /// False when the reply was not structured and is returned verbatim
    pub structured: bool,
}

impl FinalAnswer {
    fn from_reply(response: String, parsed: ParseResult<FinalizationReply>) -> Self {
        match parsed {
            ParseResult::Parsed(reply) => Self {
                confidence: reply.confidence_text(),
                answer: reply.answer,
                structured: true,
            },
            ParseResult::Malformed { reason, .. } => {
                warn!("Malformed finalization response, using raw text: {}", reason);
                Self {
                    answer: response,
                    confidence: None,
                    structured: false,
                }
            }
        }
    }
}

/// Produces the final answer from both document sets
#[derive(Debug, Clone)]
pub struct AnswerFinalizer {
    model: Arc<dyn CompletionModel>,
    config: RagConfig,
}

impl AnswerFinalizer {
    pub fn new(model: Arc<dyn CompletionModel>, config: RagConfig) -> Self {
        Self { model, config }
    }

    fn build_prompt(
        &self,
        question: &str,
        initial_docs: &[Document],
        consolidated_docs: &[Document],
    ) -> String {
        let initial_context = render_documents(INITIAL_LABEL, initial_docs);
        let consolidated_context = render_documents(CONSOLIDATED_LABEL, consolidated_docs);

        render_template(
            self.config.get_finalization_prompt(),
            &[
                ("question", question),
                ("initial_context", &initial_context),
                ("consolidated_context", &consolidated_context),
            ],
        )
    }

    /// Answer `question` from both document sets.
    ///
    /// An unstructured reply becomes the answer verbatim.
    pub async fn finalize(
        &self,
        question: &str,
        initial_docs: &[Document],
        consolidated_docs: &[Document],
    ) -> Result<FinalAnswer, DomainError> {
        let prompt = self.build_prompt(question, initial_docs, consolidated_docs);
        let response = self
            .model
            .complete(&prompt, DETERMINISTIC_TEMPERATURE)
            .await?;

        let parsed = parse_finalization(&response);
        let answer = FinalAnswer::from_reply(response, parsed);

        debug!(
            "Finalized answer (structured={}, confidence={:?})",
            answer.structured, answer.confidence
        );

        Ok(answer)
    }
}
