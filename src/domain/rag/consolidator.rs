//! Knowledge consolidation across internal and external documents

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::completion::{CompletionModel, DETERMINISTIC_TEMPERATURE};
use super::config::{RagConfig, render_template};
use super::document::{Document, render_documents};
use super::parse::{ParseResult, parse_json};
use crate::domain::DomainError;

/// Label used when rendering documents into the consolidation prompt
const DOCUMENT_LABEL: &str = "Document";

/// Consistency group identifier as returned by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConsistencyGroup {
    Name(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for ConsistencyGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One entry of the consolidation reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConsolidatedEntry {
    pub content: String,
    pub source: Vec<String>,
    pub consistency_group: ConsistencyGroup,
}

impl ConsolidatedEntry {
    pub fn into_document(self) -> Document {
        Document::consolidated(
            &self.consistency_group.to_string(),
            self.content,
            self.source,
        )
    }
}

/// Parse a consolidation reply into its list of entries
pub fn parse_consolidation(response: &str) -> ParseResult<Vec<ConsolidatedEntry>> {
    parse_json(response)
}

/// Clusters agreeing documents and isolates conflicting ones
#[derive(Debug, Clone)]
pub struct KnowledgeConsolidator {
    model: Arc<dyn CompletionModel>,
    config: RagConfig,
}

impl KnowledgeConsolidator {
    pub fn new(model: Arc<dyn CompletionModel>, config: RagConfig) -> Self {
        Self { model, config }
    }

    fn build_prompt(&self, question: &str, documents: &[Document]) -> String {
        let context = render_documents(DOCUMENT_LABEL, documents);
        render_template(
            self.config.get_consolidation_prompt(),
            &[("question", question), ("context", &context)],
        )
    }

    /// Consolidate `documents` for `question`.
    ///
    /// A reply that does not parse as a list of consolidated entries returns
    /// `documents` unchanged.
    pub async fn consolidate(
        &self,
        question: &str,
        documents: &[Document],
    ) -> Result<Vec<Document>, DomainError> {
        let prompt = self.build_prompt(question, documents);
        let response = self
            .model
            .complete(&prompt, DETERMINISTIC_TEMPERATURE)
            .await?;

        match parse_consolidation(&response) {
            ParseResult::Parsed(entries) => {
                debug!(
                    "Consolidated {} documents into {} groups",
                    documents.len(),
                    entries.len()
                );
                Ok(entries
                    .into_iter()
                    .map(ConsolidatedEntry::into_document)
                    .collect())
            }
            ParseResult::Malformed { reason, .. } => {
                warn!(
                    "Malformed consolidation response, keeping {} unconsolidated documents: {}",
                    documents.len(),
                    reason
                );
                Ok(documents.to_vec())
            }
        }
    }
}
