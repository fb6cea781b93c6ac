//! Document model shared by every pipeline stage

use serde::{Deserialize, Serialize};

/// Where a document's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    /// Generated from the model's own parametric knowledge
    Internal,
    /// Supplied by the upstream retrieval step
    External,
    /// Produced by the consolidation step from one or more documents
    Consolidated,
}

impl DocumentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Consolidated => "consolidated",
        }
    }
}

impl std::fmt::Display for DocumentOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable passage together with its provenance.
///
/// Fields are only reachable through accessors; stages build new values
/// instead of editing existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    doc_id: String,
    content: String,
    origin: DocumentOrigin,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merged_from: Vec<String>,
}

impl Document {
    /// The passage generated from internal knowledge (there is at most one per run)
    pub fn internal(content: impl Into<String>) -> Self {
        Self {
            doc_id: "internal_0".to_string(),
            content: content.into(),
            origin: DocumentOrigin::Internal,
            merged_from: Vec::new(),
        }
    }

    /// A retrieved passage at position `index` of the caller's list
    pub fn external(index: usize, content: impl Into<String>) -> Self {
        Self {
            doc_id: format!("external_{}", index),
            content: content.into(),
            origin: DocumentOrigin::External,
            merged_from: Vec::new(),
        }
    }

    /// A consolidated document for one consistency group.
    ///
    /// Duplicate origin ids are dropped, keeping first-seen order.
    pub fn consolidated<I, S>(group: &str, content: impl Into<String>, merged_from: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for id in merged_from {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Self {
            doc_id: format!("consolidated_{}", group),
            content: content.into(),
            origin: DocumentOrigin::Consolidated,
            merged_from: ids,
        }
    }

    /// Wrap retrieved passages as external documents, preserving order
    pub fn from_passages<I, S>(passages: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        passages
            .into_iter()
            .enumerate()
            .map(|(i, passage)| Self::external(i, passage))
            .collect()
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> DocumentOrigin {
        self.origin
    }

    pub fn merged_from(&self) -> &[String] {
        &self.merged_from
    }

    /// Provenance label used in prompts: the origin for source documents,
    /// the comma-joined origin ids for consolidated ones
    pub fn source_label(&self) -> String {
        match self.origin {
            DocumentOrigin::Consolidated => self.merged_from.join(","),
            origin => origin.as_str().to_string(),
        }
    }

    /// `"<label> <index> (<source>): <content>"`
    pub fn render(&self, label: &str, index: usize) -> String {
        format!(
            "{} {} ({}): {}",
            label,
            index,
            self.source_label(),
            self.content
        )
    }
}

/// Render a document list for a prompt, one entry per paragraph
pub fn render_documents(label: &str, documents: &[Document]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| doc.render(label, i))
        .collect::<Vec<_>>()
        .join("\n\n")
}
