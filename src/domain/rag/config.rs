//! Astute RAG prompt configuration

use serde::{Deserialize, Serialize};

use super::abstention::DEFAULT_ABSTENTION_PHRASE;

/// Prompt templates and abstention settings for the pipeline stages.
///
/// Templates use `${name}` placeholders. Unset templates fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Phrase the model is told to use when it does not know the answer
    #[serde(default = "default_abstention_phrase")]
    pub abstention_phrase: String,
    /// Placeholders: `${question}`, `${abstention_phrase}`
    #[serde(default)]
    pub generation_prompt: Option<String>,
    /// Placeholders: `${question}`, `${context}`
    #[serde(default)]
    pub consolidation_prompt: Option<String>,
    /// Placeholders: `${question}`, `${initial_context}`, `${consolidated_context}`
    #[serde(default)]
    pub finalization_prompt: Option<String>,
    /// Placeholders: `${question}`
    #[serde(default)]
    pub direct_answer_prompt: Option<String>,
}

fn default_abstention_phrase() -> String {
    DEFAULT_ABSTENTION_PHRASE.to_string()
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            abstention_phrase: default_abstention_phrase(),
            generation_prompt: None,
            consolidation_prompt: None,
            finalization_prompt: None,
            direct_answer_prompt: None,
        }
    }
}

impl RagConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_abstention_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.abstention_phrase = phrase.into();
        self
    }

    pub fn with_generation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.generation_prompt = Some(prompt.into());
        self
    }

    pub fn with_consolidation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.consolidation_prompt = Some(prompt.into());
        self
    }

    pub fn with_finalization_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.finalization_prompt = Some(prompt.into());
        self
    }

    pub fn with_direct_answer_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.direct_answer_prompt = Some(prompt.into());
        self
    }

    pub fn default_generation_prompt() -> &'static str {
        r#"Generate a document that provides accurate and relevant information to answer the given question. If the information is unclear or uncertain, explicitly state '${abstention_phrase}' to avoid any hallucinations.

Question: ${question}
Document:"#
    }

    pub fn default_consolidation_prompt() -> &'static str {
        r#"Task: Consolidate information from both memorized documents and externally retrieved documents in response to the given question.

For documents that provide consistent information, cluster them together.
For documents with conflicting information, separate them into distinct documents.
Exclude any irrelevant information.

Question: ${question}
Context: ${context}

Provide consolidated documents in JSON format:
[{"content": "consolidated content", "source": ["doc_ids"], "consistency_group": "group_id"}]"#
    }

    pub fn default_finalization_prompt() -> &'static str {
        r#"Task: Answer the question using consolidated information from both internal and external documents.

Initial Context: ${initial_context}

Consolidated Context: ${consolidated_context}

Question: ${question}

Provide your answer in the format:
{
    "answer": "final answer",
    "confidence": "confidence score and reasoning"
}"#
    }

    pub fn default_direct_answer_prompt() -> &'static str {
        "Answer this question: ${question}"
    }

    pub fn get_generation_prompt(&self) -> &str {
        self.generation_prompt
            .as_deref()
            .unwrap_or(Self::default_generation_prompt())
    }

    pub fn get_consolidation_prompt(&self) -> &str {
        self.consolidation_prompt
            .as_deref()
            .unwrap_or(Self::default_consolidation_prompt())
    }

    pub fn get_finalization_prompt(&self) -> &str {
        self.finalization_prompt
            .as_deref()
            .unwrap_or(Self::default_finalization_prompt())
    }

    pub fn get_direct_answer_prompt(&self) -> &str {
        self.direct_answer_prompt
            .as_deref()
            .unwrap_or(Self::default_direct_answer_prompt())
    }
}

/// Substitute `${name}` placeholders in a single pass.
///
/// Substituted values are not scanned again, so a question containing
/// `${context}` stays literal. Unknown placeholders are left as written.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
