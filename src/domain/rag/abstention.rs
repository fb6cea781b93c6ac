//! Detection of model abstention in generated internal knowledge

use std::fmt::Debug;

/// Phrase the generation prompt asks the model to use when unsure
pub const DEFAULT_ABSTENTION_PHRASE: &str = "I don't know";

/// Decides whether a generated passage is an abstention
pub trait AbstentionDetector: Send + Sync + Debug {
    fn is_abstention(&self, response: &str) -> bool;
}

/// Literal, case-sensitive substring match on a fixed phrase.
///
/// A reply that mentions the phrase in passing is still treated as an
/// abstention and discarded.
#[derive(Debug, Clone)]
pub struct PhraseAbstentionDetector {
    phrase: String,
}

impl PhraseAbstentionDetector {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

impl Default for PhraseAbstentionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ABSTENTION_PHRASE)
    }
}

impl AbstentionDetector for PhraseAbstentionDetector {
    fn is_abstention(&self, response: &str) -> bool {
        response.contains(&self.phrase)
    }
}
