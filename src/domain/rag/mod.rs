//! Astute RAG: reconciles the model's internal knowledge with retrieved
//! passages before answering.
//!
//! Stages run in order: [`InternalKnowledgeGenerator`],
//! [`KnowledgeConsolidator`], [`AnswerFinalizer`], wired together by
//! [`AstuteRagPipeline`].

mod abstention;
mod baseline;
mod completion;
mod config;
mod consolidator;
mod document;
mod finalizer;
mod generator;
mod parse;
mod pipeline;

pub use abstention::{AbstentionDetector, DEFAULT_ABSTENTION_PHRASE, PhraseAbstentionDetector};
pub use baseline::DirectAnswerer;
pub use completion::{CompletionModel, DETERMINISTIC_TEMPERATURE};
pub use config::{RagConfig, render_template};
pub use consolidator::{
    ConsistencyGroup, ConsolidatedEntry, KnowledgeConsolidator, parse_consolidation,
};
pub use document::{Document, DocumentOrigin, render_documents};
pub use finalizer::{AnswerFinalizer, FinalAnswer, FinalizationReply, parse_finalization};
pub use generator::InternalKnowledgeGenerator;
pub use parse::{ParseResult, parse_json};
pub use pipeline::{AstuteRagPipeline, PipelineOutcome};

#[cfg(test)]
pub use completion::mock::{PromptKind, RecordedCall, ScriptedCompletionModel};
