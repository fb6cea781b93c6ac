//! Domain layer - Core business logic and entities

pub mod error;
pub mod llm;
pub mod rag;

pub use error::DomainError;
pub use llm::{ChatMessage, ChatReply, ChatRequest, ChatRole, LlmProvider, StopReason, TokenUsage};
pub use rag::{
    AbstentionDetector, AnswerFinalizer, AstuteRagPipeline, CompletionModel, DirectAnswerer,
    Document, DocumentOrigin, FinalAnswer, InternalKnowledgeGenerator, KnowledgeConsolidator,
    ParseResult, PipelineOutcome, RagConfig,
};
