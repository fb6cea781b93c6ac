//! Chat model boundary shared by every provider

mod chat;
mod provider;

pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatRole, StopReason, TokenUsage};
pub use provider::LlmProvider;

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
