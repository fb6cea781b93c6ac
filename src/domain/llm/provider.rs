use std::fmt::Debug;

use async_trait::async_trait;

use super::{ChatReply, ChatRequest};
use crate::domain::DomainError;

/// A hosted chat model API
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, DomainError>;

    /// Short lowercase name used in logs and error messages
    fn name(&self) -> &'static str;
}
