use serde::{Deserialize, Serialize};

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}

/// A chat completion request addressed to one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            max_tokens: None,
        }
    }

    /// A request whose only turn is `prompt` from the user
    pub fn single_turn(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self::new(model, vec![ChatMessage::user(prompt)], temperature)
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Why the model stopped producing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Finished,
    TokenLimit,
    ContentFilter,
    Other(String),
}

impl StopReason {
    /// The reply was cut short and may not be a complete answer
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TokenLimit | Self::ContentFilter)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// The text a provider returned for a [`ChatRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    /// Model that actually served the request, as reported by the provider
    pub model: String,
    pub stop_reason: Option<StopReason>,
    pub usage: Option<TokenUsage>,
}

impl ChatReply {
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            stop_reason: None,
            usage: None,
        }
    }

    pub fn with_stop_reason(mut self, reason: StopReason) -> Self {
        self.stop_reason = Some(reason);
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn is_truncated(&self) -> bool {
        self.stop_reason
            .as_ref()
            .is_some_and(StopReason::is_truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_turn_request() {
        let request = ChatRequest::single_turn("gpt-4", "Capital of France?", 0.0);

        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.messages, vec![ChatMessage::user("Capital of France?")]);
        assert_eq!(request.temperature, 0.0);
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn test_max_tokens_only_serialized_when_set() {
        let request = ChatRequest::single_turn("gpt-4", "Hi", 0.0);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");

        let json = serde_json::to_value(request.with_max_tokens(Some(64))).unwrap();
        assert_eq!(json["max_tokens"], 64);
    }

    #[test]
    fn test_truncation() {
        let reply = ChatReply::new("Paris is", "gpt-4");
        assert!(!reply.is_truncated());

        let reply = reply.with_stop_reason(StopReason::TokenLimit);
        assert!(reply.is_truncated());

        assert!(!StopReason::Finished.is_truncated());
        assert!(!StopReason::Other("tool_use".to_string()).is_truncated());
    }

    #[test]
    fn test_usage_total() {
        assert_eq!(TokenUsage::new(12, 30).total(), 42);
    }
}
