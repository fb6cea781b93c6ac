//! Chat provider adapters over HTTP

mod anthropic;
mod completion;
mod factory;
mod http_client;
mod openai;

pub use anthropic::AnthropicProvider;
pub use completion::ProviderCompletionModel;
pub use factory::LlmProviderFactory;
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use openai::OpenAiProvider;
