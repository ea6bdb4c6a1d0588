//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for the supported LLM providers.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat completions, also used for Azure OpenAI
//! - `AnthropicProvider` - Anthropic Claude models
//! - `RetryingAIProvider` - Wrapper retrying transient failures with backoff
//!
//! [`build_provider`] selects and wraps the backend named in the configuration.

mod anthropic_provider;
mod factory;
mod mock_provider;
mod openai_provider;
mod retry_provider;

pub use anthropic_provider::{
    AnthropicConfig, AnthropicProvider, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL,
};
pub use factory::build_provider;
pub use mock_provider::{MockAIProvider, MockResponse, DEFAULT_MOCK_CONTENT};
pub use openai_provider::{
    OpenAIConfig, OpenAIProvider, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
pub use retry_provider::{RetryingAIProvider, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
