//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language model providers (OpenAI, Azure OpenAI, Anthropic, mock)
//! - `storage` - Session snapshot stores (file, in-memory)
//! - `document` - Report rendering (Markdown)

pub mod ai;
pub mod document;
pub mod storage;

pub use ai::{
    AnthropicConfig, AnthropicProvider, MockAIProvider, OpenAIConfig, OpenAIProvider,
    RetryingAIProvider,
};
pub use document::MarkdownReportRenderer;
pub use storage::{FileSnapshotStore, InMemorySnapshotStore};
