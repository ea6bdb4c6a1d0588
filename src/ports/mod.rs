//! Ports - Interfaces for external collaborators.
//!
//! - `AIProvider` - language model completions
//! - `SnapshotStore` - interview snapshot persistence
//! - `ReportRenderer` - report document rendering

mod ai_provider;
mod report_renderer;
mod snapshot_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use report_renderer::{
    report_file_name, RenderError, RenderOptions, RenderedReport, ReportRenderer,
};
pub use snapshot_store::{SessionSnapshot, SnapshotError, SnapshotStore};
