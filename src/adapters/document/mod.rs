//! Document adapters - Rendering of the final report.
//!
//! - `MarkdownReportRenderer` - Markdown export handed to the cardiologist

mod markdown_renderer;

pub use markdown_renderer::{MarkdownReportRenderer, DISCLAIMER};
