//! Report Renderer Port - Document rendering interface.
//!
//! This port defines the contract for turning a finished [`ReportContent`]
//! into an exportable document. Adapters (like MarkdownReportRenderer)
//! provide the implementation.

use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::report::ReportContent;

/// Port for rendering a triage report.
///
/// # Contract
///
/// Implementations must:
/// - Show only risk factors marked present
/// - Omit optional sections that have no content
/// - Keep transcripts in their recorded order
///
/// # Usage
///
/// ```rust,ignore
/// let renderer: &dyn ReportRenderer = get_renderer();
/// let document = renderer.render(&report, &RenderOptions::full())?;
/// tokio::fs::write(dir.join(&document.file_name), &document.content).await?;
/// ```
pub trait ReportRenderer: Send + Sync {
    /// Render the report into a document.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the report cannot be rendered.
    fn render(
        &self,
        report: &ReportContent,
        options: &RenderOptions,
    ) -> Result<RenderedReport, RenderError>;
}

/// Options for report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append the question/answer transcripts of both phases.
    pub include_transcript: bool,

    /// Append the disclaimer footer.
    pub include_disclaimer: bool,
}

impl RenderOptions {
    /// Everything, as handed to the cardiologist.
    pub fn full() -> Self {
        Self {
            include_transcript: true,
            include_disclaimer: true,
        }
    }

    /// Assessment sections only, for on-screen previews.
    pub fn summary() -> Self {
        Self {
            include_transcript: false,
            include_disclaimer: false,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::full()
    }
}

/// A rendered document ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    /// Suggested file name, e.g. `cardiology-report-1a2b3c4d.md`.
    pub file_name: String,

    /// MIME type of `content`.
    pub media_type: &'static str,

    pub content: String,
}

/// Suggested file name for a report document.
pub fn report_file_name(session_id: &SessionId, extension: &str) -> String {
    format!("cardiology-report-{}.{}", session_id.short(), extension)
}

/// Errors that can occur during report rendering.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Missing required data for rendering.
    #[error("Missing required data: {field}")]
    MissingData { field: String },

    /// Internal rendering error.
    #[error("Rendering failed: {0}")]
    Internal(String),
}

impl RenderError {
    pub fn missing_data(field: impl Into<String>) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_short_session_id() {
        let id: SessionId = "1a2b3c4d-0000-4000-8000-000000000000".parse().unwrap();
        assert_eq!(report_file_name(&id, "md"), "cardiology-report-1a2b3c4d.md");
    }

    #[test]
    fn summary_drops_transcript_and_disclaimer() {
        let options = RenderOptions::summary();
        assert!(!options.include_transcript);
        assert!(!options.include_disclaimer);
        assert_eq!(RenderOptions::default(), RenderOptions::full());
    }

    #[test]
    fn missing_data_display() {
        let err = RenderError::missing_data("triage_summary");
        assert_eq!(err.to_string(), "Missing required data: triage_summary");
    }
}
