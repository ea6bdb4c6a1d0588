//! Markdown report renderer adapter.
//!
//! Renders the final triage report as a Markdown document for the
//! cardiologist. Sections without content are left out, risk factors are
//! listed only when marked present, and transcripts keep their recorded
//! order.

use std::fmt::Write as _;

use crate::domain::report::{ReportContent, RiskFactor, TranscriptEntry};
use crate::ports::{report_file_name, RenderError, RenderOptions, RenderedReport, ReportRenderer};

/// Footer appended when `RenderOptions::include_disclaimer` is set.
pub const DISCLAIMER: &str = "This report is informational only. It does not replace a medical \
examination or a medical diagnosis.";

const TITLE: &str = "Cardiology Pre-Visit Triage Report";

/// Markdown implementation of [`ReportRenderer`].
#[derive(Debug, Clone, Default)]
pub struct MarkdownReportRenderer;

impl MarkdownReportRenderer {
    pub fn new() -> Self {
        Self
    }

    fn header(&self, out: &mut String, report: &ReportContent) -> std::fmt::Result {
        let summary = &report.patient_summary;
        writeln!(out, "# {}", TITLE)?;
        writeln!(out)?;
        writeln!(out, "- **Session:** {}", summary.session_id.short())?;
        writeln!(out, "- **Date:** {}", summary.interview_date)?;
        writeln!(out, "- **Time:** {}", summary.completion_time)?;
        writeln!(out)
    }

    fn triage(&self, out: &mut String, report: &ReportContent) -> std::fmt::Result {
        let triage = &report.triage_summary;
        writeln!(out, "## Triage Summary")?;
        writeln!(out)?;
        writeln!(out, "**Urgency:** {}", triage.urgency_level.label())?;
        writeln!(out)?;
        writeln!(out, "- **Chief complaint:** {}", triage.chief_complaint)?;
        writeln!(out, "- **Symptom duration:** {}", triage.symptom_duration)?;
        if !triage.urgency_rationale.is_empty() {
            writeln!(out, "- **Urgency rationale:** {}", triage.urgency_rationale)?;
        }
        writeln!(out)
    }

    fn risk_factors(&self, out: &mut String, report: &ReportContent) -> std::fmt::Result {
        let risk = &report.risk_factors;
        writeln!(out, "## Cardiovascular Risk Factors")?;
        writeln!(out)?;
        writeln!(out, "**Overall risk:** {}", risk.overall_risk_level.label())?;
        writeln!(out)?;
        if !risk.risk_rationale.is_empty() {
            writeln!(out, "{}", risk.risk_rationale)?;
            writeln!(out)?;
        }

        let present: Vec<&RiskFactor> = risk.present_factors().collect();
        if !present.is_empty() {
            writeln!(out, "### Identified factors")?;
            writeln!(out)?;
            for factor in present {
                write!(out, "- **{}**", factor.name)?;
                if let Some(severity) = factor.severity {
                    write!(out, " ({})", severity.label())?;
                }
                if let Some(details) = &factor.details {
                    write!(out, ": {}", details)?;
                }
                writeln!(out)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn bullet_section(&self, out: &mut String, heading: &str, items: &[String]) -> std::fmt::Result {
        if items.is_empty() {
            return Ok(());
        }
        writeln!(out, "{}", heading)?;
        writeln!(out)?;
        for item in items {
            writeln!(out, "- {}", item)?;
        }
        writeln!(out)
    }

    fn recommendations(&self, out: &mut String, report: &ReportContent) -> std::fmt::Result {
        let recs = &report.recommendations;
        if recs.is_empty() {
            return Ok(());
        }
        writeln!(out, "## Recommendations for the Physician")?;
        writeln!(out)?;
        self.bullet_section(out, "### Physical examination focus", &recs.physical_exam_focus)?;
        self.bullet_section(out, "### Suggested diagnostics", &recs.suggested_diagnostics)?;
        self.bullet_section(
            out,
            "### Topics for a deeper conversation",
            &recs.areas_for_deeper_investigation,
        )?;
        if let Some(notes) = &recs.additional_notes {
            writeln!(out, "### Additional notes")?;
            writeln!(out)?;
            writeln!(out, "{}", notes)?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn transcript_phase(
        &self,
        out: &mut String,
        heading: &str,
        entries: &[TranscriptEntry],
    ) -> std::fmt::Result {
        if entries.is_empty() {
            return Ok(());
        }
        writeln!(out, "{}", heading)?;
        writeln!(out)?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(out, "{}. **{}**", i + 1, entry.question_text)?;
            writeln!(out, "   Answer: {}", entry.answer)?;
        }
        writeln!(out)
    }

    fn transcript(&self, out: &mut String, report: &ReportContent) -> std::fmt::Result {
        let transcript = &report.interview_transcript;
        if transcript.phase1.is_empty() && transcript.phase2.is_empty() {
            return Ok(());
        }
        writeln!(out, "## Interview Transcript")?;
        writeln!(out)?;
        self.transcript_phase(out, "### Phase 1: Initial interview", &transcript.phase1)?;
        self.transcript_phase(out, "### Phase 2: Follow-up questions", &transcript.phase2)
    }

    fn write_document(
        &self,
        out: &mut String,
        report: &ReportContent,
        options: &RenderOptions,
    ) -> std::fmt::Result {
        self.header(out, report)?;
        self.triage(out, report)?;
        self.risk_factors(out, report)?;
        self.bullet_section(out, "## Key Findings", &report.key_findings)?;
        self.bullet_section(
            out,
            "## Differential Considerations",
            &report.differential_considerations,
        )?;
        self.recommendations(out, report)?;
        if options.include_transcript {
            self.transcript(out, report)?;
        }
        if options.include_disclaimer {
            writeln!(out, "---")?;
            writeln!(out)?;
            writeln!(out, "*{}*", DISCLAIMER)?;
        }
        Ok(())
    }
}

impl ReportRenderer for MarkdownReportRenderer {
    fn render(
        &self,
        report: &ReportContent,
        options: &RenderOptions,
    ) -> Result<RenderedReport, RenderError> {
        let mut content = String::new();
        self.write_document(&mut content, report, options)
            .map_err(|e| RenderError::Internal(e.to_string()))?;

        Ok(RenderedReport {
            file_name: report_file_name(&report.patient_summary.session_id, "md"),
            media_type: "text/markdown",
            content,
        })
    }
}
