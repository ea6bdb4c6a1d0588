//! Final report structure.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{RiskLevel, Urgency};
use crate::domain::foundation::SessionId;
use crate::domain::interview::{QuestionCategory, ResponseEntry};

/// Shown when the report omits the chief complaint.
pub const MISSING_CHIEF_COMPLAINT: &str = "Not provided";
/// Shown when the report omits the symptom duration.
pub const MISSING_DURATION: &str = "Unspecified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub session_id: SessionId,
    /// `YYYY-MM-DD`, taken when the report is assembled.
    pub interview_date: String,
    /// `HH:MM:SS` UTC, taken when the report is assembled.
    pub completion_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageSummary {
    pub chief_complaint: String,
    pub symptom_duration: String,
    pub urgency_level: Urgency,
    pub urgency_rationale: String,
}

impl Default for TriageSummary {
    fn default() -> Self {
        Self {
            chief_complaint: MISSING_CHIEF_COMPLAINT.to_string(),
            symptom_duration: MISSING_DURATION.to_string(),
            urgency_level: Urgency::default(),
            urgency_rationale: String::new(),
        }
    }
}

/// How pronounced a risk factor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mild" => Some(Severity::Mild),
            "moderate" => Some(Severity::Moderate),
            "severe" => Some(Severity::Severe),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorAssessment {
    pub identified_factors: Vec<RiskFactor>,
    pub overall_risk_level: RiskLevel,
    pub risk_rationale: String,
}

impl RiskFactorAssessment {
    /// Factors the report marks as present.
    pub fn present_factors(&self) -> impl Iterator<Item = &RiskFactor> {
        self.identified_factors.iter().filter(|f| f.present)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub physical_exam_focus: Vec<String>,
    pub suggested_diagnostics: Vec<String>,
    pub areas_for_deeper_investigation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.physical_exam_focus.is_empty()
            && self.suggested_diagnostics.is_empty()
            && self.areas_for_deeper_investigation.is_empty()
            && self.additional_notes.is_none()
    }
}

/// One question/answer pair of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
    pub category: QuestionCategory,
}

impl From<&ResponseEntry> for TranscriptEntry {
    fn from(entry: &ResponseEntry) -> Self {
        Self {
            question_id: entry.question_id.clone(),
            question_text: entry.question_text.clone(),
            answer: entry.answer.clone(),
            category: entry.category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewTranscript {
    pub phase1: Vec<TranscriptEntry>,
    pub phase2: Vec<TranscriptEntry>,
}

/// The complete triage report handed to the cardiologist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContent {
    pub patient_summary: PatientSummary,
    pub triage_summary: TriageSummary,
    pub risk_factors: RiskFactorAssessment,
    pub key_findings: Vec<String>,
    pub differential_considerations: Vec<String>,
    pub recommendations: Recommendations,
    pub interview_transcript: InterviewTranscript,
}
