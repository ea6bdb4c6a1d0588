//! Preliminary assessment and analysis result types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::interview::{fallback_follow_ups, Question};

/// Overall cardiovascular risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl RiskLevel {
    /// Parses `low`/`moderate`/`high`, ignoring case and whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "moderate" => Some(RiskLevel::Moderate),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How soon the patient should be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Routine,
    Urgent,
    Immediate,
}

impl Urgency {
    /// Parses `routine`/`urgent`/`immediate`, ignoring case and whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "routine" => Some(Urgency::Routine),
            "urgent" => Some(Urgency::Urgent),
            "immediate" => Some(Urgency::Immediate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Routine => "routine",
            Urgency::Urgent => "urgent",
            Urgency::Immediate => "immediate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Routine => "Routine",
            Urgency::Urgent => "Urgent",
            Urgency::Immediate => "Immediate",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage made from phase-one answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreliminaryAssessment {
    pub risk_level: RiskLevel,
    pub urgency: Urgency,
    pub key_findings: Vec<String>,
    pub areas_to_explore: Vec<String>,
}

/// Outcome of the phase-one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Proposed follow-up questions; may be empty.
    pub follow_up_questions: Vec<Question>,
    pub preliminary_assessment: PreliminaryAssessment,
    /// Free-text notes forwarded to the report request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
}

impl AnalysisResult {
    /// Follow-up questions for phase two, or the fallback set when none
    /// were proposed.
    pub fn phase_two_questions(&self) -> Vec<Question> {
        if self.follow_up_questions.is_empty() {
            fallback_follow_ups()
        } else {
            self.follow_up_questions.clone()
        }
    }
}
