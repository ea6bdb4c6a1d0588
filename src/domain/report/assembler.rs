//! Report assembler.
//!
//! Combines the report payload with both transcripts. Every section falls
//! back to an empty or neutral value when the payload omits it.

use tracing::debug;

use super::content::{
    InterviewTranscript, PatientSummary, Recommendations, ReportContent, RiskFactor,
    RiskFactorAssessment, Severity, TranscriptEntry, TriageSummary,
};
use crate::domain::analysis::{RiskLevel, Urgency};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::interview::ResponseEntry;
use crate::domain::payload::{self, JsonObject, PayloadError};

/// Decodes raw completion text and assembles the report.
pub fn decode_report(
    text: &str,
    phase1: &[ResponseEntry],
    phase2: &[ResponseEntry],
    session_id: SessionId,
    now: Timestamp,
) -> Result<ReportContent, PayloadError> {
    let raw = payload::decode_object(text)?;
    Ok(assemble_report(&raw, phase1, phase2, session_id, now))
}

/// Assembles a report from a decoded payload. Never fails.
///
/// `now` is recorded as the interview date and completion time.
pub fn assemble_report(
    raw: &JsonObject,
    phase1: &[ResponseEntry],
    phase2: &[ResponseEntry],
    session_id: SessionId,
    now: Timestamp,
) -> ReportContent {
    let report = ReportContent {
        patient_summary: PatientSummary {
            session_id,
            interview_date: now.date_string(),
            completion_time: now.time_string(),
        },
        triage_summary: decode_triage(payload::object(raw, "triageSummary")),
        risk_factors: decode_risk_factors(payload::object(raw, "riskFactors")),
        key_findings: payload::string_list(raw, "keyFindings"),
        differential_considerations: payload::string_list(raw, "differentialConsiderations"),
        recommendations: decode_recommendations(payload::object(raw, "recommendations")),
        interview_transcript: InterviewTranscript {
            phase1: phase1.iter().map(TranscriptEntry::from).collect(),
            phase2: phase2.iter().map(TranscriptEntry::from).collect(),
        },
    };
    debug!(
        session_id = %session_id,
        urgency = %report.triage_summary.urgency_level,
        risk = %report.risk_factors.overall_risk_level,
        factors = report.risk_factors.identified_factors.len(),
        "report assembled"
    );
    report
}

pub fn decode_triage(raw: Option<&JsonObject>) -> TriageSummary {
    let Some(obj) = raw else {
        return TriageSummary::default();
    };
    let defaults = TriageSummary::default();
    TriageSummary {
        chief_complaint: payload::text(obj, "chiefComplaint").unwrap_or(defaults.chief_complaint),
        symptom_duration: payload::text(obj, "symptomDuration")
            .unwrap_or(defaults.symptom_duration),
        urgency_level: payload::text(obj, "urgencyLevel")
            .and_then(|v| Urgency::parse(&v))
            .unwrap_or_default(),
        urgency_rationale: payload::text(obj, "urgencyRationale").unwrap_or_default(),
    }
}

pub fn decode_risk_factors(raw: Option<&JsonObject>) -> RiskFactorAssessment {
    let Some(obj) = raw else {
        return RiskFactorAssessment::default();
    };
    let identified_factors = payload::array(obj, "identifiedFactors")
        .iter()
        .filter_map(|item| item.as_object())
        .filter_map(|factor| {
            let name = payload::text(factor, "name")?;
            Some(RiskFactor {
                name,
                present: payload::flag(factor, "present").unwrap_or(false),
                details: payload::text(factor, "details"),
                severity: payload::text(factor, "severity").and_then(|s| Severity::parse(&s)),
            })
        })
        .collect();
    RiskFactorAssessment {
        identified_factors,
        overall_risk_level: payload::text(obj, "overallRiskLevel")
            .and_then(|v| RiskLevel::parse(&v))
            .unwrap_or_default(),
        risk_rationale: payload::text(obj, "riskRationale").unwrap_or_default(),
    }
}

pub fn decode_recommendations(raw: Option<&JsonObject>) -> Recommendations {
    let Some(obj) = raw else {
        return Recommendations::default();
    };
    Recommendations {
        physical_exam_focus: payload::string_list(obj, "physicalExamFocus"),
        suggested_diagnostics: payload::string_list(obj, "suggestedDiagnostics"),
        areas_for_deeper_investigation: payload::string_list(obj, "areasForDeeperInvestigation"),
        additional_notes: payload::text(obj, "additionalNotes"),
    }
}
