//! Report module - The final triage report and its assembly.

mod assembler;
mod content;

pub use assembler::{
    assemble_report, decode_recommendations, decode_report, decode_risk_factors, decode_triage,
};
pub use content::{
    InterviewTranscript, PatientSummary, Recommendations, ReportContent, RiskFactor,
    RiskFactorAssessment, Severity, TranscriptEntry, TriageSummary, MISSING_CHIEF_COMPLAINT,
    MISSING_DURATION,
};
