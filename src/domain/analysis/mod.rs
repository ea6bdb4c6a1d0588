//! Analysis module - Phase-one analysis results.
//!
//! Holds the preliminary assessment vocabulary and the merger that turns
//! the language model's analysis payload into phase-two questions.

mod assessment;
mod merger;

pub use assessment::{AnalysisResult, PreliminaryAssessment, RiskLevel, Urgency};
pub use merger::{decode_analysis, decode_assessment, decode_follow_ups, merge_analysis};
