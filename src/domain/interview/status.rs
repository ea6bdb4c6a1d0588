//! Interview status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of an interview session.
///
/// ```text
/// idle -> phase1 -> analyzing -> phase2 -> generating_report -> completed
///           ^          |            ^              |
///           +----------+            +--------------+
///            (failure)               (failure)
/// ```
///
/// Start and reset are handled by the session itself: they overwrite the
/// status from any state rather than walking the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    /// No interview started.
    #[default]
    Idle,

    /// Answering the fixed catalog.
    Phase1,

    /// Waiting for the follow-up analysis.
    Analyzing,

    /// Answering follow-up questions.
    Phase2,

    /// Waiting for the final report.
    GeneratingReport,

    /// Report received.
    Completed,
}

impl InterviewStatus {
    /// Returns true while an external call is outstanding.
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            InterviewStatus::Analyzing | InterviewStatus::GeneratingReport
        )
    }

    /// Returns true if a question screen is shown in this status.
    pub fn is_answering(&self) -> bool {
        matches!(self, InterviewStatus::Phase1 | InterviewStatus::Phase2)
    }

    /// Status to fall back to when the outstanding call fails.
    pub fn revert_target(&self) -> Option<InterviewStatus> {
        match self {
            InterviewStatus::Analyzing => Some(InterviewStatus::Phase1),
            InterviewStatus::GeneratingReport => Some(InterviewStatus::Phase2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Idle => "idle",
            InterviewStatus::Phase1 => "phase1",
            InterviewStatus::Analyzing => "analyzing",
            InterviewStatus::Phase2 => "phase2",
            InterviewStatus::GeneratingReport => "generating_report",
            InterviewStatus::Completed => "completed",
        }
    }
}

impl StateMachine for InterviewStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InterviewStatus::*;
        matches!(
            (self, target),
            (Idle, Phase1)
                | (Phase1, Analyzing)
                | (Analyzing, Phase2)
                | (Analyzing, Phase1)
                | (Phase2, GeneratingReport)
                | (GeneratingReport, Completed)
                | (GeneratingReport, Phase2)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InterviewStatus::*;
        match self {
            Idle => vec![Phase1],
            Phase1 => vec![Analyzing],
            Analyzing => vec![Phase2, Phase1],
            Phase2 => vec![GeneratingReport],
            GeneratingReport => vec![Completed, Phase2],
            Completed => vec![],
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
