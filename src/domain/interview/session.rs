//! Interview session state and its transition function.
//!
//! The session is a plain value. Every change goes through
//! [`InterviewSession::apply`], which takes the current state and an
//! [`InterviewEvent`] and returns the next state without touching the
//! original. Validation of external input happens when events are built,
//! so `apply` itself never reads the clock or generates ids.

use serde::{Deserialize, Serialize};

use super::answer::{Answer, AnswerStore};
use super::demographics::Demographics;
use super::errors::InterviewError;
use super::fallback::fallback_follow_ups;
use super::question::Question;
use super::response::{project_responses, Phase, ResponseEntry};
use super::status::InterviewStatus;
use crate::domain::analysis::AnalysisResult;
use crate::domain::foundation::{PatientId, SessionId, StateMachine, Timestamp};
use crate::domain::report::ReportContent;

/// Something that happened to the interview.
#[derive(Debug, Clone, PartialEq)]
pub enum InterviewEvent {
    /// A new interview begins. Build with [`InterviewEvent::started`].
    Started {
        session_id: SessionId,
        patient_id: PatientId,
        demographics: Demographics,
        at: Timestamp,
    },

    AnswerRecorded {
        question_id: String,
        answer: Answer,
    },

    Advanced,

    Retreated,

    Phase1Completed,

    /// Follow-ups arrived. An empty `questions` list selects the fallback set.
    AnalysisReceived {
        questions: Vec<Question>,
        analysis: AnalysisResult,
    },

    Phase2Completed,

    ReportReceived(Box<ReportContent>),

    /// An outstanding call failed; carries the message shown to the user.
    Failed(String),

    Reset,
}

impl InterviewEvent {
    /// Validates start parameters and assigns a fresh session id.
    ///
    /// # Errors
    ///
    /// - `Validation` if the patient id is blank after trimming
    pub fn started(patient_id: &str, demographics: Demographics) -> Result<Self, InterviewError> {
        Ok(InterviewEvent::Started {
            session_id: SessionId::new(),
            patient_id: PatientId::new(patient_id)?,
            demographics,
            at: Timestamp::now(),
        })
    }

    /// Event for receiving an analysis, proposing its own follow-ups.
    pub fn analysis_received(analysis: AnalysisResult) -> Self {
        InterviewEvent::AnalysisReceived {
            questions: analysis.follow_up_questions.clone(),
            analysis,
        }
    }

    pub fn answer(question_id: impl Into<String>, answer: impl Into<Answer>) -> Self {
        InterviewEvent::AnswerRecorded {
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            InterviewEvent::Started { .. } => "started",
            InterviewEvent::AnswerRecorded { .. } => "answer_recorded",
            InterviewEvent::Advanced => "advanced",
            InterviewEvent::Retreated => "retreated",
            InterviewEvent::Phase1Completed => "phase1_completed",
            InterviewEvent::AnalysisReceived { .. } => "analysis_received",
            InterviewEvent::Phase2Completed => "phase2_completed",
            InterviewEvent::ReportReceived(_) => "report_received",
            InterviewEvent::Failed(_) => "failed",
            InterviewEvent::Reset => "reset",
        }
    }
}

/// State of one patient interview.
///
/// # Invariants
///
/// - `current_index` is 0 or a valid index into the active phase's list
/// - `phase2_questions` is empty until an analysis has been received
/// - `session_id` is set whenever `status` is not `Idle`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSession {
    session_id: Option<SessionId>,
    patient_id: Option<PatientId>,
    demographics: Option<Demographics>,
    status: InterviewStatus,
    current_index: usize,
    phase1_questions: Vec<Question>,
    phase2_questions: Vec<Question>,
    answers: AnswerStore,
    analysis: Option<AnalysisResult>,
    report: Option<ReportContent>,
    error: Option<String>,
    started_at: Option<Timestamp>,
}

impl InterviewSession {
    /// Creates an idle session over the given phase-one questions.
    pub fn new(phase1_questions: Vec<Question>) -> Self {
        Self {
            session_id: None,
            patient_id: None,
            demographics: None,
            status: InterviewStatus::Idle,
            current_index: 0,
            phase1_questions,
            phase2_questions: Vec::new(),
            answers: AnswerStore::new(),
            analysis: None,
            report: None,
            error: None,
            started_at: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn patient_id(&self) -> Option<&PatientId> {
        self.patient_id.as_ref()
    }

    pub fn demographics(&self) -> Option<&Demographics> {
        self.demographics.as_ref()
    }

    pub fn status(&self) -> InterviewStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase1_questions(&self) -> &[Question] {
        &self.phase1_questions
    }

    pub fn phase2_questions(&self) -> &[Question] {
        &self.phase2_questions
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn report(&self) -> Option<&ReportContent> {
        self.report.as_ref()
    }

    /// Message of the last failure, cleared when the interview moves on.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Phase whose questions are on screen (or awaited) in this status.
    pub fn active_phase(&self) -> Option<Phase> {
        match self.status {
            InterviewStatus::Idle => None,
            InterviewStatus::Phase1 | InterviewStatus::Analyzing => Some(Phase::One),
            InterviewStatus::Phase2
            | InterviewStatus::GeneratingReport
            | InterviewStatus::Completed => Some(Phase::Two),
        }
    }

    /// Questions of the active phase.
    pub fn current_phase_questions(&self) -> &[Question] {
        match self.active_phase() {
            Some(Phase::One) => &self.phase1_questions,
            Some(Phase::Two) => &self.phase2_questions,
            None => &[],
        }
    }

    pub fn total_questions(&self) -> usize {
        self.current_phase_questions().len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_phase_questions().get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.total_questions()
    }

    /// True if the current question may be left.
    ///
    /// Optional questions always pass; required ones need a non-blank
    /// string or a non-empty selection. False when there is no question.
    pub fn is_current_answered(&self) -> bool {
        self.current_question()
            .is_some_and(|question| self.answers.satisfies(question))
    }

    /// Transcript entries for one phase.
    pub fn responses(&self, phase: Phase, now: Timestamp) -> Vec<ResponseEntry> {
        let Some(session_id) = self.session_id else {
            return Vec::new();
        };
        let questions = match phase {
            Phase::One => &self.phase1_questions,
            Phase::Two => &self.phase2_questions,
        };
        project_responses(phase, questions, &self.answers, session_id, now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Computes the state that follows `event`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the event is not allowed in the current status
    pub fn apply(&self, event: InterviewEvent) -> Result<Self, InterviewError> {
        let mut next = self.clone();
        match event {
            InterviewEvent::Started {
                session_id,
                patient_id,
                demographics,
                at,
            } => {
                // Restarting overwrites whatever was in progress.
                next = Self::new(self.phase1_questions.clone());
                next.session_id = Some(session_id);
                next.patient_id = Some(patient_id);
                next.demographics = Some(demographics);
                next.started_at = Some(at);
                next.status = InterviewStatus::Phase1;
            }

            InterviewEvent::AnswerRecorded {
                question_id,
                answer,
            } => {
                if self.status.is_terminal() {
                    return Err(InterviewError::InvalidState {
                        action: "record an answer",
                        status: self.status,
                    });
                }
                next.answers.set(question_id, answer);
            }

            InterviewEvent::Advanced => {
                if self.current_index + 1 < self.total_questions() {
                    next.current_index += 1;
                }
            }

            InterviewEvent::Retreated => {
                next.current_index = self.current_index.saturating_sub(1);
            }

            InterviewEvent::Phase1Completed => {
                next.status = self
                    .status
                    .transition_to(InterviewStatus::Analyzing)
                    .map_err(|e| InterviewError::invalid_transition("complete phase one", e))?;
                next.error = None;
            }

            InterviewEvent::AnalysisReceived {
                questions,
                analysis,
            } => {
                next.status = self
                    .status
                    .transition_to(InterviewStatus::Phase2)
                    .map_err(|e| InterviewError::invalid_transition("receive an analysis", e))?;
                next.phase2_questions = if questions.is_empty() {
                    fallback_follow_ups()
                } else {
                    questions
                };
                next.analysis = Some(analysis);
                next.current_index = 0;
                next.error = None;
            }

            InterviewEvent::Phase2Completed => {
                next.status = self
                    .status
                    .transition_to(InterviewStatus::GeneratingReport)
                    .map_err(|e| InterviewError::invalid_transition("complete phase two", e))?;
                next.error = None;
            }

            InterviewEvent::ReportReceived(report) => {
                next.status = self
                    .status
                    .transition_to(InterviewStatus::Completed)
                    .map_err(|e| InterviewError::invalid_transition("receive a report", e))?;
                next.report = Some(*report);
                next.error = None;
            }

            InterviewEvent::Failed(message) => {
                // Answers stay so the phase can be resubmitted as-is.
                if let Some(target) = self.status.revert_target() {
                    next.status = target;
                }
                next.error = Some(message);
            }

            InterviewEvent::Reset => {
                next = Self::new(self.phase1_questions.clone());
            }
        }
        Ok(next)
    }
}
