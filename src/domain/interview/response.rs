//! Response projection: answers plus question metadata into transcript entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::answer::AnswerStore;
use super::question::{Question, QuestionCategory};
use crate::domain::foundation::{SessionId, Timestamp, ValidationError};

/// Interview phase a response belongs to.
///
/// Serialized as the number `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    pub fn number(&self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.number()
    }
}

impl TryFrom<u8> for Phase {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Phase::One),
            2 => Ok(Phase::Two),
            other => Err(ValidationError::out_of_range("phase", 1, 2, i64::from(other))),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// One answered question, denormalized for transcripts and requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub session_id: SessionId,
    pub phase: Phase,
    pub question_id: String,
    pub question_text: String,
    pub category: QuestionCategory,
    /// Answer as one display string; selections joined with `", "`.
    pub answer: String,
    pub created_at: Timestamp,
}

/// Projects the answers of one phase into ordered response entries.
///
/// One entry per question that has an answer, in question-list order.
/// Questions without an answer are skipped.
pub fn project_responses(
    phase: Phase,
    questions: &[Question],
    answers: &AnswerStore,
    session_id: SessionId,
    now: Timestamp,
) -> Vec<ResponseEntry> {
    questions
        .iter()
        .filter_map(|question| {
            answers.get(&question.id).map(|answer| ResponseEntry {
                session_id,
                phase,
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                category: question.category,
                answer: answer.to_display_string(),
                created_at: now,
            })
        })
        .collect()
}

/// Re-derives answer strings keyed by question id.
pub fn answers_by_question(entries: &[ResponseEntry]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|e| (e.question_id.clone(), e.answer.clone()))
        .collect()
}
