//! Generic follow-up questions used when the analysis proposes none.

use super::question::{Question, QuestionCategory, QuestionOption, QuestionType};

/// Number of questions in the fallback set.
pub const FALLBACK_QUESTION_COUNT: usize = 3;

/// Returns the fixed fallback follow-up set.
pub fn fallback_follow_ups() -> Vec<Question> {
    vec![
        Question::new(
            "followup_clarification",
            QuestionCategory::ChiefComplaint,
            "Are there any additional symptoms you would like to report?",
            QuestionType::Textarea,
        )
        .with_required(false)
        .with_placeholder("Describe any additional symptoms..."),
        Question::new(
            "followup_recent_changes",
            QuestionCategory::ChiefComplaint,
            "Have your symptoms changed over the last few days?",
            QuestionType::Radio,
        )
        .with_options(vec![
            QuestionOption::new("improved", "They have improved"),
            QuestionOption::new("same", "They are the same"),
            QuestionOption::new("worsened", "They have worsened"),
        ]),
        Question::new(
            "followup_concerns",
            QuestionCategory::ChiefComplaint,
            "What worries you most about your heart health?",
            QuestionType::Textarea,
        )
        .with_required(false)
        .with_placeholder("Describe your concerns..."),
    ]
}
