//! Interview module - The two-phase patient interview.
//!
//! Questions, answers, the session state machine and the projection of
//! answers into transcript entries.

mod answer;
mod catalog;
mod demographics;
mod errors;
mod fallback;
mod question;
mod response;
mod session;
mod status;

pub use answer::{other_entry, other_text, Answer, AnswerStore, DISPLAY_SEPARATOR, OTHER_PREFIX};
pub use catalog::{CatalogError, QuestionCatalog};
pub use demographics::{Demographics, Sex, AGE_LIMIT, MIN_AGE};
pub use errors::{truncate_diagnostic, InterviewError, MAX_DIAGNOSTIC_CHARS};
pub use fallback::{fallback_follow_ups, FALLBACK_QUESTION_COUNT};
pub use question::{Question, QuestionCategory, QuestionOption, QuestionType, ScaleRange};
pub use response::{answers_by_question, project_responses, Phase, ResponseEntry};
pub use session::{InterviewEvent, InterviewSession};
pub use status::InterviewStatus;
