//! Answer values and the per-session answer store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::question::Question;

/// Reserved prefix marking a free-text "other" entry.
///
/// `other:my words` means the patient picked "other" and typed `my words`.
pub const OTHER_PREFIX: &str = "other:";

/// Separator used when a multi-valued answer is shown as one string.
pub const DISPLAY_SEPARATOR: &str = ", ";

/// The value recorded for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Text, single choice or scale value.
    Single(String),
    /// Ordered selections of a multiselect question.
    Multiple(Vec<String>),
}

impl Answer {
    pub fn single(value: impl Into<String>) -> Self {
        Answer::Single(value.into())
    }

    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Multiple(values.into_iter().map(Into::into).collect())
    }

    /// True for a blank string or an empty selection.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Single(value) => value.trim().is_empty(),
            Answer::Multiple(values) => values.is_empty(),
        }
    }

    /// Single display string; selections are joined with `", "`.
    pub fn to_display_string(&self) -> String {
        match self {
            Answer::Single(value) => value.clone(),
            Answer::Multiple(values) => values.join(DISPLAY_SEPARATOR),
        }
    }

    /// Human-readable form using the question's option labels.
    ///
    /// Option values are replaced by their labels and "other" entries are
    /// shown as `Other: <text>`. Values the question does not know are kept.
    pub fn describe(&self, question: &Question) -> String {
        let label = |value: &str| -> String {
            if let Some(text) = other_text(value) {
                return format!("Other: {}", text);
            }
            question
                .option_label(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string())
        };
        match self {
            Answer::Single(value) => label(value),
            Answer::Multiple(values) => values
                .iter()
                .map(|v| label(v))
                .collect::<Vec<_>>()
                .join(DISPLAY_SEPARATOR),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Single(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(values: Vec<String>) -> Self {
        Answer::Multiple(values)
    }
}

/// Encodes free text as an "other" entry.
pub fn other_entry(text: &str) -> String {
    format!("{}{}", OTHER_PREFIX, text)
}

/// Returns the user text of an "other" entry, if the value is one.
pub fn other_text(value: &str) -> Option<&str> {
    value.strip_prefix(OTHER_PREFIX)
}

/// Mapping from question identifier to answer.
///
/// Identifiers are not checked against any catalog, so answers for
/// questions this build does not know are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore(BTreeMap<String, Answer>);

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the answer for a question.
    pub fn set(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.0.insert(question_id.into(), answer);
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.0.get(question_id)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<Answer> {
        self.0.remove(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Answer)> {
        self.0.iter()
    }

    /// True if the question is optional or has a non-empty answer.
    pub fn satisfies(&self, question: &Question) -> bool {
        if !question.required {
            return true;
        }
        self.get(&question.id).is_some_and(|a| !a.is_empty())
    }
}

impl FromIterator<(String, Answer)> for AnswerStore {
    fn from_iter<T: IntoIterator<Item = (String, Answer)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interview::question::{QuestionCategory, QuestionOption, QuestionType};

    fn history_question() -> Question {
        Question::new(
            "cardiac_history",
            QuestionCategory::MedicalHistory,
            "Treated before?",
            QuestionType::Multiselect,
        )
        .with_options(vec![
            QuestionOption::new("mi", "Heart attack"),
            QuestionOption::new("afib", "Atrial fibrillation"),
        ])
        .with_other(None)
    }

    #[test]
    fn blank_single_answer_is_empty() {
        assert!(Answer::single("   ").is_empty());
        assert!(!Answer::single(" x ").is_empty());
    }

    #[test]
    fn empty_selection_is_empty() {
        assert!(Answer::Multiple(vec![]).is_empty());
        assert!(!Answer::multiple(["mi"]).is_empty());
    }

    #[test]
    fn multiple_answers_join_with_comma() {
        let answer = Answer::multiple(["mi", "afib"]);
        assert_eq!(answer.to_display_string(), "mi, afib");
    }

    #[test]
    fn other_entry_round_trips() {
        let encoded = other_entry("myocarditis");
        assert_eq!(encoded, "other:myocarditis");
        assert_eq!(other_text(&encoded), Some("myocarditis"));
        assert_eq!(other_text("mi"), None);
    }

    #[test]
    fn describe_uses_labels_and_other_text() {
        let answer = Answer::multiple(["mi", "other:myocarditis", "unknown_value"]);
        assert_eq!(
            answer.describe(&history_question()),
            "Heart attack, Other: myocarditis, unknown_value"
        );
    }

    #[test]
    fn optional_question_is_always_satisfied() {
        let question = history_question().with_required(false);
        assert!(AnswerStore::new().satisfies(&question));
    }

    #[test]
    fn required_question_needs_non_empty_answer() {
        let question = history_question();
        let mut store = AnswerStore::new();
        assert!(!store.satisfies(&question));

        store.set("cardiac_history", Answer::Multiple(vec![]));
        assert!(!store.satisfies(&question));

        store.set("cardiac_history", Answer::multiple(["mi"]));
        assert!(store.satisfies(&question));
    }

    #[test]
    fn set_overwrites_previous_answer() {
        let mut store = AnswerStore::new();
        store.set("q", Answer::single("a"));
        store.set("q", Answer::single("b"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("q"), Some(&Answer::single("b")));
    }

    #[test]
    fn answers_serialize_untagged() {
        let mut store = AnswerStore::new();
        store.set("a", Answer::single("yes"));
        store.set("b", Answer::multiple(["x", "y"]));
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json, serde_json::json!({"a": "yes", "b": ["x", "y"]}));

        let back: AnswerStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }
}
