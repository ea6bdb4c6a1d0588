//! Question definitions shared by the catalog and the follow-up phase.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Clinical area a question belongs to.
///
/// Declaration order is the fixed category order used when grouping
/// answers for the analysis request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    #[default]
    ChiefComplaint,
    RiskFactors,
    MedicalHistory,
    Medications,
    Lifestyle,
    FunctionalStatus,
}

impl QuestionCategory {
    /// All categories in their fixed order.
    pub const ALL: [QuestionCategory; 6] = [
        QuestionCategory::ChiefComplaint,
        QuestionCategory::RiskFactors,
        QuestionCategory::MedicalHistory,
        QuestionCategory::Medications,
        QuestionCategory::Lifestyle,
        QuestionCategory::FunctionalStatus,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::ChiefComplaint => "chief_complaint",
            QuestionCategory::RiskFactors => "risk_factors",
            QuestionCategory::MedicalHistory => "medical_history",
            QuestionCategory::Medications => "medications",
            QuestionCategory::Lifestyle => "lifestyle",
            QuestionCategory::FunctionalStatus => "functional_status",
        }
    }

    /// Parses a wire name; unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Human-readable section title.
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionCategory::ChiefComplaint => "Chief complaint",
            QuestionCategory::RiskFactors => "Risk factors",
            QuestionCategory::MedicalHistory => "Medical history",
            QuestionCategory::Medications => "Medications",
            QuestionCategory::Lifestyle => "Lifestyle",
            QuestionCategory::FunctionalStatus => "Functional status",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input widget kind for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Short free text.
    #[default]
    Text,
    /// Long free text.
    Textarea,
    /// Single choice from a list.
    Select,
    /// Any number of choices from a list.
    Multiselect,
    /// Single exclusive choice, shown expanded.
    Radio,
    /// Numeric scale.
    Scale,
}

impl QuestionType {
    /// Parses a wire name; unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(QuestionType::Text),
            "textarea" => Some(QuestionType::Textarea),
            "select" => Some(QuestionType::Select),
            "multiselect" => Some(QuestionType::Multiselect),
            "radio" => Some(QuestionType::Radio),
            "scale" => Some(QuestionType::Scale),
            _ => None,
        }
    }

    /// Returns true if the type is unusable without options.
    pub fn requires_options(&self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::Multiselect | QuestionType::Radio
        )
    }

    /// Returns true if a free-text "other" entry may be attached.
    pub fn supports_other(&self) -> bool {
        matches!(self, QuestionType::Radio | QuestionType::Multiselect)
    }
}

/// One selectable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

impl QuestionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Bounds and end labels of a numeric scale question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: i32,
    pub max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_label: Option<String>,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            min_label: None,
            max_label: None,
        }
    }
}

/// A single interview question.
///
/// # Invariants
///
/// - `id` and `text` are non-empty
/// - select / multiselect / radio questions carry at least one option
/// - `allow_other` is only set on radio or multiselect questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: QuestionCategory,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_other: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleRange>,
}

impl Question {
    /// Creates a required question without options.
    pub fn new(
        id: impl Into<String>,
        category: QuestionCategory,
        text: impl Into<String>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            text: text.into(),
            question_type,
            options: Vec::new(),
            required: true,
            allow_other: false,
            placeholder: None,
            help_text: None,
            other_placeholder: None,
            scale: None,
        }
    }

    /// Sets the option list.
    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Enables the free-text "other" extension.
    pub fn with_other(mut self, placeholder: Option<String>) -> Self {
        self.allow_other = true;
        self.other_placeholder = placeholder;
        self
    }

    /// Sets the input placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the help text shown under the question.
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Sets the scale bounds.
    pub fn with_scale(mut self, scale: ScaleRange) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Looks up the label for an option value.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Checks the structural invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        if self.question_type.requires_options() && self.options.is_empty() {
            return Err(ValidationError::invalid_format(
                "options",
                format!("question '{}' needs at least one option", self.id),
            ));
        }
        if self.allow_other && !self.question_type.supports_other() {
            return Err(ValidationError::invalid_format(
                "allow_other",
                format!(
                    "question '{}' is {:?}; only radio and multiselect accept 'other'",
                    self.id, self.question_type
                ),
            ));
        }
        if let Some(scale) = &self.scale {
            if scale.min >= scale.max {
                return Err(ValidationError::invalid_format(
                    "scale",
                    format!("min {} must be below max {}", scale.min, scale.max),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no() -> Vec<QuestionOption> {
        vec![QuestionOption::new("yes", "Yes"), QuestionOption::new("no", "No")]
    }

    #[test]
    fn category_order_matches_declaration() {
        let mut shuffled = vec![
            QuestionCategory::Lifestyle,
            QuestionCategory::ChiefComplaint,
            QuestionCategory::FunctionalStatus,
            QuestionCategory::Medications,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                QuestionCategory::ChiefComplaint,
                QuestionCategory::Medications,
                QuestionCategory::Lifestyle,
                QuestionCategory::FunctionalStatus,
            ]
        );
    }

    #[test]
    fn category_parse_round_trips_wire_names() {
        for category in QuestionCategory::ALL {
            assert_eq!(QuestionCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(QuestionCategory::parse("cardiology"), None);
    }

    #[test]
    fn question_type_parse_rejects_unknown() {
        assert_eq!(QuestionType::parse("multiselect"), Some(QuestionType::Multiselect));
        assert_eq!(QuestionType::parse("checkbox"), None);
    }

    #[test]
    fn radio_with_options_is_valid() {
        let q = Question::new("q", QuestionCategory::RiskFactors, "Smoker?", QuestionType::Radio)
            .with_options(yes_no());
        assert!(q.validate().is_ok());
    }

    #[test]
    fn choice_types_without_options_are_rejected() {
        for kind in [QuestionType::Select, QuestionType::Multiselect, QuestionType::Radio] {
            let q = Question::new("q", QuestionCategory::ChiefComplaint, "Pick", kind);
            let err = q.validate().unwrap_err();
            assert_eq!(err.field(), "options");
        }
    }

    #[test]
    fn other_extension_only_allowed_on_radio_and_multiselect() {
        let select = Question::new("q", QuestionCategory::ChiefComplaint, "Pick", QuestionType::Select)
            .with_options(yes_no())
            .with_other(None);
        assert_eq!(select.validate().unwrap_err().field(), "allow_other");

        let multi = Question::new("q", QuestionCategory::ChiefComplaint, "Pick", QuestionType::Multiselect)
            .with_options(yes_no())
            .with_other(Some("Other...".to_string()));
        assert!(multi.validate().is_ok());
    }

    #[test]
    fn blank_text_is_rejected() {
        let q = Question::new("q", QuestionCategory::Lifestyle, "  ", QuestionType::Text);
        assert_eq!(q.validate().unwrap_err().field(), "text");
    }

    #[test]
    fn inverted_scale_is_rejected() {
        let q = Question::new("stress", QuestionCategory::Lifestyle, "Stress?", QuestionType::Scale)
            .with_scale(ScaleRange {
                min: 10,
                max: 1,
                ..ScaleRange::default()
            });
        assert_eq!(q.validate().unwrap_err().field(), "scale");
    }

    #[test]
    fn option_label_lookup() {
        let q = Question::new("q", QuestionCategory::RiskFactors, "Smoker?", QuestionType::Radio)
            .with_options(yes_no());
        assert_eq!(q.option_label("no"), Some("No"));
        assert_eq!(q.option_label("maybe"), None);
    }

    #[test]
    fn question_type_serializes_under_type_key() {
        let q = Question::new("q", QuestionCategory::Lifestyle, "Diet?", QuestionType::Textarea);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "textarea");
        assert_eq!(json["category"], "lifestyle");
        assert!(json.get("options").is_none());
    }
}
