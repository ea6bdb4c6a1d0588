//! Analysis result merger.
//!
//! Turns the untrusted analysis payload into canonical follow-up questions
//! and a preliminary assessment. Each section is decoded on its own and
//! falls back to defaults; only a payload that is not a JSON object fails.

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use super::assessment::{AnalysisResult, PreliminaryAssessment, RiskLevel, Urgency};
use crate::domain::interview::{Question, QuestionCategory, QuestionOption, QuestionType, ScaleRange};
use crate::domain::payload::{self, JsonObject, PayloadError};

/// Decodes raw completion text into an analysis result.
pub fn decode_analysis(text: &str) -> Result<AnalysisResult, PayloadError> {
    let raw = payload::decode_object(text)?;
    Ok(merge_analysis(&raw))
}

/// Merges a decoded analysis payload. Never fails.
pub fn merge_analysis(raw: &JsonObject) -> AnalysisResult {
    let follow_up_questions = decode_follow_ups(payload::array(raw, "followUpQuestions"));
    let preliminary_assessment = decode_assessment(payload::object(raw, "preliminaryAssessment"));
    let clinical_notes = payload::text(raw, "clinicalNotes");

    debug!(
        follow_ups = follow_up_questions.len(),
        risk = %preliminary_assessment.risk_level,
        urgency = %preliminary_assessment.urgency,
        "analysis payload merged"
    );

    AnalysisResult {
        follow_up_questions,
        preliminary_assessment,
        clinical_notes,
    }
}

/// Decodes the follow-up list, skipping entries that have no question text.
///
/// A missing or duplicate id becomes `followup_<index>`, with the index
/// taken from the entry's position in the raw list. When that name is taken
/// too, a `_<n>` suffix is added until it is unique.
pub fn decode_follow_ups(items: &[Value]) -> Vec<Question> {
    let mut seen = HashSet::new();
    let mut questions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            debug!(index, "skipping non-object follow-up entry");
            continue;
        };
        let Some(mut question) = decode_follow_up(index, obj) else {
            debug!(index, "skipping follow-up entry without text");
            continue;
        };
        if seen.contains(&question.id) {
            question.id = unused_id(&seen, index);
        }
        seen.insert(question.id.clone());
        questions.push(question);
    }
    questions
}

fn unused_id(seen: &HashSet<String>, index: usize) -> String {
    let base = format!("followup_{}", index);
    let mut id = base.clone();
    let mut n = 0;
    while seen.contains(&id) {
        n += 1;
        id = format!("{}_{}", base, n);
    }
    id
}

fn decode_follow_up(index: usize, obj: &JsonObject) -> Option<Question> {
    let text = payload::text(obj, "text")?;
    let id = payload::text(obj, "id").unwrap_or_else(|| format!("followup_{}", index));
    let category = payload::text(obj, "category")
        .and_then(|c| QuestionCategory::parse(&c))
        .unwrap_or_default();
    let mut question_type = payload::text(obj, "type")
        .and_then(|t| QuestionType::parse(&t))
        .unwrap_or_default();

    let options = decode_options(payload::array(obj, "options"));
    if question_type.requires_options() && options.is_empty() {
        question_type = QuestionType::Text;
    }

    let mut question = Question::new(id, category, text, question_type)
        .with_options(if question_type.requires_options() {
            options
        } else {
            Vec::new()
        })
        .with_required(payload::flag(obj, "required") != Some(false));

    if let Some(placeholder) = payload::text(obj, "placeholder") {
        question = question.with_placeholder(placeholder);
    }
    if let Some(rationale) = payload::text(obj, "rationale") {
        question = question.with_help_text(rationale);
    }
    if question_type.supports_other() && payload::flag(obj, "allowOther") == Some(true) {
        question = question.with_other(payload::text(obj, "otherPlaceholder"));
    }
    if question_type == QuestionType::Scale {
        question = question.with_scale(decode_scale(obj));
    }
    Some(question)
}

/// Options may be `{value, label}` objects or bare strings.
fn decode_options(items: &[Value]) -> Vec<QuestionOption> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => {
                Some(QuestionOption::new(s.trim(), s.trim()))
            }
            Value::Object(obj) => {
                let value = payload::text(obj, "value");
                let label = payload::text(obj, "label");
                match (value, label) {
                    (Some(v), Some(l)) => Some(QuestionOption::new(v, l)),
                    (Some(v), None) => Some(QuestionOption::new(v.clone(), v)),
                    (None, Some(l)) => Some(QuestionOption::new(l.clone(), l)),
                    (None, None) => None,
                }
            }
            _ => None,
        })
        .collect()
}

fn decode_scale(obj: &JsonObject) -> ScaleRange {
    let default = ScaleRange::default();
    let min = payload::integer(obj, "scaleMin")
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(default.min);
    let max = payload::integer(obj, "scaleMax")
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(default.max);
    let (min, max) = if min < max { (min, max) } else { (default.min, default.max) };
    let labels = payload::object(obj, "scaleLabels");
    ScaleRange {
        min,
        max,
        min_label: labels.and_then(|l| payload::text(l, "min")),
        max_label: labels.and_then(|l| payload::text(l, "max")),
    }
}

/// Decodes the assessment, defaulting each field independently.
pub fn decode_assessment(raw: Option<&JsonObject>) -> PreliminaryAssessment {
    let Some(obj) = raw else {
        return PreliminaryAssessment::default();
    };
    PreliminaryAssessment {
        risk_level: payload::text(obj, "riskLevel")
            .and_then(|v| RiskLevel::parse(&v))
            .unwrap_or_default(),
        urgency: payload::text(obj, "urgency")
            .and_then(|v| Urgency::parse(&v))
            .unwrap_or_default(),
        key_findings: payload::string_list(obj, "keyFindings"),
        areas_to_explore: payload::string_list(obj, "areasToExplore"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merge(value: Value) -> AnalysisResult {
        merge_analysis(value.as_object().unwrap())
    }

    #[test]
    fn complete_follow_up_is_mapped() {
        let result = merge(json!({
            "followUpQuestions": [{
                "id": "pain_duration",
                "category": "chief_complaint",
                "text": "How long does the pain last?",
                "type": "radio",
                "options": [
                    {"value": "seconds", "label": "Seconds"},
                    {"value": "minutes", "label": "Minutes"}
                ],
                "required": true,
                "rationale": "Separates angina from other causes"
            }]
        }));
        let q = &result.follow_up_questions[0];
        assert_eq!(q.id, "pain_duration");
        assert_eq!(q.question_type, QuestionType::Radio);
        assert_eq!(q.options.len(), 2);
        assert_eq!(q.help_text.as_deref(), Some("Separates angina from other causes"));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let result = merge(json!({
            "followUpQuestions": [
                {"text": "First?"},
                {"text": "Second?", "required": false, "category": "lifestyle"}
            ]
        }));
        let qs = &result.follow_up_questions;
        assert_eq!(qs[0].id, "followup_0");
        assert_eq!(qs[0].category, QuestionCategory::ChiefComplaint);
        assert_eq!(qs[0].question_type, QuestionType::Text);
        assert!(qs[0].required);
        assert_eq!(qs[1].id, "followup_1");
        assert_eq!(qs[1].category, QuestionCategory::Lifestyle);
        assert!(!qs[1].required);
    }

    #[test]
    fn required_is_true_unless_explicitly_false() {
        let result = merge(json!({
            "followUpQuestions": [
                {"text": "a", "required": "no"},
                {"text": "b", "required": null},
                {"text": "c", "required": false}
            ]
        }));
        let required: Vec<_> = result.follow_up_questions.iter().map(|q| q.required).collect();
        assert_eq!(required, vec![true, true, false]);
    }

    #[test]
    fn unknown_category_and_type_fall_back() {
        let result = merge(json!({
            "followUpQuestions": [{"text": "x", "category": "dermatology", "type": "slider"}]
        }));
        let q = &result.follow_up_questions[0];
        assert_eq!(q.category, QuestionCategory::ChiefComplaint);
        assert_eq!(q.question_type, QuestionType::Text);
    }

    #[test]
    fn choice_without_options_becomes_text() {
        let result = merge(json!({
            "followUpQuestions": [{"text": "Pick", "type": "select", "allowOther": true}]
        }));
        let q = &result.follow_up_questions[0];
        assert_eq!(q.question_type, QuestionType::Text);
        assert!(!q.allow_other);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn string_options_are_accepted() {
        let result = merge(json!({
            "followUpQuestions": [{
                "text": "Which?", "type": "multiselect",
                "options": ["left arm", {"label": "Jaw"}, 3, {}],
                "allowOther": true
            }]
        }));
        let q = &result.follow_up_questions[0];
        let values: Vec<_> = q.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["left arm", "Jaw"]);
        assert!(q.allow_other);
    }

    #[test]
    fn entries_without_text_are_skipped_but_keep_index_ids() {
        let result = merge(json!({
            "followUpQuestions": ["oops", {"id": "no_text"}, {"text": "Kept"}]
        }));
        assert_eq!(result.follow_up_questions.len(), 1);
        assert_eq!(result.follow_up_questions[0].id, "followup_2");
    }

    #[test]
    fn duplicate_ids_are_renamed() {
        let result = merge(json!({
            "followUpQuestions": [
                {"id": "same", "text": "a"},
                {"id": "same", "text": "b"}
            ]
        }));
        let ids: Vec<_> = result.follow_up_questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["same", "followup_1"]);
    }

    #[test]
    fn synthesized_id_never_reuses_a_taken_one() {
        let result = merge(json!({
            "followUpQuestions": [
                {"id": "followup_1", "text": "A?"},
                {"text": "B?"},
                {"id": "followup_1", "text": "C?"}
            ]
        }));
        let ids: Vec<_> = result.follow_up_questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["followup_1", "followup_1_1", "followup_2"]);
    }

    #[test]
    fn scale_defaults_to_one_to_ten() {
        let result = merge(json!({
            "followUpQuestions": [
                {"text": "Pain?", "type": "scale"},
                {"text": "Odd?", "type": "scale", "scaleMin": 5, "scaleMax": 2},
                {"text": "Custom?", "type": "scale", "scaleMin": 0, "scaleMax": "5",
                 "scaleLabels": {"min": "none", "max": "worst"}}
            ]
        }));
        let scales: Vec<_> = result
            .follow_up_questions
            .iter()
            .map(|q| q.scale.clone().unwrap())
            .collect();
        assert_eq!((scales[0].min, scales[0].max), (1, 10));
        assert_eq!((scales[1].min, scales[1].max), (1, 10));
        assert_eq!((scales[2].min, scales[2].max), (0, 5));
        assert_eq!(scales[2].max_label.as_deref(), Some("worst"));
    }

    #[test]
    fn missing_assessment_defaults() {
        let result = merge(json!({}));
        assert!(result.follow_up_questions.is_empty());
        assert_eq!(result.preliminary_assessment, PreliminaryAssessment::default());
        assert_eq!(result.clinical_notes, None);
    }

    #[test]
    fn partial_assessment_defaults_per_field() {
        let result = merge(json!({
            "preliminaryAssessment": {
                "riskLevel": "high",
                "urgency": "whenever",
                "keyFindings": ["exertional chest pain"]
            },
            "clinicalNotes": "Consider stress test"
        }));
        let a = &result.preliminary_assessment;
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.urgency, Urgency::Routine);
        assert_eq!(a.key_findings, vec!["exertional chest pain"]);
        assert!(a.areas_to_explore.is_empty());
        assert_eq!(result.clinical_notes.as_deref(), Some("Consider stress test"));
    }

    #[test]
    fn wrongly_typed_sections_are_treated_as_missing() {
        let result = merge(json!({
            "followUpQuestions": {"text": "not a list"},
            "preliminaryAssessment": "high risk"
        }));
        assert!(result.follow_up_questions.is_empty());
        assert_eq!(result.preliminary_assessment, PreliminaryAssessment::default());
    }

    #[test]
    fn decode_analysis_rejects_non_object() {
        assert!(decode_analysis("not json").is_err());
        assert!(decode_analysis("```json\n{\"followUpQuestions\": []}\n```").is_ok());
    }

    #[test]
    fn decode_analysis_ignores_later_fences() {
        let text = "```json\n{\"followUpQuestions\":[{\"text\":\"Q?\"}]}\n```\nExample answer format:\n```\nyes\n```";
        let result = decode_analysis(text).unwrap();
        assert_eq!(result.follow_up_questions.len(), 1);
        assert_eq!(result.follow_up_questions[0].text, "Q?");
    }
}
