//! Prompt building for the two language-model calls.
//!
//! [`AnalysisRequest`] and [`ReportRequest`] are the request shapes handed to
//! the model. They are built from projected responses and rendered into a
//! [`CompletionRequest`] with a fixed system prompt describing the JSON the
//! model must answer with.

use serde::Serialize;

use crate::domain::interview::{Demographics, ResponseEntry, Sex};
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata};

/// System prompt for the phase-one analysis.
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an experienced cardiologist preparing for a patient visit.
You receive the patient's answers to a structured pre-visit questionnaire.
Analyze them and propose 3 to 8 follow-up questions that would clarify the
clinical picture, and give a preliminary assessment.

Respond with a single JSON object and nothing else:
{
  "followUpQuestions": [
    {
      "id": "snake_case_identifier",
      "category": "chief_complaint | risk_factors | medical_history | medications | lifestyle | functional_status",
      "text": "question shown to the patient",
      "type": "text | textarea | select | multiselect | radio | scale",
      "options": [{"value": "snake_case", "label": "shown label"}],
      "required": true,
      "placeholder": "optional hint for free-text answers",
      "rationale": "why this question matters",
      "allowOther": false,
      "scaleMin": 1,
      "scaleMax": 10,
      "scaleLabels": {"min": "label for the lowest value", "max": "label for the highest value"}
    }
  ],
  "preliminaryAssessment": {
    "riskLevel": "low | moderate | high",
    "urgency": "routine | urgent | immediate",
    "keyFindings": ["..."],
    "areasToExplore": ["..."]
  },
  "clinicalNotes": "free-text notes for the final report"
}

Only select, multiselect and radio questions take options. Use plain language
the patient can understand. Do not give a diagnosis to the patient."#;

/// System prompt for the final report.
pub const REPORT_SYSTEM_PROMPT: &str = r#"You are an experienced cardiologist writing a pre-visit triage report
for a colleague. You receive the patient's answers from an initial
questionnaire and from follow-up questions.

Respond with a single JSON object and nothing else:
{
  "triageSummary": {
    "chiefComplaint": "...",
    "symptomDuration": "...",
    "urgencyLevel": "routine | urgent | immediate",
    "urgencyRationale": "..."
  },
  "riskFactors": {
    "identifiedFactors": [
      {"name": "...", "present": true, "details": "...", "severity": "mild | moderate | severe"}
    ],
    "overallRiskLevel": "low | moderate | high",
    "riskRationale": "..."
  },
  "keyFindings": ["..."],
  "differentialConsiderations": ["..."],
  "recommendations": {
    "physicalExamFocus": ["..."],
    "suggestedDiagnostics": ["..."],
    "areasForDeeperInvestigation": ["..."],
    "additionalNotes": "..."
  }
}

Base every statement on the answers given. Be concise and clinically precise."#;

/// Probe sent by the connection check.
pub const CONNECTION_CHECK_SYSTEM_PROMPT: &str = "Reply with one word: OK";
pub const CONNECTION_CHECK_USER_PROMPT: &str = "Connection test";

/// A question and its answer as shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptPair {
    pub question: String,
    pub answer: String,
}

impl From<&ResponseEntry> for PromptPair {
    fn from(entry: &ResponseEntry) -> Self {
        Self {
            question: entry.question_text.clone(),
            answer: entry.answer.clone(),
        }
    }
}

/// Input of the phase-one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Grouped by category in the fixed category order.
    pub entries: Vec<PromptPair>,
    pub demographics: Option<Demographics>,
}

impl AnalysisRequest {
    /// Builds the request, grouping entries by category.
    ///
    /// Entries keep their relative order within a category.
    pub fn new(responses: &[ResponseEntry], demographics: Option<Demographics>) -> Self {
        let mut sorted: Vec<&ResponseEntry> = responses.iter().collect();
        sorted.sort_by_key(|entry| entry.category);

        Self {
            entries: sorted.into_iter().map(PromptPair::from).collect(),
            demographics,
        }
    }

    /// Renders the user prompt.
    pub fn user_prompt(&self) -> String {
        let mut prompt = String::new();

        if let Some(demographics) = &self.demographics {
            let sex = match demographics.sex() {
                Sex::Male => "male",
                Sex::Female => "female",
            };
            prompt.push_str(&format!(
                "Patient: {}, {} years old.\n\n",
                sex,
                demographics.age()
            ));
        }

        prompt.push_str("Questionnaire answers:\n\n");
        prompt.push_str(&numbered(&self.entries, "Question", "Answer"));
        prompt
    }

    pub fn to_completion_request(&self, metadata: RequestMetadata) -> CompletionRequest {
        CompletionRequest::new(metadata)
            .with_system_prompt(ANALYSIS_SYSTEM_PROMPT)
            .with_message(MessageRole::User, self.user_prompt())
    }
}

/// Input of the report call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub phase1: Vec<PromptPair>,
    pub phase2: Vec<PromptPair>,
    /// Clinical notes from the analysis, if the model produced any.
    pub analysis_notes: Option<String>,
}

impl ReportRequest {
    pub fn new(
        phase1: &[ResponseEntry],
        phase2: &[ResponseEntry],
        analysis_notes: Option<String>,
    ) -> Self {
        Self {
            phase1: phase1.iter().map(PromptPair::from).collect(),
            phase2: phase2.iter().map(PromptPair::from).collect(),
            analysis_notes: analysis_notes.filter(|notes| !notes.trim().is_empty()),
        }
    }

    /// Renders the user prompt.
    pub fn user_prompt(&self) -> String {
        let mut prompt = String::from("=== INITIAL INTERVIEW ===\n\n");
        prompt.push_str(&numbered(&self.phase1, "Q", "A"));
        prompt.push_str("\n\n=== FOLLOW-UP QUESTIONS ===\n\n");
        prompt.push_str(&numbered(&self.phase2, "Q", "A"));

        if let Some(notes) = &self.analysis_notes {
            prompt.push_str("\n\n=== ANALYSIS NOTES ===\n");
            prompt.push_str(notes);
        }

        prompt
    }

    pub fn to_completion_request(&self, metadata: RequestMetadata) -> CompletionRequest {
        CompletionRequest::new(metadata)
            .with_system_prompt(REPORT_SYSTEM_PROMPT)
            .with_message(MessageRole::User, self.user_prompt())
    }
}

/// `1. Question: ...\n   Answer: ...` blocks separated by blank lines.
fn numbered(pairs: &[PromptPair], question_label: &str, answer_label: &str) -> String {
    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            format!(
                "{}. {}: {}\n   {}: {}",
                i + 1,
                question_label,
                pair.question,
                answer_label,
                pair.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, Timestamp};
    use crate::domain::interview::{Phase, QuestionCategory};
    use crate::ports::RequestPurpose;

    fn entry(id: &str, category: QuestionCategory, answer: &str) -> ResponseEntry {
        ResponseEntry {
            session_id: SessionId::new(),
            phase: Phase::One,
            question_id: id.to_string(),
            question_text: format!("About {id}?"),
            category,
            answer: answer.to_string(),
            created_at: Timestamp::now(),
        }
    }

    fn metadata(purpose: RequestPurpose) -> RequestMetadata {
        RequestMetadata::new(None, purpose, "trace")
    }

    #[test]
    fn analysis_groups_by_category_keeping_order_within() {
        let responses = vec![
            entry("smoking", QuestionCategory::RiskFactors, "no"),
            entry("main", QuestionCategory::ChiefComplaint, "chest_pain"),
            entry("diet", QuestionCategory::Lifestyle, "poor"),
            entry("duration", QuestionCategory::ChiefComplaint, "weeks"),
            entry("diabetes", QuestionCategory::RiskFactors, "yes"),
        ];

        let request = AnalysisRequest::new(&responses, None);
        let questions: Vec<&str> = request.entries.iter().map(|p| p.question.as_str()).collect();

        assert_eq!(
            questions,
            vec![
                "About main?",
                "About duration?",
                "About smoking?",
                "About diabetes?",
                "About diet?"
            ]
        );
    }

    #[test]
    fn analysis_prompt_mentions_demographics() {
        let demographics = Demographics::new(Sex::Male, 55).unwrap();
        let request = AnalysisRequest::new(
            &[entry("main", QuestionCategory::ChiefComplaint, "chest_pain")],
            Some(demographics),
        );

        let prompt = request.user_prompt();

        assert!(prompt.starts_with("Patient: male, 55 years old."));
        assert!(prompt.contains("1. Question: About main?\n   Answer: chest_pain"));
    }

    #[test]
    fn analysis_prompt_without_demographics() {
        let request = AnalysisRequest::new(&[], None);
        assert!(request.user_prompt().starts_with("Questionnaire answers:"));
    }

    #[test]
    fn analysis_completion_request_carries_system_prompt() {
        let request = AnalysisRequest::new(&[], None)
            .to_completion_request(metadata(RequestPurpose::Analysis));

        assert_eq!(request.system_prompt.as_deref(), Some(ANALYSIS_SYSTEM_PROMPT));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
    }

    #[test]
    fn report_prompt_has_both_phases_and_notes() {
        let p1 = vec![entry("main", QuestionCategory::ChiefComplaint, "chest_pain")];
        let p2 = vec![entry("followup_0", QuestionCategory::ChiefComplaint, "worse")];

        let request = ReportRequest::new(&p1, &p2, Some("Suspect stable angina".to_string()));
        let prompt = request.user_prompt();

        assert!(prompt.contains("1. Q: About main?\n   A: chest_pain"));
        assert!(prompt.contains("=== FOLLOW-UP QUESTIONS ===\n\n1. Q: About followup_0?"));
        assert!(prompt.ends_with("=== ANALYSIS NOTES ===\nSuspect stable angina"));
    }

    #[test]
    fn blank_notes_are_dropped() {
        let request = ReportRequest::new(&[], &[], Some("   ".to_string()));
        assert!(request.analysis_notes.is_none());
        assert!(!request.user_prompt().contains("ANALYSIS NOTES"));
    }

    #[test]
    fn report_completion_request_carries_system_prompt() {
        let request = ReportRequest::new(&[], &[], None)
            .to_completion_request(metadata(RequestPurpose::Report));
        assert_eq!(request.system_prompt.as_deref(), Some(REPORT_SYSTEM_PROMPT));
    }

    #[test]
    fn prompt_pair_serializes_as_question_answer() {
        let pair = PromptPair {
            question: "Q".into(),
            answer: "A".into(),
        };
        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            serde_json::json!({"question": "Q", "answer": "A"})
        );
    }
}
