//! Read-only, ordered question catalog.

use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

use super::question::{Question, QuestionCategory};
use crate::domain::foundation::ValidationError;

const CARDIOLOGY_YAML: &str = include_str!("cardiology_catalog.yaml");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("question '{id}' is invalid: {source}")]
    InvalidQuestion {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("duplicate question id '{0}'")]
    DuplicateId(String),

    #[error("catalog contains no questions")]
    Empty,
}

#[derive(Deserialize)]
struct CatalogFile {
    questions: Vec<Question>,
}

/// Ordered list of validated questions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds a catalog, checking every question and id uniqueness.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            question
                .validate()
                .map_err(|source| CatalogError::InvalidQuestion {
                    id: question.id.clone(),
                    source,
                })?;
            if !seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateId(question.id.clone()));
            }
        }
        Ok(Self { questions })
    }

    /// Parses a catalog document with a top-level `questions` list.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(source)?;
        Self::new(file.questions)
    }

    /// The bundled cardiology questionnaire.
    pub fn cardiology() -> Result<Self, CatalogError> {
        Self::from_yaml(CARDIOLOGY_YAML)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Questions of one category, in catalog order.
    pub fn by_category(&self, category: QuestionCategory) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.category == category)
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}
