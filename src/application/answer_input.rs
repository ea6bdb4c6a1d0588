//! Typed terminal input into answers.
//!
//! Choice questions take option numbers (`2`, or `1,3` for multiselect) or
//! raw option values. Questions that allow "other" also accept
//! `other:<text>`. Blank input means "no answer".

use thiserror::Error;

use crate::domain::interview::{other_entry, other_text, Answer, Question, QuestionType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerInputError {
    #[error("'{0}' is not one of the listed options")]
    UnknownOption(String),

    #[error("Only one option can be chosen")]
    SingleChoiceOnly,

    #[error("Enter a whole number between {min} and {max}")]
    OutOfScale { min: i32, max: i32 },

    #[error("This question does not accept a free-text \"other\" answer")]
    OtherNotAllowed,

    #[error("The \"other\" answer needs some text")]
    EmptyOther,
}

/// Parses one line of input for `question`.
///
/// Returns `Ok(None)` for blank input.
pub fn parse_answer(question: &Question, input: &str) -> Result<Option<Answer>, AnswerInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let answer = match question.question_type {
        QuestionType::Text | QuestionType::Textarea => Answer::single(input),
        QuestionType::Scale => {
            let scale = question.scale.clone().unwrap_or_default();
            let value = input
                .parse::<i32>()
                .ok()
                .filter(|v| (scale.min..=scale.max).contains(v))
                .ok_or(AnswerInputError::OutOfScale {
                    min: scale.min,
                    max: scale.max,
                })?;
            Answer::single(value.to_string())
        }
        QuestionType::Select | QuestionType::Radio => {
            if other_text(input).is_none() && input.contains(',') {
                return Err(AnswerInputError::SingleChoiceOnly);
            }
            Answer::single(choice(question, input)?)
        }
        QuestionType::Multiselect => {
            let mut values: Vec<String> = Vec::new();
            for token in split_selections(input) {
                let value = choice(question, token)?;
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Answer::Multiple(values)
        }
    };

    Ok(Some(answer))
}

/// Splits on commas, except inside a trailing `other:` entry.
fn split_selections(input: &str) -> Vec<&str> {
    let (choices, other) = match input.find("other:") {
        Some(at) => (&input[..at], Some(&input[at..])),
        None => (input, None),
    };
    choices
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .chain(other)
        .collect()
}

fn choice(question: &Question, token: &str) -> Result<String, AnswerInputError> {
    let token = token.trim();

    if let Some(text) = other_text(token) {
        if !question.allow_other {
            return Err(AnswerInputError::OtherNotAllowed);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(AnswerInputError::EmptyOther);
        }
        return Ok(other_entry(text));
    }

    if let Ok(number) = token.parse::<usize>() {
        if let Some(option) = number.checked_sub(1).and_then(|i| question.options.get(i)) {
            return Ok(option.value.clone());
        }
    }

    question
        .options
        .iter()
        .find(|o| o.value == token)
        .map(|o| o.value.clone())
        .ok_or_else(|| AnswerInputError::UnknownOption(token.to_string()))
}
