//! Interview error types.

use thiserror::Error;

use super::status::InterviewStatus;
use crate::domain::foundation::{ErrorCode, TransitionError, ValidationError};

/// Longest diagnostic kept from a generic upstream failure, in characters.
pub const MAX_DIAGNOSTIC_CHARS: usize = 100;

/// Errors surfaced by interview operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterviewError {
    /// Malformed start parameters; raised before any state change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation not allowed in the current status.
    #[error("cannot {action} while the interview is {status}")]
    InvalidState {
        action: &'static str,
        status: InterviewStatus,
    },

    #[error("language model rejected the credentials")]
    UpstreamAuth,

    #[error("language model rate limit exceeded")]
    UpstreamRateLimit,

    #[error("language model response could not be interpreted: {0}")]
    UpstreamParse(String),

    #[error("language model request failed: {0}")]
    UpstreamGeneric(String),
}

impl InterviewError {
    /// Wraps a rejected status transition.
    pub fn invalid_transition(action: &'static str, err: TransitionError<InterviewStatus>) -> Self {
        InterviewError::InvalidState {
            action,
            status: err.from,
        }
    }

    /// Generic upstream failure with its diagnostic truncated.
    pub fn upstream_generic(message: impl AsRef<str>) -> Self {
        InterviewError::UpstreamGeneric(truncate_diagnostic(message.as_ref()))
    }

    /// Returns true for failures of the external language model call.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            InterviewError::UpstreamAuth
                | InterviewError::UpstreamRateLimit
                | InterviewError::UpstreamParse(_)
                | InterviewError::UpstreamGeneric(_)
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            InterviewError::Validation(_) => ErrorCode::ValidationFailed,
            InterviewError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            InterviewError::UpstreamAuth => ErrorCode::UpstreamUnauthorized,
            InterviewError::UpstreamRateLimit => ErrorCode::RateLimited,
            InterviewError::UpstreamParse(_) => ErrorCode::UpstreamParseFailed,
            InterviewError::UpstreamGeneric(_) => ErrorCode::AIProviderError,
        }
    }

    /// Text shown to the patient when the operation fails.
    pub fn user_message(&self) -> String {
        match self {
            InterviewError::Validation(err) => err.to_string(),
            InterviewError::InvalidState { .. } => self.to_string(),
            InterviewError::UpstreamAuth => {
                "Invalid API key. Check the language model settings.".to_string()
            }
            InterviewError::UpstreamRateLimit => {
                "Request limit exceeded. Please wait a moment and try again.".to_string()
            }
            InterviewError::UpstreamParse(_) => {
                "The language model returned a response that could not be read. Please try again."
                    .to_string()
            }
            InterviewError::UpstreamGeneric(detail) => {
                format!("Language model error: {}", truncate_diagnostic(detail))
            }
        }
    }
}

/// Cuts a diagnostic to [`MAX_DIAGNOSTIC_CHARS`] characters.
pub fn truncate_diagnostic(message: &str) -> String {
    message.chars().take(MAX_DIAGNOSTIC_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StateMachine;

    #[test]
    fn generic_diagnostics_are_truncated() {
        let long = "x".repeat(250);
        let err = InterviewError::upstream_generic(&long);
        match &err {
            InterviewError::UpstreamGeneric(detail) => assert_eq!(detail.len(), 100),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.code(), ErrorCode::AIProviderError);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ż".repeat(150);
        assert_eq!(truncate_diagnostic(&text).chars().count(), 100);
    }

    #[test]
    fn auth_and_rate_limit_have_distinct_messages() {
        let auth = InterviewError::UpstreamAuth.user_message();
        let rate = InterviewError::UpstreamRateLimit.user_message();
        assert!(auth.contains("API key"));
        assert!(rate.contains("limit"));
        assert_ne!(auth, rate);
    }

    #[test]
    fn validation_errors_convert_and_are_not_upstream() {
        let err: InterviewError = ValidationError::empty_field("patient_id").into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(!err.is_upstream());
        assert!(err.user_message().contains("patient_id"));
    }

    #[test]
    fn invalid_transition_keeps_current_status() {
        let transition = InterviewStatus::Idle
            .transition_to(InterviewStatus::Completed)
            .unwrap_err();
        let err = InterviewError::invalid_transition("receive a report", transition);
        assert_eq!(
            err.to_string(),
            "cannot receive a report while the interview is idle"
        );
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }
}
