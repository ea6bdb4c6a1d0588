//! Interview runtime configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Interview runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Directory exported reports are written to
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Caller-side limit for each analysis or report call, in seconds
    pub request_timeout_secs: Option<u64>,
}

impl InterviewConfig {
    /// Get the request timeout as Duration
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.report_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidReportDir);
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            request_timeout_secs: None,
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("./reports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_defaults() {
        let config = InterviewConfig::default();
        assert_eq!(config.report_dir, PathBuf::from("./reports"));
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_duration() {
        let config = InterviewConfig {
            request_timeout_secs: Some(90),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = InterviewConfig {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn test_empty_report_dir_is_invalid() {
        let config = InterviewConfig {
            report_dir: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidReportDir));
    }
}
