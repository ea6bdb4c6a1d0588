//! Language model provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;

/// Language model provider configuration
#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    /// Backend to talk to
    #[serde(default)]
    pub provider: LlmProvider,

    /// Model name; the provider default when absent
    pub model: Option<String>,

    /// API key, never logged
    pub api_key: Option<Secret<String>>,

    /// Endpoint override; required for Azure deployments
    pub base_url: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempts per call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Language model backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Anthropic,
    /// OpenAI models hosted on Azure, reached through a custom base URL
    Azure,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Azure => "azure",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI | LlmProvider::Azure => "gpt-4o",
            LlmProvider::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LlmConfig {
    /// Effective model name
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("LLM__API_KEY"));
        }

        match (&self.provider, self.base_url.as_deref()) {
            (LlmProvider::Azure, None) => {
                return Err(ValidationError::MissingRequired("LLM__BASE_URL"));
            }
            (_, Some(url)) if !url.starts_with("http://") && !url.starts_with("https://") => {
                return Err(ValidationError::InvalidBaseUrl);
            }
            _ => {}
        }

        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(1..=10).contains(&self.max_attempts) {
            return Err(ValidationError::InvalidAttempts);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }

        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            temperature: default_temperature(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    3
}

fn default_temperature() -> f32 {
    0.7
}
