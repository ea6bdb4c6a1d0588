//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CARDIO_TRIAGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cardio_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using {} ({})", config.llm.provider, config.llm.model());
//! ```

mod error;
mod interview;
mod llm;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use llm::{LlmConfig, LlmProvider};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Language model provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Snapshot storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Interview runtime configuration
    #[serde(default)]
    pub interview: InterviewConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CARDIO_TRIAGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CARDIO_TRIAGE__LLM__PROVIDER=anthropic` -> `llm.provider = anthropic`
    /// - `CARDIO_TRIAGE__INTERVIEW__REPORT_DIR=/tmp/r` -> `interview.report_dir = /tmp/r`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CARDIO_TRIAGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.llm.validate()?;
        self.interview.validate()?;
        Ok(())
    }
}
