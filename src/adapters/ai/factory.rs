//! Provider construction from configuration.

use secrecy::ExposeSecret;
use std::sync::Arc;

use super::{AnthropicConfig, AnthropicProvider, OpenAIConfig, OpenAIProvider, RetryingAIProvider};
use crate::config::{LlmConfig, LlmProvider};
use crate::ports::{AIError, AIProvider};

/// Builds the configured provider wrapped in the retry policy.
///
/// # Errors
///
/// - `AuthenticationFailed` if no API key is configured
/// - `InvalidRequest` if Azure is selected without a base URL
/// - `Network` if the HTTP client cannot be built
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let api_key = config
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(AIError::AuthenticationFailed)?;

    let inner: Arc<dyn AIProvider> = match config.provider {
        LlmProvider::OpenAI => {
            let mut provider_config = OpenAIConfig::new(api_key);
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url.clone());
            }
            Arc::new(OpenAIProvider::new(
                provider_config
                    .with_model(config.model())
                    .with_timeout(config.timeout())
                    .with_temperature(config.temperature),
            )?)
        }
        LlmProvider::Azure => {
            let url = config
                .base_url
                .clone()
                .ok_or_else(|| AIError::invalid_request("Azure requires a base URL"))?;
            Arc::new(OpenAIProvider::new(
                OpenAIConfig::azure(api_key, url)
                    .with_model(config.model())
                    .with_timeout(config.timeout())
                    .with_temperature(config.temperature),
            )?)
        }
        LlmProvider::Anthropic => {
            let mut provider_config = AnthropicConfig::new(api_key);
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url.clone());
            }
            Arc::new(AnthropicProvider::new(
                provider_config
                    .with_model(config.model())
                    .with_timeout(config.timeout())
                    .with_temperature(config.temperature),
            )?)
        }
    };

    tracing::info!(
        provider = %config.provider,
        model = %config.model(),
        max_attempts = config.max_attempts,
        "Language model provider configured"
    );

    Ok(Arc::new(RetryingAIProvider::new(inner, config.max_attempts)))
}
