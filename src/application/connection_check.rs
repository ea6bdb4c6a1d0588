//! Connection check - Verifies that the configured provider answers.
//!
//! Sends a one-word probe and classifies the outcome into something the
//! user can act on.

use std::fmt;
use std::sync::Arc;

use crate::application::prompts::{CONNECTION_CHECK_SYSTEM_PROMPT, CONNECTION_CHECK_USER_PROMPT};
use crate::domain::interview::truncate_diagnostic;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, ProviderInfo, RequestMetadata,
    RequestPurpose,
};

/// Outcome of a connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The model answered.
    Connected,
    /// The API key was rejected.
    InvalidApiKey,
    /// The provider throttled the probe.
    RateLimited,
    /// The model does not exist or the key has no access to it.
    InvalidModel,
    /// The call succeeded but the reply was empty.
    EmptyReply,
    /// Anything else, with a diagnostic of at most 100 characters.
    Failed(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    fn from_error(err: &AIError) -> Self {
        match err {
            AIError::AuthenticationFailed => ConnectionStatus::InvalidApiKey,
            AIError::RateLimited { .. } => ConnectionStatus::RateLimited,
            AIError::InvalidRequest(message) if message.to_lowercase().contains("model") => {
                ConnectionStatus::InvalidModel
            }
            other => ConnectionStatus::Failed(truncate_diagnostic(&other.to_string())),
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("Connection works"),
            ConnectionStatus::InvalidApiKey => f.write_str("Invalid API key"),
            ConnectionStatus::RateLimited => f.write_str("Request limit exceeded"),
            ConnectionStatus::InvalidModel => f.write_str("Invalid model or no access to it"),
            ConnectionStatus::EmptyReply => f.write_str("No reply from the model"),
            ConnectionStatus::Failed(detail) => write!(f, "Error: {}", detail),
        }
    }
}

/// Report of one connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub provider: ProviderInfo,
    pub status: ConnectionStatus,
}

/// Probes the provider with a minimal completion.
pub struct ConnectionChecker {
    provider: Arc<dyn AIProvider>,
}

impl ConnectionChecker {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn check(&self) -> ConnectionReport {
        let info = self.provider.provider_info();
        let request = CompletionRequest::new(RequestMetadata::new(
            None,
            RequestPurpose::ConnectionCheck,
            uuid::Uuid::new_v4().to_string(),
        ))
        .with_system_prompt(CONNECTION_CHECK_SYSTEM_PROMPT)
        .with_message(MessageRole::User, CONNECTION_CHECK_USER_PROMPT)
        .with_max_tokens(16);

        let status = match self.provider.complete(request).await {
            Ok(response) if response.content.trim().is_empty() => ConnectionStatus::EmptyReply,
            Ok(_) => ConnectionStatus::Connected,
            Err(err) => ConnectionStatus::from_error(&err),
        };

        if status.is_connected() {
            tracing::info!(provider = %info.name, model = %info.model, "Provider connection OK");
        } else {
            tracing::warn!(provider = %info.name, model = %info.model, status = %status, "Provider connection failed");
        }

        ConnectionReport {
            provider: info,
            status,
        }
    }
}
