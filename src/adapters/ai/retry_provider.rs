//! Retrying AI Provider - Wrapper that retries transient provider failures.
//!
//! Server errors, transport failures and timeouts are retried with
//! exponential backoff (1s, 2s, 4s, ...). Everything else, including rate
//! limits and authentication failures, is returned on the first attempt.
//!
//! # Example
//!
//! ```ignore
//! let inner: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(config)?);
//! let provider = RetryingAIProvider::new(inner, 3);
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubled for each further attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Provider wrapper adding bounded retries.
pub struct RetryingAIProvider {
    inner: Arc<dyn AIProvider>,
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryingAIProvider {
    /// Wraps `inner`. `max_attempts` below one is treated as one.
    pub fn new(inner: Arc<dyn AIProvider>, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Overrides the backoff base delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given failed attempt (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

#[async_trait]
impl AIProvider for RetryingAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut attempt = 1;

        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        trace_id = %request.metadata.trace_id,
                        error = %err,
                        "Transient provider failure, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        tracing::error!(
                            attempts = attempt,
                            trace_id = %request.metadata.trace_id,
                            error = %err,
                            "Provider failed after all retries"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::{MessageRole, RequestMetadata, RequestPurpose};

    fn make_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(None, RequestPurpose::Report, "trace"))
            .with_message(MessageRole::User, "Hello")
    }

    fn wrap(mock: &MockAIProvider, attempts: u32) -> RetryingAIProvider {
        RetryingAIProvider::new(Arc::new(mock.clone()), attempts).with_base_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let mock = MockAIProvider::new().with_response("ok");

        let response = wrap(&mock, 3).complete(make_request()).await.unwrap();

        assert_eq!(response.content, "ok");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn server_error_is_retried_until_success() {
        let mock = MockAIProvider::new()
            .with_error(AIError::unavailable("503"))
            .with_error(AIError::network("reset"))
            .with_response("recovered");

        let response = wrap(&mock, 3).complete(make_request()).await.unwrap();

        assert_eq!(response.content, "recovered");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mock = MockAIProvider::new()
            .with_error(AIError::unavailable("1"))
            .with_error(AIError::unavailable("2"))
            .with_error(AIError::unavailable("3"))
            .with_response("too late");

        let err = wrap(&mock, 3).complete(make_request()).await.unwrap_err();

        assert_eq!(err, AIError::unavailable("3"));
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.remaining(), 1);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        for err in [
            AIError::AuthenticationFailed,
            AIError::rate_limited(10),
            AIError::invalid_request("bad model"),
        ] {
            let mock = MockAIProvider::new().with_error(err.clone()).with_response("unused");

            let result = wrap(&mock, 3).complete(make_request()).await;

            assert_eq!(result.unwrap_err(), err);
            assert_eq!(mock.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let mock = MockAIProvider::new().with_response("ok");
        let provider = wrap(&mock, 0);

        assert_eq!(provider.max_attempts(), 1);
        provider.complete(make_request()).await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn backoff_doubles() {
        let provider = RetryingAIProvider::new(Arc::new(MockAIProvider::new()), 4);

        assert_eq!(provider.delay_after(1), Duration::from_secs(1));
        assert_eq!(provider.delay_after(2), Duration::from_secs(2));
        assert_eq!(provider.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn reports_inner_provider_info() {
        let provider = RetryingAIProvider::new(Arc::new(MockAIProvider::new()), 3);
        assert_eq!(provider.provider_info().name, "mock");
    }
}
