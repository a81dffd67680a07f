//! Retrying backend operations
//!
//! [`with_retry`] composes the generic executor from `learnhub-common` with
//! a policy driven by the error category: network and server failures are
//! retried with exponential backoff, everything else is returned at once.

use std::future::Future;
use std::time::Duration;

use learnhub_common::resilience::{ConfigError, RetryConfig, RetryDecision, RetryExecutor, RetryPolicy};
use learnhub_domain::constants::{DEFAULT_MAX_RETRIES, RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_MS};
use learnhub_domain::{BackendError, ErrorCategory};
use tracing::debug;

use super::classify::ErrorClassifier;

/// Retry decision by error category.
///
/// `AuthError` and `Unknown` stop immediately; the caller gets that error
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct BackendRetryPolicy {
    classifier: ErrorClassifier,
}

impl BackendRetryPolicy {
    pub fn new(classifier: ErrorClassifier) -> Self {
        Self { classifier }
    }
}

impl RetryPolicy<BackendError> for BackendRetryPolicy {
    fn should_retry(&self, error: &BackendError, attempt: u32) -> RetryDecision {
        let category = self.classifier.classify(error);
        debug!(attempt = attempt + 1, %category, "classified backend failure");

        match category {
            ErrorCategory::NetworkError | ErrorCategory::ServerError => RetryDecision::Retry,
            ErrorCategory::AuthError | ErrorCategory::Unknown => RetryDecision::Stop,
        }
    }
}

/// Schedule used by [`with_retry`]: `max_retries + 1` attempts, waiting
/// 1s, 2s, 4s, ... between them.
pub fn backend_retry_config(max_retries: u32) -> Result<RetryConfig, ConfigError> {
    RetryConfig::new()
        .max_retries(max_retries)
        .exponential_backoff(
            Duration::from_millis(RETRY_BASE_DELAY_MS),
            2.0,
            Duration::from_millis(RETRY_MAX_DELAY_MS),
        )
        .no_jitter()
        .unlimited_time()
        .build()
}

/// Run `operation`, retrying transient failures up to `max_retries` times.
///
/// Returns the first success, or the last error once the policy stops or
/// attempts run out. Dropping the returned future cancels any pending retry.
pub async fn with_retry<F, Fut, T>(operation: F, max_retries: u32) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    with_retry_policy(operation, max_retries, BackendRetryPolicy::default()).await
}

/// [`with_retry`] with the standard budget of three retries.
pub async fn with_default_retry<F, Fut, T>(operation: F) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    with_retry(operation, DEFAULT_MAX_RETRIES).await
}

/// [`with_retry`] with an explicit policy, e.g. one bound to a private
/// connection state.
pub async fn with_retry_policy<F, Fut, T>(
    operation: F,
    max_retries: u32,
    policy: BackendRetryPolicy,
) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let config = backend_retry_config(max_retries).map_err(|e| BackendError::other(e.to_string()))?;
    RetryExecutor::new(config, policy).execute(operation).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use learnhub_domain::{ConnectionStatus, TransportKind};

    use super::*;
    use crate::backend::status::ConnectionState;

    fn policy_with(state: Arc<ConnectionState>) -> BackendRetryPolicy {
        BackendRetryPolicy::new(ErrorClassifier::new(state))
    }

    #[test]
    fn decisions_follow_category() {
        let policy = policy_with(Arc::new(ConnectionState::new()));

        let network = BackendError::transport(TransportKind::Connect, "refused");
        assert_eq!(policy.should_retry(&network, 0), RetryDecision::Retry);
        assert_eq!(policy.should_retry(&BackendError::http(500, "boom"), 0), RetryDecision::Retry);
        assert_eq!(policy.should_retry(&BackendError::http(401, "nope"), 0), RetryDecision::Stop);
        assert_eq!(policy.should_retry(&BackendError::http(409, "conflict"), 0), RetryDecision::Stop);
    }

    #[test]
    fn offline_state_makes_everything_retryable() {
        let state = Arc::new(ConnectionState::new());
        state.update(&ConnectionStatus::offline(ErrorCategory::NetworkError, "down"));
        let policy = policy_with(state);

        assert_eq!(policy.should_retry(&BackendError::http(401, "nope"), 0), RetryDecision::Retry);
    }

    #[test]
    fn schedule_doubles_from_one_second() {
        let config = backend_retry_config(3).unwrap();
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.backoff.calculate_delay(0), Duration::from_millis(1000));
        assert_eq!(config.backoff.calculate_delay(1), Duration::from_millis(2000));
        assert_eq!(config.backoff.calculate_delay(2), Duration::from_millis(4000));
    }
}
