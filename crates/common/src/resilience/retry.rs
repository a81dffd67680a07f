//! Generic retry strategy implementation with proper error handling and
//! extensibility
//!
//! This module provides a retry mechanism that can wrap any asynchronous
//! operation. A [`RetryPolicy`] decides, per failure, whether another attempt
//! is worthwhile; [`BackoffStrategy`] and [`Jitter`] compute how long to wait
//! before it.
//!
//! The executor never hides the root cause: when retries stop (policy said
//! stop, attempts ran out, or the optional time budget was spent) the caller
//! receives the error returned by the last attempt.
//!
//! Backoff waits go through [`tokio::time::sleep`], so tests can pause the
//! runtime clock and advance it deterministically.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::ErrorClassification;

/// Errors raised while validating a [`RetryConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The retry strategy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Outcome of a retry execution including result and summary statistics.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Value of the successful attempt, or the error of the last attempt
    pub result: Result<T, E>,
    /// Number of times the operation was invoked
    pub attempts: u32,
    /// Delay slept before each retry, in order
    pub delays: Vec<Duration>,
    /// Whether retries stopped because `max_total_time` would be exceeded
    pub timed_out: bool,
    /// When the first attempt started
    pub started_at: Instant,
    /// Human-readable representation of the last error that occurred.
    pub last_error: Option<String>,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    /// Sum of all backoff delays.
    pub fn total_delay(&self) -> Duration {
        self.delays.iter().sum()
    }
}

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// Decide what to do after the attempt with 0-based index `attempt`
    /// failed with `error`.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation with the configured backoff delay
    Retry,
    /// Retry the operation with a custom delay
    RetryAfter(Duration),
    /// Don't retry the operation
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Same delay before every retry
    Fixed(Duration),
    /// Exponential backoff: initial_delay * base^attempt, capped at max_delay
    Exponential { initial_delay: Duration, base: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Calculate the delay that follows the failed attempt with 0-based
    /// index `attempt`.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Exponential { initial_delay, base, max_delay } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let delay_ms = initial_delay.as_millis() as f64 * base.powi(exponent);
                let capped_ms = delay_ms.min(max_delay.as_millis() as f64);
                Duration::from_millis(capped_ms as u64)
            }
        }
    }
}

/// Jitter added on top of the computed backoff delay
///
/// Jitter only ever lengthens a delay, so the backoff strategy's value is a
/// guaranteed minimum wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jitter {
    /// No jitter
    None,
    /// Add a uniformly random extra delay in `0..=max`
    Additive { max: Duration },
}

impl Jitter {
    /// Apply jitter to the calculated delay
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None => delay,
            Jitter::Additive { max } => {
                let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
                if max_ms == 0 {
                    return delay;
                }
                let extra = rand::thread_rng().gen_range(0..=max_ms);
                delay.saturating_add(Duration::from_millis(extra))
            }
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the initial call
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
    /// Jitter added to each computed delay
    pub jitter: Jitter,
    /// Maximum total time to spend retrying
    pub max_total_time: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::Exponential {
                initial_delay: Duration::from_millis(1000),
                base: 2.0,
                max_delay: Duration::from_secs(30),
            },
            jitter: Jitter::None,
            max_total_time: None,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with validation
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Create a configuration builder (alias for `new()`)
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_attempts.saturating_sub(1)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }

        match &self.backoff {
            BackoffStrategy::Exponential { base, .. } if *base <= 0.0 || base.is_nan() => {
                return Err(ConfigError::InvalidConfiguration {
                    message: "exponential base must be greater than 0".to_string(),
                });
            }
            BackoffStrategy::Exponential { initial_delay, max_delay, .. }
                if max_delay < initial_delay =>
            {
                return Err(ConfigError::InvalidConfiguration {
                    message: "max_delay must not be shorter than initial_delay".to_string(),
                });
            }
            _ => {}
        }

        Ok(())
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Configure retries after the initial attempt (`max_attempts = retries + 1`).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_attempts = retries.saturating_add(1);
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub fn exponential_backoff(
        mut self,
        initial_delay: Duration,
        base: f64,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff = BackoffStrategy::Exponential { initial_delay, base, max_delay };
        self
    }

    pub fn no_jitter(mut self) -> Self {
        self.config.jitter = Jitter::None;
        self
    }

    pub fn additive_jitter(mut self, max: Duration) -> Self {
        self.config.jitter = Jitter::Additive { max };
        self
    }

    pub fn max_total_time(mut self, duration: Duration) -> Self {
        self.config.max_total_time = Some(duration);
        self
    }

    pub fn unlimited_time(mut self) -> Self {
        self.config.max_total_time = None;
        self
    }

    pub fn build(self) -> Result<RetryConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The main retry executor
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Create with default configuration
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    /// Configuration in use.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation with retry logic
    #[instrument(skip(self, operation), fields(max_attempts = self.config.max_attempts))]
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Execute an operation with retry logic and return outcome statistics.
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let started_at = Instant::now();
        let max_attempts = self.config.max_attempts.max(1);
        let mut delays = Vec::new();
        let mut attempt: u32 = 0;

        loop {
            let attempt_number = attempt + 1;
            debug!(attempt = attempt_number, max_attempts, "executing operation");

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "operation succeeded after retries");
                    }
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt_number,
                        delays,
                        timed_out: false,
                        started_at,
                        last_error: None,
                    };
                }
                Err(error) => error,
            };

            let last_error = Some(format!("{error:?}"));
            let stop = |error: E, delays: Vec<Duration>, timed_out: bool| RetryOutcome {
                result: Err(error),
                attempts: attempt_number,
                delays,
                timed_out,
                started_at,
                last_error: last_error.clone(),
            };

            let delay = match self.policy.should_retry(&error, attempt) {
                RetryDecision::Stop => {
                    debug!(attempt = attempt_number, error = ?error, "retry policy stopped");
                    return stop(error, delays, false);
                }
                RetryDecision::Retry => {
                    self.config.jitter.apply(self.config.backoff.calculate_delay(attempt))
                }
                RetryDecision::RetryAfter(custom) => custom,
            };

            if attempt_number >= max_attempts {
                warn!(attempts = attempt_number, error = ?error, "all retry attempts exhausted");
                return stop(error, delays, false);
            }

            if let Some(max_time) = self.config.max_total_time {
                if started_at.elapsed().saturating_add(delay) > max_time {
                    warn!(
                        attempts = attempt_number,
                        elapsed_ms = started_at.elapsed().as_millis() as u64,
                        "retry time budget exceeded"
                    );
                    return stop(error, delays, true);
                }
            }

            warn!(
                attempt = attempt_number,
                delay_ms = delay.as_millis() as u64,
                error = ?error,
                "operation failed, retrying"
            );
            tokio::time::sleep(delay).await;
            delays.push(delay);
            attempt += 1;
        }
    }
}

/// Convenience function to create a retry executor and execute an operation
pub async fn retry_with_policy<F, Fut, T, E, P>(
    config: RetryConfig,
    policy: P,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: RetryPolicy<E>,
    E: fmt::Debug,
{
    let executor = RetryExecutor::new(config, policy);
    executor.execute(operation).await
}

/// Convenience function to retry with default configuration
pub async fn retry<F, Fut, T, E, P>(policy: P, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: RetryPolicy<E>,
    E: fmt::Debug,
{
    retry_with_policy(RetryConfig::default(), policy, operation).await
}

/// Pre-defined retry policies for common scenarios
pub mod policies {
    use super::*;

    /// Always retry policy - retries on any error
    #[derive(Debug, Clone)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retry policy - never retries
    #[derive(Debug, Clone)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Predicate-based retry policy
    #[derive(Debug)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.predicate)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }

    /// Retries whatever [`ErrorClassification::is_retryable`] accepts,
    /// honouring [`ErrorClassification::retry_after`] hints.
    #[derive(Debug, Clone, Default)]
    pub struct ClassifiedRetry;

    impl<E> RetryPolicy<E> for ClassifiedRetry
    where
        E: ErrorClassification,
    {
        fn should_retry(&self, error: &E, _attempt: u32) -> RetryDecision {
            if !error.is_retryable() {
                return RetryDecision::Stop;
            }
            match error.retry_after() {
                Some(delay) => RetryDecision::RetryAfter(delay),
                None => RetryDecision::Retry,
            }
        }
    }
}
