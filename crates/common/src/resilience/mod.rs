//! Resilience patterns for fault tolerance and error handling
//!
//! This module provides **generic, reusable** retry logic: configurable
//! backoff strategies, jitter that only ever lengthens a delay, and a
//! pluggable [`RetryPolicy`] deciding which failures are worth another
//! attempt.
//!
//! The implementations are:
//! - Generic over error types (`<E: Debug>`)
//! - Transparent about failures: the last error is always returned
//! - Testable with a paused tokio clock (`tokio::time::pause`)
//!
//! Domain crates supply the policy. The backend-access layer in
//! `learnhub-infra` maps its error categories onto [`RetryDecision`]s and
//! composes them with the exponential schedule configured here.

pub mod retry;

// Re-export retry types
pub use retry::{
    policies, retry, retry_with_policy, BackoffStrategy, ConfigError, Jitter, RetryConfig,
    RetryConfigBuilder, RetryDecision, RetryExecutor, RetryOutcome, RetryPolicy,
};
