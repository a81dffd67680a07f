//! Modular common utilities shared across LearnHub crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification primitives
//! - `runtime`: async resilience (retry executor, backoff, jitter)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use resilience::{
    retry, retry_with_policy, BackoffStrategy, ConfigError, Jitter, RetryConfig,
    RetryConfigBuilder, RetryDecision, RetryExecutor, RetryOutcome, RetryPolicy,
};
