//! Common error classification primitives
//!
//! Every error type that crosses a retry boundary implements
//! [`ErrorClassification`] so the retry layer, logging and diagnostics can
//! ask the same questions of any failure:
//!
//! - **`is_retryable()`**: Can this operation be retried?
//! - **`severity()`**: How serious is this error? (Info/Warning/Error/Critical)
//! - **`is_critical()`**: Does this require immediate attention?
//! - **`retry_after()`**: Suggested retry delay (if applicable)
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Informational, expected conditions | Resource not found, empty results |
//! | **Warning** | Degraded but operational | Transient network failures, 5xx responses |
//! | **Error** | Failure requiring attention | Rejected credentials, invalid input |
//! | **Critical** | System integrity at risk | Missing configuration, internal errors |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use learnhub_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Unavailable,
//!     Rejected,
//! }
//!
//! impl ErrorClassification for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Unavailable)
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Unavailable => ErrorSeverity::Warning,
//!             Self::Rejected => ErrorSeverity::Error,
//!         }
//!     }
//!
//!     fn retry_after(&self) -> Option<Duration> {
//!         None
//!     }
//! }
//!
//! assert!(FetchError::Unavailable.is_retryable());
//! assert!(!FetchError::Rejected.is_critical());
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as dropped connections, timeouts or temporary service
    /// unavailability.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when a specific delay is recommended (e.g.
    /// from a `Retry-After` header), or `None` to use the caller's backoff.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl ErrorSeverity {
    /// Stable lowercase label for structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
