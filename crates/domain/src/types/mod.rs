//! Domain types and models

pub mod connection;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use connection::{ConnectionIssue, ConnectionStatus, ConnectionTestResult, TestStage};
pub use logging::{LogEntry, LogEntryError, LogLevel};

/// Category assigned to a failed backend operation.
///
/// Drives both the retry decision and the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The backend could not be reached.
    #[serde(rename = "NETWORK_ERROR")]
    NetworkError,
    /// The backend rejected the caller's credentials.
    #[serde(rename = "AUTH_ERROR")]
    AuthError,
    /// The backend failed while handling the request.
    #[serde(rename = "SERVER_ERROR")]
    ServerError,
    #[default]
    #[serde(rename = "UNKNOWN_ERROR")]
    Unknown,
}

impl ErrorCategory {
    /// Whether another attempt may succeed without caller intervention.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::NetworkError | Self::ServerError)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::AuthError => "AUTH_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCategory::NetworkError).unwrap();
        assert_eq!(json, "\"NETWORK_ERROR\"");

        let parsed: ErrorCategory = serde_json::from_str("\"UNKNOWN_ERROR\"").unwrap();
        assert_eq!(parsed, ErrorCategory::Unknown);
        assert_eq!(ErrorCategory::default(), ErrorCategory::Unknown);
    }

    #[test]
    fn only_network_and_server_are_retryable() {
        assert!(ErrorCategory::NetworkError.is_retryable());
        assert!(ErrorCategory::ServerError.is_retryable());
        assert!(!ErrorCategory::AuthError.is_retryable());
        assert!(!ErrorCategory::Unknown.is_retryable());
    }
}
