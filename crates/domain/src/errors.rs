//! Error types used throughout the application

use std::time::Duration;

use learnhub_common::error::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_domain_status_conversions;
use crate::types::ErrorCategory;

/// Main error type for LearnHub
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LearnHubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LearnHub operations
pub type Result<T> = std::result::Result<T, LearnHubError>;

impl ErrorClassification for LearnHubError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(_) | Self::Internal(_) => ErrorSeverity::Critical,
            Self::Network(_) | Self::Server { .. } => ErrorSeverity::Warning,
            Self::NotFound(_) => ErrorSeverity::Info,
            Self::Auth(_) | Self::Backend(_) | Self::InvalidInput(_) => ErrorSeverity::Error,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// How a request failed before any response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// TCP/TLS connection could not be established
    Connect,
    /// No response within the request timeout
    Timeout,
    /// The request could not be constructed (bad URL, header, body)
    RequestBuild,
    /// The process considers itself offline
    Offline,
    /// Any other transport-level failure
    Other,
}

impl_domain_status_conversions!(TransportKind {
    Connect => "connect",
    Timeout => "timeout",
    RequestBuild => "request_build",
    Offline => "offline",
    Other => "other",
});

/// Message fragments that low-level fetch stacks use for transport failures.
const TRANSPORT_FAILURE_PATTERNS: &[&str] = &[
    "failed to fetch",
    "fetch failed",
    "network error",
    "networkerror",
    "network request failed",
    "load failed",
    "connection refused",
    "error sending request",
];

/// Provider error codes that mean the supplied credentials were rejected.
const INVALID_CREDENTIAL_CODES: &[&str] = &["invalid_credentials", "invalid_grant"];

/// Failure of a backend call, normalised at the point it was caught.
///
/// Every error the backend-access layer sees is converted into one of these
/// variants first; classification then looks only at the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendError {
    /// The request never produced a response.
    #[error("Transport failure ({kind}): {message}")]
    Transport {
        #[serde(rename = "transport")]
        kind: TransportKind,
        message: String,
    },

    /// The provider answered with a non-success status and no structured body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The provider answered with a structured error body.
    #[error("Provider error: {message}")]
    Provider { code: Option<String>, status: Option<u16>, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Anything that fits none of the shapes above.
    #[error("{message}")]
    Other { message: String },
}

impl BackendError {
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport { kind, message: message.into() }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    pub fn provider(code: Option<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider { code, status, message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other { message: message.into() }
    }

    /// Normalise a bare error message.
    ///
    /// Messages that match a known transport-failure phrase become
    /// [`BackendError::Transport`]; everything else becomes
    /// [`BackendError::Other`].
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if looks_like_transport_failure(&message) {
            Self::transport(TransportKind::Other, message)
        } else {
            Self::other(message)
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Provider error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Provider { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. }
            | Self::Http { message, .. }
            | Self::Provider { message, .. }
            | Self::Decode { message }
            | Self::Other { message } => message,
        }
    }

    /// Whether the request failed below HTTP (no response was received).
    pub fn is_transport_failure(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { .. } => false,
            Self::Provider { message, .. } | Self::Decode { message } | Self::Other { message } => {
                looks_like_transport_failure(message)
            }
        }
    }

    /// Whether the provider rejected the supplied credentials.
    pub fn is_invalid_credentials(&self) -> bool {
        if matches!(self.status(), Some(401 | 403)) {
            return true;
        }
        if let Some(code) = self.code() {
            if INVALID_CREDENTIAL_CODES.iter().any(|known| code.eq_ignore_ascii_case(known)) {
                return true;
            }
        }
        matches!(self, Self::Provider { .. })
            && self.message().to_ascii_lowercase().contains("invalid login credentials")
    }

    /// Classify the error given the current online signal.
    ///
    /// Rules apply in order and the first match wins: offline, transport
    /// failure, 5xx status, rejected credentials, otherwise unknown.
    pub fn category_with(&self, online: bool) -> ErrorCategory {
        if !online || self.is_transport_failure() {
            return ErrorCategory::NetworkError;
        }
        if matches!(self.status(), Some(500..=599)) {
            return ErrorCategory::ServerError;
        }
        if self.is_invalid_credentials() {
            return ErrorCategory::AuthError;
        }
        ErrorCategory::Unknown
    }

    /// Classify by shape alone, assuming the process is online.
    pub fn category(&self) -> ErrorCategory {
        self.category_with(true)
    }
}

fn looks_like_transport_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    TRANSPORT_FAILURE_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Judged as if online. Callers that must honour the process-wide online
/// flag retry through `BackendRetryPolicy` in the infra crate instead.
impl ErrorClassification for BackendError {
    fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NetworkError | ErrorCategory::ServerError => ErrorSeverity::Warning,
            ErrorCategory::AuthError | ErrorCategory::Unknown => ErrorSeverity::Error,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl From<BackendError> for LearnHubError {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err.category() {
            ErrorCategory::NetworkError => Self::Network(message),
            ErrorCategory::AuthError => Self::Auth(message),
            ErrorCategory::ServerError => Self::Server {
                status: err.status().unwrap_or(500),
                message: err.message().to_string(),
            },
            ErrorCategory::Unknown => match err.status() {
                Some(404) => Self::NotFound(message),
                _ => Self::Backend(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_variant_is_always_network() {
        let err = BackendError::transport(TransportKind::Connect, "connection refused");
        assert_eq!(err.category(), ErrorCategory::NetworkError);
        assert!(err.is_retryable());
    }

    #[test]
    fn fetch_failure_messages_are_normalised_to_transport() {
        for message in ["TypeError: Failed to fetch", "fetch failed", "NetworkError when attempting"]
        {
            let err = BackendError::from_message(message);
            assert!(matches!(err, BackendError::Transport { kind: TransportKind::Other, .. }));
        }
        assert!(matches!(BackendError::from_message("row not found"), BackendError::Other { .. }));
    }

    #[test]
    fn status_drives_server_and_auth_categories() {
        assert_eq!(BackendError::http(503, "unavailable").category(), ErrorCategory::ServerError);
        assert_eq!(BackendError::http(401, "jwt expired").category(), ErrorCategory::AuthError);
        assert_eq!(BackendError::http(403, "forbidden").category(), ErrorCategory::AuthError);
        assert_eq!(BackendError::http(404, "missing").category(), ErrorCategory::Unknown);
        assert_eq!(BackendError::http(429, "slow down").category(), ErrorCategory::Unknown);
    }

    #[test]
    fn provider_invalid_credentials_is_auth() {
        let by_code = BackendError::provider(Some("invalid_credentials".into()), Some(400), "nope");
        let by_message = BackendError::provider(None, Some(400), "Invalid login credentials");
        assert_eq!(by_code.category(), ErrorCategory::AuthError);
        assert_eq!(by_message.category(), ErrorCategory::AuthError);
        assert!(!by_code.is_retryable());
    }

    #[test]
    fn offline_overrides_every_shape() {
        let shapes = [
            BackendError::http(401, "unauthorized"),
            BackendError::http(500, "boom"),
            BackendError::other("anything"),
        ];
        for err in shapes {
            assert_eq!(err.category_with(false), ErrorCategory::NetworkError);
        }
    }

    #[test]
    fn conversion_into_domain_error_keeps_category() {
        let network: LearnHubError =
            BackendError::transport(TransportKind::Timeout, "timed out").into();
        assert!(matches!(network, LearnHubError::Network(_)));

        let auth: LearnHubError = BackendError::http(401, "unauthorized").into();
        assert!(matches!(auth, LearnHubError::Auth(_)));

        let missing: LearnHubError = BackendError::http(404, "no such table").into();
        assert!(matches!(missing, LearnHubError::NotFound(_)));

        let server: LearnHubError = BackendError::http(502, "bad gateway").into();
        assert_eq!(server, LearnHubError::Server { status: 502, message: "bad gateway".into() });
        assert!(server.is_retryable());

        let conflict: LearnHubError = BackendError::http(409, "duplicate key").into();
        assert!(matches!(conflict, LearnHubError::Backend(_)));
        assert!(!conflict.is_retryable());
    }

    #[test]
    fn learnhub_error_serializes_tagged() {
        let json = serde_json::to_value(LearnHubError::Config("missing url".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Config", "message": "missing url"}));
        assert!(LearnHubError::Config(String::new()).is_critical());
        assert!(LearnHubError::Network(String::new()).is_retryable());
    }
}
