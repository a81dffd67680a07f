//! Integration tests for error classification
//!
//! Covers the category rules applied to normalised backend errors, and the
//! wire shapes that diagnostics clients depend on.

use learnhub_common::error::{ErrorClassification, ErrorSeverity};
use learnhub_domain::{
    BackendError, ConnectionStatus, ErrorCategory, LearnHubError, TransportKind,
};

// ============================================================================
// Category Rules
// ============================================================================

/// Every 5xx status is a server error, regardless of the variant carrying it
#[test]
fn test_server_error_range() {
    for status in [500, 502, 503, 504, 599] {
        assert_eq!(
            BackendError::http(status, "upstream failure").category(),
            ErrorCategory::ServerError,
            "status {status}"
        );
        assert_eq!(
            BackendError::provider(None, Some(status), "db timeout").category(),
            ErrorCategory::ServerError,
            "provider status {status}"
        );
    }

    assert_eq!(BackendError::http(499, "client closed").category(), ErrorCategory::Unknown);
    assert_eq!(BackendError::http(600, "nonsense").category(), ErrorCategory::Unknown);
}

/// Rejected credentials are recognised by status, code and message
///
/// Scenario: a learner signs in with a wrong password
#[test]
fn test_auth_error_shapes() {
    let shapes = vec![
        BackendError::http(401, "JWT expired"),
        BackendError::http(403, "permission denied for table enrollments"),
        BackendError::provider(Some("invalid_credentials".into()), Some(400), "bad login"),
        BackendError::provider(Some("INVALID_GRANT".into()), None, "refresh token revoked"),
        BackendError::provider(None, Some(400), "Invalid login credentials"),
    ];

    for err in shapes {
        assert_eq!(err.category(), ErrorCategory::AuthError, "{err}");
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }
}

/// Transport failures win over any status the message might mention
#[test]
fn test_transport_failure_precedes_status_rules() {
    let transport = BackendError::transport(TransportKind::Timeout, "HTTP 500 after 30s");
    assert_eq!(transport.category(), ErrorCategory::NetworkError);

    let fetch = BackendError::provider(None, None, "TypeError: Load failed");
    assert_eq!(fetch.category(), ErrorCategory::NetworkError);
}

/// The offline signal classifies everything as a network error
#[test]
fn test_offline_signal_overrides_shape() {
    let shapes = vec![
        BackendError::http(500, "boom"),
        BackendError::http(401, "unauthorized"),
        BackendError::provider(Some("invalid_credentials".into()), None, "nope"),
        BackendError::decode("expected value at line 1"),
        BackendError::other("unexpected"),
    ];

    for err in shapes {
        assert_eq!(err.category_with(false), ErrorCategory::NetworkError, "{err}");
    }
}

/// Unrecognised shapes fall through to the default category
#[test]
fn test_unknown_is_default() {
    let err = BackendError::provider(Some("23505".into()), Some(409), "duplicate key value");
    assert_eq!(err.category(), ErrorCategory::Unknown);
    assert!(!err.is_retryable());
    assert_eq!(BackendError::decode("trailing characters").category(), ErrorCategory::Unknown);
}

// ============================================================================
// Wire Shapes
// ============================================================================

/// Backend errors serialise with a `kind` tag
#[test]
fn test_backend_error_wire_shape() {
    let err = BackendError::transport(TransportKind::Connect, "connection refused");
    let value = serde_json::to_value(&err).unwrap();

    assert_eq!(value["kind"], "transport");
    assert_eq!(value["transport"], "connect");
    assert_eq!(value["message"], "connection refused");

    let back: BackendError = serde_json::from_value(value).unwrap();
    assert_eq!(back, err);
}

/// An offline status built from a classified error carries its category
#[test]
fn test_status_from_classified_error() {
    let err = BackendError::from_message("fetch failed");
    let status = ConnectionStatus::offline(err.category(), err.message());

    let issue = status.error.expect("offline status has an issue");
    assert_eq!(issue.kind, ErrorCategory::NetworkError);
    assert_eq!(issue.message, "fetch failed");
}

/// Domain errors keep the classification of the backend error they wrap
#[test]
fn test_domain_error_classification_follows_backend() {
    let network: LearnHubError = BackendError::from_message("Failed to fetch").into();
    assert!(network.is_retryable());
    assert_eq!(network.severity(), ErrorSeverity::Warning);

    let config = LearnHubError::Config("Missing required environment variable".into());
    assert!(config.is_critical());
    assert!(!config.is_retryable());
}
