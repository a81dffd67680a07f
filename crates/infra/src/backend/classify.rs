//! Error classification bound to the connection state
//!
//! The rules themselves live on [`BackendError::category_with`]; this module
//! supplies the online flag and turns arbitrary errors into a
//! [`BackendError`] first.

use std::error::Error as StdError;
use std::sync::Arc;

use learnhub_domain::{BackendError, ErrorCategory, LearnHubError, TransportKind};

use super::status::{connection_state, ConnectionState};
use crate::errors::conversions::backend_error_from_reqwest;

/// Pure classification against an explicit online flag.
pub fn classify(err: &BackendError, online: bool) -> ErrorCategory {
    err.category_with(online)
}

/// Classify against the process-wide online flag.
pub fn classify_error(err: &BackendError) -> ErrorCategory {
    classify(err, connection_state().is_online())
}

/// Normalise any error into a [`BackendError`].
///
/// Known error types keep their structure; anything else is judged by its
/// message.
pub fn normalize(err: &(dyn StdError + 'static)) -> BackendError {
    if let Some(backend) = err.downcast_ref::<BackendError>() {
        return backend.clone();
    }
    if let Some(domain) = err.downcast_ref::<LearnHubError>() {
        return from_domain(domain);
    }
    if let Some(http) = err.downcast_ref::<reqwest::Error>() {
        return backend_error_from_reqwest(http);
    }
    BackendError::from_message(err.to_string())
}

fn from_domain(err: &LearnHubError) -> BackendError {
    match err {
        LearnHubError::Network(message) => {
            BackendError::transport(TransportKind::Other, message.clone())
        }
        LearnHubError::Auth(message) => BackendError::http(401, message.clone()),
        LearnHubError::Server { status, message } => BackendError::http(*status, message.clone()),
        other => BackendError::from_message(other.to_string()),
    }
}

/// Classifier holding its own connection state handle.
///
/// Defaults to the process-wide state; tests pass a private one.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    state: Arc<ConnectionState>,
}

impl ErrorClassifier {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }

    pub fn classify(&self, err: &BackendError) -> ErrorCategory {
        classify(err, self.state.is_online())
    }

    pub fn classify_any(&self, err: &(dyn StdError + 'static)) -> ErrorCategory {
        self.classify(&normalize(err))
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(connection_state())
    }
}
