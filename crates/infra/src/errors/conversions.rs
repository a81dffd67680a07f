//! Conversions from external infrastructure errors into domain errors.

use learnhub_domain::{BackendError, LearnHubError, TransportKind};
use reqwest::Error as HttpError;
use reqwest::Response;
use serde::Deserialize;
use thiserror::Error;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub BackendError);

impl From<InfraError> for BackendError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<InfraError> for LearnHubError {
    fn from(value: InfraError) -> Self {
        value.0.into()
    }
}

impl From<BackendError> for InfraError {
    fn from(value: BackendError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBackendError {
    fn into_backend(self) -> BackendError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BackendError */
/* -------------------------------------------------------------------------- */

impl IntoBackendError for HttpError {
    fn into_backend(self) -> BackendError {
        backend_error_from_reqwest(&self)
    }
}

/// Map a borrowed reqwest error, for callers that only hold a reference.
pub(crate) fn backend_error_from_reqwest(err: &HttpError) -> BackendError {
    let message = err.to_string();

    if err.is_timeout() {
        return BackendError::transport(TransportKind::Timeout, message);
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return BackendError::transport(TransportKind::Connect, message);
    }

    if err.is_builder() {
        return BackendError::transport(TransportKind::RequestBuild, message);
    }

    if err.is_decode() {
        return BackendError::decode(message);
    }

    if let Some(status) = err.status() {
        let code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("unknown status");
        return BackendError::http(code, reason);
    }

    if err.is_request() || err.is_body() {
        return BackendError::transport(TransportKind::Other, message);
    }

    BackendError::from_message(message)
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_backend())
    }
}

/* -------------------------------------------------------------------------- */
/* Error responses → BackendError */
/* -------------------------------------------------------------------------- */

/// Error body shapes returned by the backend's REST and auth services.
///
/// REST errors carry `code`/`message`; the auth service uses either
/// `error`/`error_description` or `error_code`/`msg`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    error: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> Option<String> {
        let code = match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            _ => None,
        };
        code.or_else(|| self.error_code.clone()).or_else(|| self.error.clone())
    }

    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
    }
}

/// Normalise a non-success response into a [`BackendError`].
///
/// Structured bodies become [`BackendError::Provider`]; anything else becomes
/// [`BackendError::Http`] with the raw body (or the status reason) as message.
pub async fn error_from_response(response: Response) -> BackendError {
    let status = response.status();
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("unknown status").to_string();

    error_from_read(code, &reason, response.text().await)
}

/// The status is authoritative; an unreadable body only loses the details.
fn error_from_read<E: std::fmt::Display>(
    status: u16,
    reason: &str,
    body: std::result::Result<String, E>,
) -> BackendError {
    match body {
        Ok(body) => error_from_body(status, reason, &body),
        Err(err) => {
            tracing::debug!(status, error = %err, "failed to read error response body");
            BackendError::http(status, reason)
        }
    }
}

fn error_from_body(status: u16, reason: &str, body: &str) -> BackendError {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message() {
            return BackendError::provider(parsed.code(), Some(status), message);
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        BackendError::http(status, reason)
    } else {
        BackendError::http(status, trimmed)
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
