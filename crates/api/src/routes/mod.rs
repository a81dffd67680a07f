//! HTTP routes
//!
//! - `GET /health` liveness
//! - `POST /api/logs` client-side log intake
//! - `GET /api/diagnostics/connection` last recorded connection status
//! - `POST /api/diagnostics/connection` probe now
//! - `GET /api/diagnostics/backend` reachability plus test query

pub mod diagnostics;
pub mod health;
pub mod logs;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use learnhub_domain::LearnHubError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::context::AppContext;

/// Build the axum router (separated from `main` for testing).
pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/logs", post(logs::ingest))
        .route(
            "/api/diagnostics/connection",
            get(diagnostics::connection_status).post(diagnostics::check_connection),
        )
        .route("/api/diagnostics/backend", get(diagnostics::test_backend))
        .with_state(context)
}

/// Body of every non-2xx answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// Failures a route can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Backend client unavailable: {0}")]
    BackendUnavailable(LearnHubError),

    #[error("Failed to record log entry: {0}")]
    Sink(LearnHubError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Sink(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }

        (status, Json(ErrorBody { success: false, error: self.to_string() })).into_response()
    }
}
