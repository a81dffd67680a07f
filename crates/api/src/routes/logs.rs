//! `POST /api/logs`

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use learnhub_domain::LogEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::ApiError;
use crate::context::AppContext;

/// Acknowledgement for an accepted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAccepted {
    pub success: bool,
}

/// Validate a client log entry and hand it to the sink.
///
/// The body is read raw so malformed JSON gets the same `{success, error}`
/// answer as a structurally invalid entry.
#[instrument(skip_all)]
pub async fn ingest(
    State(context): State<AppContext>,
    body: Bytes,
) -> Result<Json<LogAccepted>, ApiError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {e}")))?;
    let entry = LogEntry::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    context.sink().write(&entry).await.map_err(ApiError::Sink)?;

    Ok(Json(LogAccepted { success: true }))
}
