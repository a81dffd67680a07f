//! Connection troubleshooting endpoints

use axum::extract::State;
use axum::Json;
use learnhub_domain::{ConnectionStatus, ConnectionTestResult};
use tracing::{info, instrument};

use super::ApiError;
use crate::context::AppContext;

/// Last recorded status, without touching the network.
pub async fn connection_status(
    State(context): State<AppContext>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let client = context.backend().map_err(ApiError::BackendUnavailable)?;
    Ok(Json(client.connection_status()))
}

/// Probe the backend now.
#[instrument(skip_all)]
pub async fn check_connection(
    State(context): State<AppContext>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let client = context.backend().map_err(ApiError::BackendUnavailable)?;
    let status = client.check_connection().await;
    info!(online = status.online, "connection probe requested");
    Ok(Json(status))
}

/// Reachability followed by a test query.
#[instrument(skip_all)]
pub async fn test_backend(
    State(context): State<AppContext>,
) -> Result<Json<ConnectionTestResult>, ApiError> {
    let client = context.backend().map_err(ApiError::BackendUnavailable)?;
    let result = client.test_connection().await;
    info!(success = result.success, stage = %result.stage, "backend connection test finished");
    Ok(Json(result))
}
