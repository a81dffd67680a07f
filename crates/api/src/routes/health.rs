use axum::Json;

use crate::utils::HealthStatus;

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
