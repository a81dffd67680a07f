//! Liveness payload served at `/health`

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Liveness of the HTTP service itself.
///
/// Says nothing about the backend; `/api/diagnostics/*` covers that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Unix timestamp when the check was answered
    pub timestamp: i64,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().timestamp(),
        }
    }
}
