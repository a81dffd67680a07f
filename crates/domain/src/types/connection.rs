//! Connection status and troubleshooting results

use serde::{Deserialize, Serialize};

use super::ErrorCategory;
use crate::impl_domain_status_conversions;

/// Why the last probe considered the backend unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionIssue {
    #[serde(rename = "type")]
    pub kind: ErrorCategory,
    pub message: String,
}

/// Reachability of the backend as last observed by a probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ConnectionIssue>,
}

impl ConnectionStatus {
    pub fn online() -> Self {
        Self { online: true, error: None }
    }

    pub fn offline(kind: ErrorCategory, message: impl Into<String>) -> Self {
        Self { online: false, error: Some(ConnectionIssue { kind, message: message.into() }) }
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::online()
    }
}

/// Step of the composite connection test that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStage {
    /// The backend could not be reached at all
    Reachability,
    /// The backend was reached but a representative read failed
    Query,
    /// Every step passed
    Ok,
}

impl_domain_status_conversions!(TestStage {
    Reachability => "reachability",
    Query => "query",
    Ok => "ok",
});

/// Outcome of the connection troubleshooter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub stage: TestStage,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ConnectionTestResult {
    pub fn passed(message: impl Into<String>) -> Self {
        Self { success: true, stage: TestStage::Ok, message: message.into(), details: None }
    }

    pub fn failed(stage: TestStage, message: impl Into<String>, details: Option<String>) -> Self {
        Self { success: false, stage, message: message.into(), details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn online_status_omits_error() {
        let value = serde_json::to_value(ConnectionStatus::online()).unwrap();
        assert_eq!(value, json!({"online": true}));
    }

    #[test]
    fn offline_status_uses_type_key() {
        let status = ConnectionStatus::offline(ErrorCategory::NetworkError, "connection refused");
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({"online": false, "error": {"type": "NETWORK_ERROR", "message": "connection refused"}})
        );

        let back: ConnectionStatus = serde_json::from_value(value).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn test_result_stage_is_lowercase() {
        let result = ConnectionTestResult::failed(
            TestStage::Reachability,
            "Cannot connect",
            Some("timeout".to_string()),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["stage"], "reachability");
        assert_eq!(value["success"], false);
        assert_eq!("QUERY".parse::<TestStage>(), Ok(TestStage::Query));
    }
}
