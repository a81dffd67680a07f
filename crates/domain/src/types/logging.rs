//! Client-side log entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl_domain_status_conversions!(LogLevel {
    Debug => "debug",
    Info => "info",
    Warn => "warn",
    Error => "error",
});

/// A single log event forwarded from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

/// Reasons a raw log payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogEntryError {
    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("message must be a non-empty string")]
    EmptyMessage,

    #[error("details must be a JSON object")]
    InvalidDetails,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Validate an untyped payload and build an entry from it.
    ///
    /// Level names are matched case-insensitively. A `null` `details` is
    /// treated as absent.
    pub fn from_value(value: Value) -> Result<Self, LogEntryError> {
        let Value::Object(mut object) = value else {
            return Err(LogEntryError::NotAnObject);
        };

        let level = match object.remove("level") {
            Some(Value::String(raw)) => {
                raw.parse::<LogLevel>().map_err(|_| LogEntryError::UnknownLevel(raw))?
            }
            Some(other) => return Err(LogEntryError::UnknownLevel(other.to_string())),
            None => return Err(LogEntryError::MissingField("level")),
        };

        let message = match object.remove("message") {
            Some(Value::String(message)) if !message.trim().is_empty() => message,
            Some(_) => return Err(LogEntryError::EmptyMessage),
            None => return Err(LogEntryError::MissingField("message")),
        };

        let details = match object.remove("details") {
            None | Some(Value::Null) => None,
            Some(Value::Object(details)) => Some(details),
            Some(_) => return Err(LogEntryError::InvalidDetails),
        };

        Ok(Self { level, message, details })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_entry() {
        let entry = LogEntry::from_value(json!({"level": "INFO", "message": "page loaded"})).unwrap();
        assert_eq!(entry, LogEntry::new(LogLevel::Info, "page loaded"));
    }

    #[test]
    fn keeps_object_details() {
        let entry = LogEntry::from_value(json!({
            "level": "error",
            "message": "enrollment failed",
            "details": {"courseId": 42}
        }))
        .unwrap();
        assert_eq!(entry.details.unwrap()["courseId"], 42);
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cases = [
            (json!([1, 2]), LogEntryError::NotAnObject),
            (json!({"message": "x"}), LogEntryError::MissingField("level")),
            (json!({"level": "fatal", "message": "x"}), LogEntryError::UnknownLevel("fatal".into())),
            (json!({"level": "info", "message": "   "}), LogEntryError::EmptyMessage),
            (json!({"level": "info"}), LogEntryError::MissingField("message")),
            (json!({"level": "info", "message": "x", "details": "oops"}), LogEntryError::InvalidDetails),
        ];
        for (payload, expected) in cases {
            assert_eq!(LogEntry::from_value(payload), Err(expected));
        }
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
