//! Destinations for log entries received over HTTP

use async_trait::async_trait;
use learnhub_domain::{LearnHubError, LogEntry, LogLevel};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Target used for entries that originate in a client.
pub const CLIENT_LOG_TARGET: &str = "learnhub::client";

/// Where accepted log entries are written.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// # Errors
    /// A failed write is answered with 500 by the logging endpoint.
    async fn write(&self, entry: &LogEntry) -> Result<(), LearnHubError>;
}

/// Writes entries into the process's own `tracing` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl LogSink for TracingSink {
    async fn write(&self, entry: &LogEntry) -> Result<(), LearnHubError> {
        let details = entry.details.clone().map(Value::Object).unwrap_or(Value::Null);
        let message = entry.message.as_str();

        match entry.level {
            LogLevel::Debug => debug!(target: CLIENT_LOG_TARGET, %details, "{message}"),
            LogLevel::Info => info!(target: CLIENT_LOG_TARGET, %details, "{message}"),
            LogLevel::Warn => warn!(target: CLIENT_LOG_TARGET, %details, "{message}"),
            LogLevel::Error => error!(target: CLIENT_LOG_TARGET, %details, "{message}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracing_sink_accepts_every_level() {
        for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            let entry = LogEntry::new(level, "lesson opened");
            assert!(TracingSink.write(&entry).await.is_ok());
        }
    }
}
