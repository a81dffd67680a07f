//! Client-side log forwarding
//!
//! Sends application events to the logging endpoint. Forwarding is best
//! effort: failures are reported through `tracing` and counted, never
//! returned to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use learnhub_domain::constants::LOG_FORWARD_TIMEOUT_MS;
use learnhub_domain::{LearnHubError, LogEntry, LogLevel, LoggingConfig};
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::http::HttpClient;

const CLIENT_LOG_TARGET: &str = "learnhub::client";

/// Forwards log entries to a remote `/api/logs` endpoint.
#[derive(Debug)]
pub struct LogForwarder {
    http: HttpClient,
    endpoint: Url,
    service: String,
    dropped: AtomicU64,
}

impl LogForwarder {
    /// # Errors
    /// Returns `LearnHubError::Config` if the endpoint is not a valid URL.
    pub fn new(config: &LoggingConfig) -> Result<Self, LearnHubError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            LearnHubError::Config(format!("Invalid log endpoint '{}': {}", config.endpoint, e))
        })?;

        let http = HttpClient::builder()
            .timeout(Duration::from_millis(LOG_FORWARD_TIMEOUT_MS))
            .build()
            .map_err(|e| LearnHubError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, endpoint, service: config.service.clone(), dropped: AtomicU64::new(0) })
    }

    /// Number of entries that could not be delivered.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Record `message` locally and forward it.
    #[instrument(skip(self, message, details), fields(service = %self.service))]
    pub async fn log(&self, level: LogLevel, message: impl Into<String>, details: Option<Map<String, Value>>) {
        let mut details = details.unwrap_or_default();
        details
            .entry("service".to_string())
            .or_insert_with(|| Value::String(self.service.clone()));

        let entry = LogEntry::new(level, message).with_details(details);
        mirror(&entry);

        if let Err(reason) = self.forward(&entry).await {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(endpoint = %self.endpoint, %reason, "failed to forward log entry");
        }
    }

    pub async fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None).await;
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None).await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message, None).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, None).await;
    }

    async fn forward(&self, entry: &LogEntry) -> Result<(), String> {
        let request = self.http.request(Method::POST, self.endpoint.clone()).json(entry);
        let response = self.http.send(request).await.map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "log entry forwarded");
            Ok(())
        } else {
            Err(format!("endpoint answered {status}"))
        }
    }
}

fn mirror(entry: &LogEntry) {
    let details = entry.details.as_ref().map(|d| Value::Object(d.clone()));
    match entry.level {
        LogLevel::Debug => debug!(target: CLIENT_LOG_TARGET, ?details, "{}", entry.message),
        LogLevel::Info => info!(target: CLIENT_LOG_TARGET, ?details, "{}", entry.message),
        LogLevel::Warn => warn!(target: CLIENT_LOG_TARGET, ?details, "{}", entry.message),
        LogLevel::Error => error!(target: CLIENT_LOG_TARGET, ?details, "{}", entry.message),
    }
}
