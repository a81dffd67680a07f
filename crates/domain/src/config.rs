//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_LOG_ENDPOINT, DEFAULT_PROBE_TABLE, DEFAULT_PROBE_TIMEOUT_MS,
    DEFAULT_SERVICE_NAME,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Backend service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend, e.g. `https://project.example.co`
    pub url: String,
    /// Public (anonymous) API key sent with every request
    #[serde(skip_serializing)]
    pub anon_key: String,
}

/// Connection probe configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_ms: u64,
    /// Table read by the composite connection test
    pub table: String,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_ms: DEFAULT_PROBE_TIMEOUT_MS, table: DEFAULT_PROBE_TABLE.to_string() }
    }
}

/// Client-side log forwarding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub endpoint: String,
    pub service: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_LOG_ENDPOINT.to_string(), service: DEFAULT_SERVICE_NAME.to_string() }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: DEFAULT_BIND_ADDR.to_string() }
    }
}

impl Config {
    /// Configuration with default optional sections for the given backend.
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            probe: ProbeConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
