//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LEARNHUB_BACKEND_URL`: Backend base URL (required)
//! - `LEARNHUB_BACKEND_ANON_KEY`: Public API key (required)
//! - `LEARNHUB_PROBE_TIMEOUT_MS`: Connection probe timeout in milliseconds
//! - `LEARNHUB_PROBE_TABLE`: Table read by the composite connection test
//! - `LEARNHUB_LOG_ENDPOINT`: URL client-side logs are forwarded to
//! - `LEARNHUB_SERVICE_NAME`: Service name attached to forwarded logs
//! - `LEARNHUB_BIND_ADDR`: Address the HTTP server listens on
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./learnhub.json` or `./learnhub.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use learnhub_domain::constants::{
    ENV_BACKEND_ANON_KEY, ENV_BACKEND_URL, ENV_BIND_ADDR, ENV_LOG_ENDPOINT, ENV_PROBE_TABLE,
    ENV_PROBE_TIMEOUT_MS, ENV_SERVICE_NAME,
};
use learnhub_domain::{
    BackendConfig, Config, LearnHubError, LoggingConfig, ProbeConfig, Result, ServerConfig,
};

const CONFIG_FILE_NAMES: &[&str] =
    &["learnhub.json", "learnhub.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `LearnHubError::Config` if:
/// - Required variables are missing and no config file exists (the error
///   names the missing variable)
/// - A config file exists but its format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(env_err) => {
            tracing::debug!(error = ?env_err, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => Err(env_err),
            }
        }
    }
}

/// Load configuration from environment variables
///
/// Both backend variables must be present; the rest fall back to defaults.
///
/// # Errors
/// Returns `LearnHubError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let backend =
        BackendConfig { url: env_var(ENV_BACKEND_URL)?, anon_key: env_var(ENV_BACKEND_ANON_KEY)? };

    let defaults = ProbeConfig::default();
    let probe = ProbeConfig {
        timeout_ms: match env_opt(ENV_PROBE_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                LearnHubError::Config(format!("Invalid {}: {}", ENV_PROBE_TIMEOUT_MS, e))
            })?,
            None => defaults.timeout_ms,
        },
        table: env_opt(ENV_PROBE_TABLE).unwrap_or(defaults.table),
    };

    let logging_defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        endpoint: env_opt(ENV_LOG_ENDPOINT).unwrap_or(logging_defaults.endpoint),
        service: env_opt(ENV_SERVICE_NAME).unwrap_or(logging_defaults.service),
    };

    let server = ServerConfig { bind: env_opt(ENV_BIND_ADDR).unwrap_or(ServerConfig::default().bind) };

    Ok(Config { backend, probe, logging, server })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `LearnHubError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LearnHubError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LearnHubError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LearnHubError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `LearnHubError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LearnHubError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LearnHubError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(LearnHubError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent,
/// then the same three levels relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `LearnHubError::Config` naming the variable if it is unset or
/// blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        LearnHubError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
