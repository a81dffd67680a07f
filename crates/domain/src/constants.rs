//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Environment variables
pub const ENV_BACKEND_URL: &str = "LEARNHUB_BACKEND_URL";
pub const ENV_BACKEND_ANON_KEY: &str = "LEARNHUB_BACKEND_ANON_KEY";
pub const ENV_PROBE_TIMEOUT_MS: &str = "LEARNHUB_PROBE_TIMEOUT_MS";
pub const ENV_PROBE_TABLE: &str = "LEARNHUB_PROBE_TABLE";
pub const ENV_LOG_ENDPOINT: &str = "LEARNHUB_LOG_ENDPOINT";
pub const ENV_SERVICE_NAME: &str = "LEARNHUB_SERVICE_NAME";
pub const ENV_BIND_ADDR: &str = "LEARNHUB_BIND_ADDR";
pub const ENV_LOG_FORMAT: &str = "LEARNHUB_LOG_FORMAT";

// Defaults
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PROBE_TABLE: &str = "courses";
pub const DEFAULT_LOG_ENDPOINT: &str = "http://127.0.0.1:3000/api/logs";
pub const DEFAULT_SERVICE_NAME: &str = "learnhub";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const LOG_FORWARD_TIMEOUT_MS: u64 = 3_000;

// Retry schedule for backend calls
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const RETRY_MAX_DELAY_MS: u64 = 300_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

// Backend REST surface
pub const REST_PATH: &str = "/rest/v1/";
pub const AUTH_USER_PATH: &str = "/auth/v1/user";
pub const RPC_PATH: &str = "/rest/v1/rpc/";
pub const API_KEY_HEADER: &str = "apikey";
pub const IS_ADMIN_FUNCTION: &str = "is_admin";

// User-facing troubleshooting messages
pub const MSG_CONNECTION_OK: &str = "Connected to the backend successfully";
pub const MSG_CANNOT_CONNECT: &str =
    "Cannot connect to the backend. Check your internet connection and try again.";
pub const MSG_QUERY_FAILED: &str =
    "Connected to the backend, but the test query failed. The service may be misconfigured.";
