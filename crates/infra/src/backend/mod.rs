//! Resilient access to the hosted backend
//!
//! - [`status`]: process-wide connection state
//! - [`classify`]: error categories against the online flag
//! - [`probe`]: reachability and composite connection checks
//! - [`client`]: the lazily built facade over queries, auth and RPC
//! - [`retry`]: category-driven retries with exponential backoff

pub mod auth;
pub mod classify;
pub mod client;
pub mod endpoint;
pub mod probe;
pub mod query;
pub mod retry;
pub mod status;

pub use auth::{AuthClient, AuthUser};
pub use classify::{classify, classify_error, normalize, ErrorClassifier};
pub use client::{backend_client, BackendClient, BackendClientBuilder};
pub use endpoint::RestEndpoint;
pub use probe::ConnectionProber;
pub use query::{QueryBuilder, QueryResponse};
pub use retry::{
    backend_retry_config, with_default_retry, with_retry, with_retry_policy, BackendRetryPolicy,
};
pub use status::{connection_state, connection_status, set_connection_status, ConnectionState};
