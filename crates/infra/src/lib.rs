//! # LearnHub Infrastructure
//!
//! All I/O for the LearnHub backend-access layer.
//!
//! This crate contains:
//! - HTTP client construction and error conversions
//! - The connection state, prober and error classifier
//! - The lazily constructed backend client facade
//! - Backend retry policy and `with_retry`
//! - Configuration loading
//! - The client-side log forwarder
//!
//! ## Architecture
//! - Depends on `learnhub-domain` for types and `learnhub-common` for the
//!   generic retry executor
//! - Contains all "impure" code (network, environment, files)

pub mod backend;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;

// Re-export commonly used items
pub use backend::*;
pub use errors::*;
pub use http::{HttpClient, HttpClientBuilder};
pub use logging::*;
