//! # LearnHub API
//!
//! HTTP service layer - routes and startup wiring.
//!
//! This crate contains:
//! - The client-side log intake (`POST /api/logs`)
//! - Connection diagnostics backed by the backend client facade
//! - Application context (dependency injection)
//! - Tracing setup for the `learnhub` binary

pub mod context;
pub mod routes;
pub mod utils;

pub use context::*;
pub use routes::{router, ApiError, ErrorBody};
