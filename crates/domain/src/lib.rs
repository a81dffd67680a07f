//! # LearnHub Domain
//!
//! Domain types and models for the LearnHub backend-access layer.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - The normalised [`BackendError`] and its category rules
//! - Connection status and diagnostics result types
//! - Client-side log entry types
//! - Configuration structures and constants
//!
//! ## Architecture
//! - Depends only on the foundation tier of `learnhub-common`
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
