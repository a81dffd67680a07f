//! Client-side logging

pub mod forwarder;

pub use forwarder::LogForwarder;
