//! Process-wide connection state
//!
//! The online flag is read on every classification, so it lives in an
//! atomic; the last error is only read by diagnostics and sits behind a lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use learnhub_domain::{ConnectionIssue, ConnectionStatus};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

static CONNECTION_STATE: Lazy<Arc<ConnectionState>> =
    Lazy::new(|| Arc::new(ConnectionState::new()));

/// Last observed reachability of the backend.
///
/// Starts online. Only probes write to it; last write wins.
#[derive(Debug)]
pub struct ConnectionState {
    online: AtomicBool,
    last_error: RwLock<Option<ConnectionIssue>>,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self { online: AtomicBool::new(true), last_error: RwLock::new(None) }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ConnectionStatus {
        let error = self.last_error.read().clone();
        ConnectionStatus { online: self.is_online(), error }
    }

    /// Replace the current state.
    pub fn update(&self, status: &ConnectionStatus) {
        let mut last_error = self.last_error.write();
        *last_error = status.error.clone();
        self.online.store(status.online, Ordering::Release);
    }

    pub fn mark_online(&self) {
        self.update(&ConnectionStatus::online());
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the process-wide connection state.
pub fn connection_state() -> Arc<ConnectionState> {
    Arc::clone(&CONNECTION_STATE)
}

/// Current process-wide status, without probing.
pub fn connection_status() -> ConnectionStatus {
    CONNECTION_STATE.snapshot()
}

/// Overwrite the process-wide status.
pub fn set_connection_status(status: &ConnectionStatus) {
    CONNECTION_STATE.update(status);
}
