//! Application context - dependency injection container

pub mod sink;

use std::fmt;
use std::sync::Arc;

use learnhub_domain::LearnHubError;
use learnhub_infra::backend::{backend_client, BackendClient};

pub use sink::{LogSink, TracingSink};

/// Resolves the backend client on demand.
pub type BackendProvider =
    Arc<dyn Fn() -> Result<Arc<BackendClient>, LearnHubError> + Send + Sync + 'static>;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppContext {
    sink: Arc<dyn LogSink>,
    backend: BackendProvider,
}

impl AppContext {
    /// Context using the process-wide backend client.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink, backend: Arc::new(backend_client) }
    }

    /// Replace how the backend client is obtained.
    pub fn with_backend<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<Arc<BackendClient>, LearnHubError> + Send + Sync + 'static,
    {
        self.backend = Arc::new(provider);
        self
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    /// # Errors
    /// Returns the construction error when the client cannot be built.
    pub fn backend(&self) -> Result<Arc<BackendClient>, LearnHubError> {
        (self.backend)()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
