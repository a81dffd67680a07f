//! Backend client facade
//!
//! One process-wide [`BackendClient`] is built lazily from configuration the
//! first time [`backend_client`] is called. A failed construction is not
//! cached, so a later call can succeed once configuration is fixed.

use std::sync::Arc;
use std::time::Duration;

use learnhub_domain::constants::{IS_ADMIN_FUNCTION, RPC_PATH};
use learnhub_domain::{
    BackendConfig, BackendError, ConnectionStatus, ConnectionTestResult, LearnHubError,
    ProbeConfig,
};
use once_cell::sync::OnceCell;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

use super::auth::AuthClient;
use super::endpoint::RestEndpoint;
use super::probe::ConnectionProber;
use super::query::{self, QueryBuilder, QueryResponse};
use super::status::{connection_state, ConnectionState};
use crate::errors::{error_from_response, InfraError};
use crate::http::HttpClient;

static BACKEND_CLIENT: OnceCell<Arc<BackendClient>> = OnceCell::new();

/// Process-wide backend client, built on first access.
///
/// # Errors
/// Returns `LearnHubError::Config` naming the missing or invalid setting.
pub fn backend_client() -> Result<Arc<BackendClient>, LearnHubError> {
    BACKEND_CLIENT
        .get_or_try_init(|| {
            let config = crate::config::load()?;
            let client = BackendClient::builder(config.backend).probe(config.probe).build()?;
            info!(base_url = %client.base_url(), "backend client initialised");
            Ok::<_, LearnHubError>(Arc::new(client))
        })
        .map(Arc::clone)
}

/// Access to the hosted backend: table queries, auth, RPC and diagnostics.
#[derive(Debug, Clone)]
pub struct BackendClient {
    endpoint: Arc<RestEndpoint>,
    prober: ConnectionProber,
}

impl BackendClient {
    /// Client with default probe settings bound to the process-wide
    /// connection state.
    pub fn new(config: BackendConfig) -> Result<Self, LearnHubError> {
        Self::builder(config).build()
    }

    pub fn builder(config: BackendConfig) -> BackendClientBuilder {
        BackendClientBuilder::new(config)
    }

    pub fn base_url(&self) -> &Url {
        self.endpoint.base_url()
    }

    /// Start a query against `table`.
    pub fn from(&self, table: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(Arc::clone(&self.endpoint), table)
    }

    /// Insert one row or a slice of rows and return what was stored.
    pub async fn insert<R, T>(&self, table: &str, rows: &R) -> Result<QueryResponse<T>, BackendError>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        query::insert(&self.endpoint, table, rows).await
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.endpoint)
    }

    /// Call a database function as the anonymous role.
    pub async fn rpc<P, T>(&self, function: &str, params: &P) -> Result<T, BackendError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_rpc(function, params, None).await
    }

    /// Call a database function as the user owning `access_token`.
    pub async fn rpc_as<P, T>(
        &self,
        function: &str,
        params: &P,
        access_token: &str,
    ) -> Result<T, BackendError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_rpc(function, params, Some(access_token)).await
    }

    /// Whether the user owning `access_token` has the admin role.
    #[instrument(skip_all)]
    pub async fn is_admin(&self, access_token: &str) -> Result<bool, BackendError> {
        self.rpc_as(IS_ADMIN_FUNCTION, &serde_json::json!({}), access_token).await
    }

    /// Probe the backend now and record the result.
    pub async fn check_connection(&self) -> ConnectionStatus {
        self.prober.check_connection().await
    }

    /// Last recorded status, without probing.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.prober.connection_status()
    }

    /// Composite reachability-then-query check.
    pub async fn test_connection(&self) -> ConnectionTestResult {
        self.prober.test_backend_connection().await
    }

    pub fn prober(&self) -> &ConnectionProber {
        &self.prober
    }

    #[instrument(skip(self, params, access_token))]
    async fn call_rpc<P, T>(
        &self,
        function: &str,
        params: &P,
        access_token: Option<&str>,
    ) -> Result<T, BackendError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint.url(&format!("{RPC_PATH}{function}"))?;
        let request = match access_token {
            Some(token) => self.endpoint.request_as(Method::POST, url, token),
            None => self.endpoint.request(Method::POST, url),
        }
        .json(params);

        let response = self.endpoint.http().send(request).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response.json().await.map_err(|err| BackendError::from(InfraError::from(err)))
    }
}

/// Builder for [`BackendClient`].
#[derive(Debug)]
pub struct BackendClientBuilder {
    backend: BackendConfig,
    probe: ProbeConfig,
    state: Option<Arc<ConnectionState>>,
    request_timeout: Duration,
}

impl BackendClientBuilder {
    fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            probe: ProbeConfig::default(),
            state: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }

    /// Record probe results in `state` instead of the process-wide state.
    pub fn connection_state(mut self, state: Arc<ConnectionState>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<BackendClient, LearnHubError> {
        let http = HttpClient::builder()
            .timeout(self.request_timeout)
            .user_agent(concat!("learnhub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LearnHubError::Config(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = Arc::new(RestEndpoint::new(&self.backend, http)?);
        let state = self.state.unwrap_or_else(connection_state);
        let prober = ConnectionProber::new(Arc::clone(&endpoint), self.probe, state);

        Ok(BackendClient { endpoint, prober })
    }
}
