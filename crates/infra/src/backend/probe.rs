//! Backend reachability checks
//!
//! A probe never fails: every outcome is folded into a
//! [`ConnectionStatus`] and written to the shared connection state.

use std::sync::Arc;

use learnhub_common::error::ErrorClassification;
use learnhub_domain::constants::{
    MSG_CANNOT_CONNECT, MSG_CONNECTION_OK, MSG_QUERY_FAILED, REST_PATH,
};
use learnhub_domain::{
    BackendError, ConnectionStatus, ConnectionTestResult, ProbeConfig, TestStage,
};
use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use super::classify::classify;
use super::endpoint::RestEndpoint;
use super::query::QueryBuilder;
use super::status::ConnectionState;

/// Probes the backend and records the result.
#[derive(Debug, Clone)]
pub struct ConnectionProber {
    endpoint: Arc<RestEndpoint>,
    config: ProbeConfig,
    state: Arc<ConnectionState>,
}

impl ConnectionProber {
    pub fn new(
        endpoint: Arc<RestEndpoint>,
        config: ProbeConfig,
        state: Arc<ConnectionState>,
    ) -> Self {
        Self { endpoint, config, state }
    }

    pub fn state(&self) -> &Arc<ConnectionState> {
        &self.state
    }

    /// Last recorded status, without probing.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.state.snapshot()
    }

    /// Send a `HEAD` to the REST root and record reachability.
    ///
    /// Any HTTP response counts as reachable, including error statuses.
    #[instrument(skip(self), fields(base_url = %self.endpoint.base_url()))]
    pub async fn check_connection(&self) -> ConnectionStatus {
        let url = match self.endpoint.url(REST_PATH) {
            Ok(url) => url,
            Err(err) => return self.record_failure(&err),
        };

        let request = self.endpoint.request(Method::HEAD, url).timeout(self.config.timeout());

        match self.endpoint.http().send(request).await {
            Ok(response) => {
                debug!(status = %response.status(), "backend reachable");
                let status = ConnectionStatus::online();
                self.state.update(&status);
                status
            }
            Err(err) => self.record_failure(&err),
        }
    }

    /// Reachability probe followed by one representative read.
    ///
    /// Distinguishes "cannot reach the backend" from "reached it, but the
    /// read failed".
    #[instrument(skip(self), fields(table = %self.config.table))]
    pub async fn test_backend_connection(&self) -> ConnectionTestResult {
        let status = self.check_connection().await;
        if !status.online {
            let details = status.error.map(|issue| issue.message);
            return ConnectionTestResult::failed(TestStage::Reachability, MSG_CANNOT_CONNECT, details);
        }

        let query = QueryBuilder::new(Arc::clone(&self.endpoint), self.config.table.clone())
            .select("*")
            .limit(1);

        match query.execute::<serde_json::Value>().await {
            Ok(response) => {
                info!(rows = response.data.len(), "connection test passed");
                ConnectionTestResult::passed(MSG_CONNECTION_OK)
            }
            Err(err) => {
                warn!(error = %err, severity = %err.severity(), "connection test query failed");
                ConnectionTestResult::failed(TestStage::Query, MSG_QUERY_FAILED, Some(err.to_string()))
            }
        }
    }

    fn record_failure(&self, err: &BackendError) -> ConnectionStatus {
        let category = classify(err, self.state.is_online());
        warn!(error = %err, %category, severity = %err.severity(), "backend unreachable");

        let status = ConnectionStatus::offline(category, err.message());
        self.state.update(&status);
        status
    }
}
