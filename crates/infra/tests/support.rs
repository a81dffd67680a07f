#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use learnhub_domain::{BackendConfig, ProbeConfig};
use learnhub_infra::backend::{BackendClient, ConnectionState};
use wiremock::MockServer;

pub const ANON_KEY: &str = "public-anon-key";

/// Client pointed at `base_url`, recording probe results in a private state.
pub fn client_for(base_url: &str) -> (BackendClient, Arc<ConnectionState>) {
    let state = Arc::new(ConnectionState::new());
    let client = BackendClient::builder(BackendConfig {
        url: base_url.to_string(),
        anon_key: ANON_KEY.to_string(),
    })
    .probe(ProbeConfig { timeout_ms: 500, table: "courses".to_string() })
    .connection_state(Arc::clone(&state))
    .request_timeout(Duration::from_secs(2))
    .build()
    .expect("backend client should build");

    (client, state)
}

/// Mock backend plus a client bound to it.
pub async fn mock_backend() -> (MockServer, BackendClient, Arc<ConnectionState>) {
    let server = MockServer::start().await;
    let (client, state) = client_for(&server.uri());
    (server, client, state)
}

/// URL of a local port with nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener); // release the port so that requests fail with ECONNREFUSED
    format!("http://{addr}")
}
