#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use learnhub_api::{router, AppContext, LogSink};
use learnhub_domain::{BackendConfig, LearnHubError, LogEntry, ProbeConfig};
use learnhub_infra::backend::{BackendClient, ConnectionState};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

/// Sink that keeps entries in memory, or fails every write.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Mutex<Vec<LogEntry>>,
    pub fail: bool,
}

impl MemorySink {
    pub fn failing() -> Self {
        Self { entries: Mutex::new(Vec::new()), fail: true }
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn write(&self, entry: &LogEntry) -> Result<(), LearnHubError> {
        if self.fail {
            return Err(LearnHubError::Internal("log store unavailable".into()));
        }
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

/// Backend client bound to `base_url` with its own connection state.
pub fn backend_at(base_url: &str) -> (Arc<BackendClient>, Arc<ConnectionState>) {
    let state = Arc::new(ConnectionState::new());
    let client = BackendClient::builder(BackendConfig {
        url: base_url.to_string(),
        anon_key: "public-anon-key".to_string(),
    })
    .probe(ProbeConfig { timeout_ms: 500, table: "courses".to_string() })
    .connection_state(Arc::clone(&state))
    .request_timeout(Duration::from_secs(2))
    .build()
    .expect("backend client should build");

    (Arc::new(client), state)
}

/// Router whose backend provider always returns `client`.
pub fn app_with_backend(client: Arc<BackendClient>) -> Router {
    let context = AppContext::new(Arc::new(MemorySink::default()))
        .with_backend(move || Ok(Arc::clone(&client)));
    router(context)
}

/// Router whose backend cannot be constructed.
pub fn app_without_backend() -> Router {
    let context = AppContext::new(Arc::new(MemorySink::default())).with_backend(|| {
        Err(LearnHubError::Config(
            "Missing required environment variable: LEARNHUB_BACKEND_URL".into(),
        ))
    });
    router(context)
}

/// Send one request and decode the JSON answer.
pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("request")
}
