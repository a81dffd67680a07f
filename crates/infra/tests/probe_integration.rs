//! Integration tests for the connection prober
//!
//! Runs the prober against a mock backend and against a closed port, and
//! checks both the returned status and what was recorded.

mod support;

use learnhub_domain::{ConnectionStatus, ErrorCategory, TestStage};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use support::{client_for, mock_backend, unreachable_url, ANON_KEY};

/// Scenario: backend answers the HEAD probe
#[tokio::test]
async fn test_check_connection_online() {
    let (server, client, state) = mock_backend().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/"))
        .and(header("apikey", ANON_KEY))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.check_connection().await;

    assert_eq!(status, ConnectionStatus::online());
    assert!(state.is_online());
}

/// Any HTTP answer means the backend is reachable, even an error status
#[tokio::test]
async fn test_check_connection_error_status_is_still_online() {
    let (server, client, state) = mock_backend().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let status = client.check_connection().await;

    assert!(status.online);
    assert!(status.error.is_none());
    assert!(state.is_online());
}

/// Scenario: nothing listens at the backend URL
#[tokio::test]
async fn test_check_connection_offline() {
    let (client, state) = client_for(&unreachable_url());

    let status = client.check_connection().await;

    assert!(!status.online);
    let issue = status.error.expect("offline status carries an issue");
    assert_eq!(issue.kind, ErrorCategory::NetworkError);
    assert!(!issue.message.is_empty());

    assert!(!state.is_online());
    assert_eq!(client.connection_status(), state.snapshot());
}

/// A successful probe clears a previously recorded failure
#[tokio::test]
async fn test_recovery_clears_last_error() {
    let (server, client, state) = mock_backend().await;
    state.update(&ConnectionStatus::offline(ErrorCategory::NetworkError, "fetch failed"));

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.check_connection().await;

    assert_eq!(state.snapshot(), ConnectionStatus::online());
}

/// Slow backends fail the probe once the probe timeout elapses
#[tokio::test]
async fn test_probe_timeout() {
    let (server, client, state) = mock_backend().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)))
        .mount(&server)
        .await;

    let status = client.check_connection().await;

    assert!(!status.online);
    assert_eq!(status.error.map(|issue| issue.kind), Some(ErrorCategory::NetworkError));
    assert!(!state.is_online());
}

/// Composite check: reachable backend and a readable probe table
#[tokio::test]
async fn test_connection_test_passes() {
    let (server, client, _state) = mock_backend().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/courses"))
        .and(query_param("select", "*"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "title": "Rust 101"}])))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.test_connection().await;

    assert!(result.success);
    assert_eq!(result.stage, TestStage::Ok);
}

/// Composite check: reached the backend, but the read failed
#[tokio::test]
async fn test_connection_test_query_failure() {
    let (server, client, _state) = mock_backend().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/courses"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "42P01",
            "message": "relation \"public.courses\" does not exist"
        })))
        .mount(&server)
        .await;

    let result = client.test_connection().await;

    assert!(!result.success);
    assert_eq!(result.stage, TestStage::Query);
    assert!(result.message.contains("query failed"));
    assert!(result.details.unwrap_or_default().contains("courses"));
}

/// Composite check: backend unreachable, no query is attempted
#[tokio::test]
async fn test_connection_test_cannot_connect() {
    let (client, _state) = client_for(&unreachable_url());

    let result = client.test_connection().await;

    assert!(!result.success);
    assert_eq!(result.stage, TestStage::Reachability);
    assert!(result.message.starts_with("Cannot connect"));
    assert!(result.details.is_some());
}
