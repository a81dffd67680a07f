//! Integration tests for the client-side log forwarder

use learnhub_domain::{LogLevel, LoggingConfig};
use learnhub_infra::logging::LogForwarder;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn forwarder_for(server: &MockServer) -> LogForwarder {
    let config = LoggingConfig {
        endpoint: format!("{}/api/logs", server.uri()),
        service: "learnhub-web".to_string(),
    };
    LogForwarder::new(&config).expect("valid endpoint")
}

/// Scenario: an enrollment failure is reported with its context
#[tokio::test]
async fn test_entry_is_posted_with_service_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logs"))
        .and(body_partial_json(json!({
            "level": "error",
            "message": "enrollment failed",
            "details": {"course_id": 7, "service": "learnhub-web"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let forwarder = forwarder_for(&server).await;

    let mut details = Map::new();
    details.insert("course_id".into(), Value::from(7));
    forwarder.log(LogLevel::Error, "enrollment failed", Some(details)).await;

    assert_eq!(forwarder.dropped(), 0);
}

/// An explicit service in the details is left untouched
#[tokio::test]
async fn test_caller_service_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"details": {"service": "checkout"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let forwarder = forwarder_for(&server).await;

    let mut details = Map::new();
    details.insert("service".into(), Value::from("checkout"));
    forwarder.log(LogLevel::Warn, "payment slow", Some(details)).await;

    assert_eq!(forwarder.dropped(), 0);
}

/// Rejected entries are counted, never surfaced to the caller
#[tokio::test]
async fn test_server_error_counts_as_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let forwarder = forwarder_for(&server).await;

    forwarder.info("page loaded").await;
    forwarder.debug("cache warm").await;

    assert_eq!(forwarder.dropped(), 2);
}
