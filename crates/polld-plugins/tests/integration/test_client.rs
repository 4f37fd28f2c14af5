//! Integration tests for the Gmail API client
//!
//! Verifies request shape, response parsing and status mapping.

use std::time::Duration;

use polld_plugins::{client::GmailClient, BackendError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, ACCESS_TOKEN};

#[tokio::test]
async fn test_list_unread_parses_references() {
    let server = MockServer::start().await;
    common::mount_unread_list(&server, &[("m2", "t2"), ("m1", "t1")], 1).await;

    let client = GmailClient::with_base_url(server.uri());
    let unread = client.list_unread(ACCESS_TOKEN, 20).await.expect("list_unread failed");

    assert_eq!(unread.messages.len(), 2);
    assert_eq!(unread.messages[0].id, "m2");
    assert_eq!(unread.messages[1].thread_id, "t1");
    assert_eq!(unread.total_estimate, 2);
}

#[tokio::test]
async fn test_list_unread_handles_empty_inbox() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "resultSizeEstimate": 0 })),
        )
        .mount(&server)
        .await;

    let client = GmailClient::with_base_url(server.uri());
    let unread = client.list_unread(ACCESS_TOKEN, 20).await.expect("list_unread failed");

    assert!(unread.messages.is_empty());
    assert_eq!(unread.total_estimate, 0);
}

#[tokio::test]
async fn test_get_message_parses_headers() {
    let server = MockServer::start().await;
    common::mount_message(&server, "m1", "t1", "Alice <alice@example.com>", "Hi", 1_700_000_000_000).await;

    let client = GmailClient::with_base_url(server.uri());
    let meta = client.get_message(ACCESS_TOKEN, "m1").await.expect("get_message failed");

    assert_eq!(meta.id, "m1");
    assert_eq!(meta.from.as_deref(), Some("Alice <alice@example.com>"));
    assert_eq!(meta.subject.as_deref(), Some("Hi"));
    assert_eq!(meta.snippet, "snippet of m1");
}

#[tokio::test]
async fn test_unauthorized_status() {
    let server = MockServer::start().await;
    common::mount_unauthorized(&server).await;

    let client = GmailClient::with_base_url(server.uri());
    let err = client.list_unread("stale", 20).await.unwrap_err();

    assert!(matches!(err, BackendError::Unauthorized(_)));
}

#[tokio::test]
async fn test_too_many_requests_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let client = GmailClient::with_base_url(server.uri());
    let err = client.list_unread(ACCESS_TOKEN, 20).await.unwrap_err();

    match err {
        BackendError::TooManyRequests { retry_after } => {
            assert_eq!(retry_after, Duration::from_secs(12));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_and_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/messages/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = GmailClient::with_base_url(server.uri());

    let err = client.list_unread(ACCESS_TOKEN, 20).await.unwrap_err();
    assert!(matches!(err, BackendError::ServerError(ref body) if body.contains("backend down")));

    let err = client.get_message(ACCESS_TOKEN, "gone").await.unwrap_err();
    assert!(matches!(err, BackendError::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = GmailClient::with_base_url(server.uri());
    let err = client.list_unread(ACCESS_TOKEN, 20).await.unwrap_err();

    assert!(matches!(err, BackendError::InvalidResponse(_)));
}
