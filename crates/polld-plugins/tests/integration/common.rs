//! Shared test helpers for Gmail plugin integration tests
//!
//! Provides wiremock-based mock server setup for the Gmail API endpoints.
//! Each helper mounts the necessary mock endpoints; `setup_gmail_mock`
//! returns a plugin pointing at the mock server.

use polld_core::{
    domain::{auth::keys, ApplicationId, AuthTokens, Tag},
    usecases::{MessageBuilder, NotificationDefaults},
};
use polld_plugins::{client::GmailClient, gmail::GmailPlugin};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "test-access-token";
pub const APP_ID: &str = "com.example.gmail_gmail";

/// Starts a mock server and returns a plugin pointing at it
pub async fn setup_gmail_mock() -> (MockServer, GmailPlugin) {
    let server = MockServer::start().await;
    let plugin = GmailPlugin::new(
        ApplicationId::new(APP_ID).unwrap(),
        GmailClient::with_base_url(server.uri()),
        MessageBuilder::new(NotificationDefaults::new(Tag::new("account-polld").unwrap())),
    );
    (server, plugin)
}

/// Credentials accepted by the mock server
pub fn auth() -> AuthTokens {
    AuthTokens::new().with(keys::ACCESS_TOKEN, ACCESS_TOKEN)
}

/// Mounts the unread listing, answering `times` requests
///
/// `ids` are `(message_id, thread_id)` pairs, newest first.
pub async fn mount_unread_list(server: &MockServer, ids: &[(&str, &str)], times: u64) {
    let messages: Vec<_> = ids
        .iter()
        .map(|(id, thread)| serde_json::json!({ "id": id, "threadId": thread }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .and(query_param("q", "is:unread in:inbox"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": messages,
            "resultSizeEstimate": ids.len()
        })))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Mounts the metadata endpoint for one message
pub async fn mount_message(
    server: &MockServer,
    id: &str,
    thread_id: &str,
    from: &str,
    subject: &str,
    internal_date_ms: i64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/users/me/messages/{id}").as_str()))
        .and(query_param("format", "metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id,
            "threadId": thread_id,
            "snippet": format!("snippet of {id}"),
            "internalDate": internal_date_ms.to_string(),
            "payload": {
                "headers": [
                    { "name": "From", "value": from },
                    { "name": "Subject", "value": subject }
                ]
            }
        })))
        .mount(server)
        .await;
}

/// Mounts a listing endpoint that rejects the credentials
pub async fn mount_unauthorized(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {
                "code": 401,
                "message": "Request had invalid authentication credentials.",
                "status": "UNAUTHENTICATED"
            }
        })))
        .mount(server)
        .await;
}
