//! Gmail REST API client
//!
//! Provides a typed HTTP client for the two Gmail endpoints the plugin
//! needs: listing unread inbox messages and fetching message metadata.
//! The client holds no credentials; the access token is passed per call so
//! nothing outlives a poll cycle.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use polld_plugins::client::GmailClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GmailClient::new();
//! let unread = client.list_unread("access-token-here", 20).await?;
//! println!("{} unread", unread.messages.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::BackendError;

/// Base URL for the Gmail API v1
const GMAIL_BASE_URL: &str = "https://www.googleapis.com/gmail/v1";

/// Search query for messages the plugin reports
const UNREAD_QUERY: &str = "is:unread in:inbox";

/// Default retry-after duration when the header is missing or unparseable
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(30);

// ============================================================================
// Gmail API response types
// ============================================================================

/// Response from `GET /users/me/messages`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(default)]
    result_size_estimate: u32,
}

/// Reference to a message in a list response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
}

/// Unread messages, newest first as returned by the API
#[derive(Debug, Clone, Default)]
pub struct UnreadMessages {
    pub messages: Vec<MessageRef>,
    /// Server-side estimate of the total number of unread messages
    pub total_estimate: u32,
}

/// Response from `GET /users/me/messages/{id}?format=metadata`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    id: String,
    thread_id: String,
    #[serde(default)]
    snippet: String,
    /// Milliseconds since the epoch, as a decimal string
    internal_date: Option<String>,
    payload: Option<PayloadResponse>,
}

#[derive(Debug, Deserialize)]
struct PayloadResponse {
    #[serde(default)]
    headers: Vec<HeaderResponse>,
}

#[derive(Debug, Deserialize)]
struct HeaderResponse {
    name: String,
    value: String,
}

/// Metadata of a single message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadata {
    pub id: String,
    pub thread_id: String,
    pub from: Option<String>,
    pub subject: Option<String>,
    pub snippet: String,
    pub received: Option<DateTime<Utc>>,
}

impl From<MessageResponse> for MessageMetadata {
    fn from(msg: MessageResponse) -> Self {
        let header = |name: &str| {
            msg.payload.as_ref().and_then(|p| {
                p.headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case(name))
                    .map(|h| h.value.clone())
            })
        };
        let from = header("From");
        let subject = header("Subject");

        let received = msg
            .internal_date
            .as_deref()
            .and_then(|ms| ms.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);

        Self {
            id: msg.id,
            thread_id: msg.thread_id,
            from,
            subject,
            snippet: msg.snippet,
            received,
        }
    }
}

// ============================================================================
// GmailClient
// ============================================================================

/// HTTP client for Gmail API calls
#[derive(Debug, Clone)]
pub struct GmailClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
}

impl GmailClient {
    /// Creates a new GmailClient targeting the public Gmail API
    pub fn new() -> Self {
        Self::with_base_url(GMAIL_BASE_URL)
    }

    /// Creates a new GmailClient with a custom base URL (useful for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists unread inbox messages
    ///
    /// # Arguments
    /// * `access_token` - OAuth2 bearer token for the account
    /// * `max_results` - Upper bound on returned references
    pub async fn list_unread(
        &self,
        access_token: &str,
        max_results: u32,
    ) -> Result<UnreadMessages, BackendError> {
        debug!(max_results, "Listing unread Gmail messages");

        let response = self
            .client
            .get(format!("{}/users/me/messages", self.base_url))
            .bearer_auth(access_token)
            .query(&[("q", UNREAD_QUERY.to_string()), ("maxResults", max_results.to_string())])
            .send()
            .await?;

        let list: ListResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("message list: {e}")))?;

        debug!(
            returned = list.messages.len(),
            estimate = list.result_size_estimate,
            "Listed unread messages"
        );

        Ok(UnreadMessages {
            total_estimate: list.result_size_estimate.max(list.messages.len() as u32),
            messages: list.messages,
        })
    }

    /// Fetches the From/Subject headers and snippet of one message
    pub async fn get_message(
        &self,
        access_token: &str,
        id: &str,
    ) -> Result<MessageMetadata, BackendError> {
        debug!(id, "Fetching Gmail message metadata");

        let response = self
            .client
            .get(format!("{}/users/me/messages/{}", self.base_url, id))
            .bearer_auth(access_token)
            .query(&[
                ("format", "metadata"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "Subject"),
            ])
            .send()
            .await?;

        let msg: MessageResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("message {id}: {e}")))?;

        Ok(msg.into())
    }
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps non-success statuses onto [`BackendError`]
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Unauthorized(body))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .map(|v| parse_retry_after(v, DEFAULT_RETRY_AFTER))
                .unwrap_or(DEFAULT_RETRY_AFTER);
            Err(BackendError::TooManyRequests { retry_after })
        }
        s if s.is_server_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::ServerError(format!("{s}: {body}")))
        }
        s => {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::UnexpectedStatus {
                status: s.as_u16(),
                body,
            })
        }
    }
}

/// Parses a `Retry-After` header value
///
/// Accepts integer seconds or an HTTP-date (RFC 2822). HTTP-dates in the
/// past or more than an hour ahead fall back to `default`.
pub fn parse_retry_after(value: &str, default: Duration) -> Duration {
    if let Ok(seconds) = value.trim().parse::<u64>() {
        return Duration::from_secs(seconds);
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(value.trim()) {
        let diff = date.with_timezone(&Utc) - Utc::now();
        if let Some(secs) = diff
            .num_seconds()
            .try_into()
            .ok()
            .filter(|&s: &u64| s <= 3600)
        {
            return Duration::from_secs(secs);
        }
    }

    warn!(value, "Could not parse Retry-After header, using default");
    default
}
