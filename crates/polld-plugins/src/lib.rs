//! account-polld plugins - data-source adapters
//!
//! Provides [`IPlugin`](polld_core::ports::IPlugin) implementations for
//! backend services and the registry the daemon builds them from.
//!
//! ## Modules
//!
//! - [`client`] - Gmail REST API HTTP client
//! - [`gmail`] - Gmail plugin: unread inbox messages as notifications
//! - [`registry`] - Plugin ids, categories, priorities and constructors

pub mod client;
pub mod gmail;
pub mod registry;

use std::time::Duration;

use polld_core::ports::PluginError;
use thiserror::Error;

/// Errors that can occur when communicating with a backend REST API
#[derive(Debug, Error)]
pub enum BackendError {
    /// Authentication credentials are invalid or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded; the backend may have said when to retry
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Duration the backend asked us to wait
        retry_after: Duration,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<BackendError> for PluginError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized(_) => PluginError::TokenExpired,
            other => PluginError::Failure(other.into()),
        }
    }
}
