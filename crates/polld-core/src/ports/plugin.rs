//! Plugin port (driven/secondary port)
//!
//! This module defines the capability surface the daemon uses to poll any
//! data source. There is one implementation per supported backend service
//! (email provider, social network, ...), each independent of the others.
//!
//! ## Design Notes
//!
//! - `poll` takes `&mut self`: the daemon never polls one plugin instance
//!   re-entrantly, so implementations may keep per-account state such as
//!   "already notified" sets without synchronization.
//! - Different plugin instances may be polled concurrently on separate
//!   tasks, hence the `Send` bound.
//! - Credential expiry is a dedicated [`PluginError::TokenExpired`] variant
//!   so the daemon never has to inspect error text.

use thiserror::Error;

use crate::domain::{ApplicationId, AuthTokens, DomainError, PushMessage};

// ============================================================================
// PluginError
// ============================================================================

/// Failure of a poll cycle
#[derive(Debug, Error)]
pub enum PluginError {
    /// The backend reported the supplied credentials as invalid or expired
    ///
    /// Plugins must return this variant as-is rather than wrapping it. The
    /// daemon reacts by requesting fresh credentials and throttling the
    /// account.
    #[error("Token expired")]
    TokenExpired,

    /// Any other failure: network errors, malformed responses, rate limits
    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

impl PluginError {
    /// Creates a generic failure from a message
    pub fn failure(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        PluginError::Failure(anyhow::Error::msg(message))
    }

    /// Returns true if this is the credential-expiry signal
    pub fn is_token_expired(&self) -> bool {
        matches!(self, PluginError::TokenExpired)
    }
}

impl From<DomainError> for PluginError {
    fn from(err: DomainError) -> Self {
        PluginError::Failure(err.into())
    }
}

// ============================================================================
// IPlugin trait
// ============================================================================

/// Port trait for a data-source adapter
///
/// ## Implementation Notes
///
/// - `application_id` is a pure accessor whose value is fixed at
///   construction; the daemon routes every message from this plugin to it.
/// - `poll` runs one cycle against the backend with the supplied
///   credentials. It must not keep the credentials after returning.
/// - Each implementation documents its own ordering and dedup policy; the
///   contract does not require repeated polls to be idempotent.
/// - A poll either returns a complete batch or an error. Nothing is
///   reported partially.
#[async_trait::async_trait]
pub trait IPlugin: Send {
    /// Application the resulting push messages are delivered to
    fn application_id(&self) -> &ApplicationId;

    /// Performs one polling cycle
    ///
    /// # Arguments
    /// * `auth` - Credential material for the account, read-only
    ///
    /// # Returns
    /// The push messages for events discovered by this cycle, possibly none
    ///
    /// # Errors
    /// - [`PluginError::TokenExpired`] if the backend rejected the credentials
    /// - [`PluginError::Failure`] for every other failure
    async fn poll(&mut self, auth: &AuthTokens) -> Result<Vec<PushMessage>, PluginError>;
}
