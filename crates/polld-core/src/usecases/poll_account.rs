//! Poll account use case
//!
//! Runs one poll cycle of a plugin, filters out messages that would not
//! render, hands the rest to the push transport, and classifies the result
//! so the scheduler knows what to do next.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::{
    domain::AuthTokens,
    ports::{IPlugin, IPushTransport, PluginError},
};

/// What the scheduler should do after a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Poll again on the plugin's normal cadence
    Continue,
    /// Credentials must be refreshed before the next poll; throttle the account
    RefreshCredentials,
    /// Generic failure; retry after the generic backoff
    Backoff,
}

/// Result of one poll cycle
#[derive(Debug)]
pub enum PollOutcome {
    /// The poll succeeded
    Delivered {
        /// Messages handed to the transport
        delivered: usize,
        /// Messages discarded because they failed validation
        dropped: usize,
    },
    /// The plugin reported expired credentials; nothing was delivered
    TokenExpired,
    /// The poll or the delivery failed
    Failed(anyhow::Error),
}

impl PollOutcome {
    pub fn next_action(&self) -> NextAction {
        match self {
            PollOutcome::Delivered { .. } => NextAction::Continue,
            PollOutcome::TokenExpired => NextAction::RefreshCredentials,
            PollOutcome::Failed(_) => NextAction::Backoff,
        }
    }
}

/// Use case for a single poll cycle of one account
pub struct PollAccountUseCase {
    transport: Arc<dyn IPushTransport>,
}

impl PollAccountUseCase {
    /// Creates a new PollAccountUseCase
    ///
    /// # Arguments
    /// * `transport` - Delivery port the resulting messages are sent through
    pub fn new(transport: Arc<dyn IPushTransport>) -> Self {
        Self { transport }
    }

    /// Polls the plugin once and delivers what it returns
    ///
    /// This method:
    /// 1. Calls [`IPlugin::poll`] with the account's credentials
    /// 2. Drops messages that fail [`PushMessage::validate`](crate::domain::PushMessage::validate)
    /// 3. Delivers the remaining messages in order to the plugin's application
    ///
    /// Delivery stops at the first transport error, which is reported as
    /// [`PollOutcome::Failed`].
    pub async fn execute(&self, plugin: &mut dyn IPlugin, auth: &AuthTokens) -> PollOutcome {
        let app_id = plugin.application_id().clone();
        debug!(app_id = %app_id, "Polling plugin");

        let messages = match plugin.poll(auth).await {
            Ok(messages) => messages,
            Err(PluginError::TokenExpired) => {
                warn!(app_id = %app_id, "Plugin reported expired credentials");
                return PollOutcome::TokenExpired;
            }
            Err(PluginError::Failure(e)) => {
                let err_msg = format!("{e:#}");
                warn!(app_id = %app_id, error = %err_msg, "Poll failed");
                return PollOutcome::Failed(e);
            }
        };

        let mut delivered = 0;
        let mut dropped = 0;

        for message in &messages {
            if let Err(e) = message.validate() {
                warn!(app_id = %app_id, error = %e, "Dropping invalid push message");
                dropped += 1;
                continue;
            }

            if let Err(e) = self
                .transport
                .deliver(&app_id, message)
                .await
                .with_context(|| format!("Failed to deliver push message to {app_id}"))
            {
                return PollOutcome::Failed(e);
            }
            delivered += 1;
        }

        info!(app_id = %app_id, delivered, dropped, "Poll cycle completed");
        PollOutcome::Delivered { delivered, dropped }
    }
}
