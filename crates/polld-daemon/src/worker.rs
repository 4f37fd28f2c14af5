//! Per-account poll worker
//!
//! Each enabled account gets its own worker task. The worker owns the
//! plugin instance, so polls of one account are strictly sequential while
//! different accounts run concurrently. Every poll is bounded by the
//! configured timeout so a hung backend only stalls its own account.

use std::sync::Arc;
use std::time::Duration;

use polld_core::{
    config::PollingConfig,
    domain::{AccountData, Priority},
    ports::IPlugin,
    usecases::{NextAction, PollAccountUseCase, PollOutcome},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Drives the poll cycles of one account
pub struct AccountWorker {
    account: AccountData,
    plugin: Box<dyn IPlugin>,
    priority: Priority,
    usecase: Arc<PollAccountUseCase>,
    polling: PollingConfig,
}

impl AccountWorker {
    pub fn new(
        account: AccountData,
        plugin: Box<dyn IPlugin>,
        priority: Priority,
        usecase: Arc<PollAccountUseCase>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            account,
            plugin,
            priority,
            usecase,
            polling,
        }
    }

    pub fn account(&self) -> &AccountData {
        &self.account
    }

    /// Runs one poll cycle and updates the account state
    ///
    /// A poll exceeding the configured timeout is abandoned and treated as a
    /// generic failure.
    pub async fn poll_once(&mut self) -> NextAction {
        let timeout = self.polling.timeout();
        let outcome = match tokio::time::timeout(
            timeout,
            self.usecase
                .execute(self.plugin.as_mut(), self.account.auth()),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    account = %self.account,
                    timeout_secs = timeout.as_secs(),
                    "Poll timed out"
                );
                PollOutcome::Failed(anyhow::anyhow!("poll timed out after {timeout:?}"))
            }
        };

        let action = outcome.next_action();
        match action {
            NextAction::Continue => {
                if self.account.state().needs_token_refresh() {
                    info!(account = %self.account, "Credentials accepted again");
                    self.account.activate();
                }
            }
            NextAction::RefreshCredentials => {
                warn!(
                    account = %self.account,
                    "Credentials rejected as expired, marking account for refresh"
                );
                self.account.mark_auth_failure();
            }
            NextAction::Backoff => {}
        }
        action
    }

    /// Wait before the next poll
    pub fn delay_after(&self, action: NextAction) -> Duration {
        match action {
            NextAction::Continue => self.polling.interval_for(self.priority),
            NextAction::RefreshCredentials => self.polling.token_expired_backoff(),
            NextAction::Backoff => self.polling.failure_backoff(),
        }
    }

    /// Polls until `shutdown` is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            account = %self.account,
            app_id = %self.plugin.application_id(),
            priority = %self.priority,
            "Starting account worker"
        );

        loop {
            let action = tokio::select! {
                action = self.poll_once() => action,
                _ = shutdown.cancelled() => break,
            };

            let delay = self.delay_after(action);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.cancelled() => break,
            }
        }

        info!(account = %self.account, "Account worker stopped");
    }
}
