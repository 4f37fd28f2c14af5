//! account-polld - Background account polling service
//!
//! This binary runs as a user service and:
//! - Polls every enabled account through its plugin
//! - Forwards the resulting push messages to the push relay
//! - Throttles accounts whose credentials expired or whose backend fails
//! - Shuts down gracefully on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! Each account runs in its own worker task (see [`worker`]). Push records
//! go to stdout as JSON lines, logs go to stderr. All workers share a
//! `CancellationToken` that is triggered on receipt of SIGTERM or SIGINT.

mod transport;
mod worker;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use polld_core::{
    config::Config,
    domain::{AccountData, ApplicationId},
    ports::IPushTransport,
    usecases::{MessageBuilder, NotificationDefaults, PollAccountUseCase},
};
use polld_plugins::registry::PluginRegistry;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{transport::JsonLinesTransport, worker::AccountWorker};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "account-polld", version, about = "Polls online accounts and forwards push notifications")]
struct Cli {
    /// Configuration file (defaults to $XDG_CONFIG_HOME/account-polld/config.yaml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Poll every account once and exit
    #[arg(long)]
    once: bool,
}

/// Loads the configuration named on the command line, or the default one
///
/// An explicitly given file must exist and parse. The default file is
/// optional; built-in defaults apply when it is missing.
fn load_config(cli: &Cli) -> Result<(PathBuf, Config)> {
    match &cli.config {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            Ok((path.clone(), config))
        }
        None => {
            let path = Config::default_path();
            let config = Config::load_or_default(&path);
            Ok((path, config))
        }
    }
}

/// Daemon service that owns the account workers
struct DaemonService {
    config: Config,
    registry: PluginRegistry,
    builder: MessageBuilder,
    usecase: Arc<PollAccountUseCase>,
    shutdown: CancellationToken,
}

impl DaemonService {
    fn new(
        config: Config,
        registry: PluginRegistry,
        transport: Arc<dyn IPushTransport>,
        shutdown: CancellationToken,
    ) -> Result<Self> {
        let defaults = NotificationDefaults::from_config(&config.notifications)
            .context("Invalid notification defaults")?;
        info!(tag = %defaults.tag, "Notification defaults ready");

        Ok(Self {
            config,
            registry,
            builder: MessageBuilder::new(defaults),
            usecase: Arc::new(PollAccountUseCase::new(transport)),
            shutdown,
        })
    }

    /// Creates one worker per enabled account
    ///
    /// Accounts that cannot be set up (unknown plugin, bad application id)
    /// are logged and skipped so the remaining accounts keep working.
    fn build_workers(&self) -> Vec<AccountWorker> {
        let mut workers = Vec::new();

        for account in self.config.enabled_accounts() {
            let app_id = match account
                .application_id
                .as_deref()
                .map(ApplicationId::new)
                .transpose()
            {
                Ok(app_id) => app_id,
                Err(e) => {
                    error!(plugin = %account.plugin, id = account.id, error = %e, "Skipping account");
                    continue;
                }
            };

            let (descriptor, plugin) =
                match self.registry.create(&account.plugin, app_id, self.builder.clone()) {
                    Ok(created) => created,
                    Err(e) => {
                        let err_msg = format!("{e:#}");
                        error!(plugin = %account.plugin, id = account.id, error = %err_msg, "Skipping account");
                        continue;
                    }
                };

            let data = AccountData::new(
                account.id,
                account.plugin.clone(),
                account.service_id.clone(),
                account.auth.clone(),
            );
            info!(
                account = %data,
                category = %descriptor.category,
                "Account registered"
            );

            workers.push(AccountWorker::new(
                data,
                plugin,
                descriptor.priority,
                Arc::clone(&self.usecase),
                self.config.polling.clone(),
            ));
        }

        workers
    }

    /// Runs every worker until shutdown
    async fn run(&self) -> Result<()> {
        let workers = self.build_workers();
        if workers.is_empty() {
            warn!("No enabled accounts configured, waiting for shutdown");
            self.shutdown.cancelled().await;
            return Ok(());
        }

        info!(accounts = workers.len(), "Starting poll loop");

        let mut tasks = JoinSet::new();
        for worker in workers {
            tasks.spawn(worker.run(self.shutdown.child_token()));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Account worker task failed");
            }
        }

        info!("Poll loop terminated");
        Ok(())
    }

    /// Polls every account a single time
    async fn run_once(&self) -> Result<()> {
        for mut worker in self.build_workers() {
            let action = worker.poll_once().await;
            info!(account = %worker.account(), action = ?action, "Poll finished");
        }
        Ok(())
    }
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config_path, config) = load_config(&cli)?;

    // stdout carries push records, so logs go to stderr
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(config_path = %config_path.display(), "account-polld starting");

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!(field = %e.field, "{}", e.message);
        }
        anyhow::bail!("Configuration has {} error(s)", errors.len());
    }

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let service = DaemonService::new(
        config,
        PluginRegistry::new(),
        Arc::new(JsonLinesTransport::stdout()),
        shutdown_token,
    )?;

    let result = if cli.once {
        service.run_once().await
    } else {
        service.run().await
    };

    match &result {
        Ok(()) => info!("account-polld shut down gracefully"),
        Err(e) => error!(error = %e, "account-polld exiting with error"),
    }

    result
}

#[cfg(test)]
mod tests {
    use polld_core::{
        config::{AccountConfig, ConfigBuilder},
        domain::{auth::keys, AuthTokens},
    };

    use super::*;

    fn account(id: u32, plugin: &str) -> AccountConfig {
        AccountConfig {
            id,
            plugin: plugin.to_string(),
            service_id: "poll".to_string(),
            enabled: true,
            application_id: None,
            auth: AuthTokens::new().with(keys::ACCESS_TOKEN, "token"),
        }
    }

    fn service(config: Config) -> DaemonService {
        DaemonService::new(
            config,
            PluginRegistry::new(),
            Arc::new(JsonLinesTransport::new(Vec::new())),
            CancellationToken::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_cli_parses_config_and_once() {
        let cli = Cli::try_parse_from(["account-polld", "--config", "/tmp/polld.yaml", "--once"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/polld.yaml")));
        assert!(cli.once);

        let cli = Cli::try_parse_from(["account-polld"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.once);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli::try_parse_from(["account-polld", "--config", "/nonexistent/polld.yaml"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[tokio::test]
    async fn test_build_workers_skips_disabled_and_unknown_accounts() {
        let mut disabled = account(2, "gmail");
        disabled.enabled = false;
        let config = ConfigBuilder::new()
            .account(account(1, "gmail"))
            .account(disabled)
            .account(account(3, "no-such-plugin"))
            .build();

        let workers = service(config).build_workers();

        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].account().id(), 1);
    }

    #[tokio::test]
    async fn test_build_workers_skips_invalid_application_id() {
        let mut bad = account(1, "gmail");
        bad.application_id = Some("has space".to_string());
        let config = ConfigBuilder::new().account(bad).build();

        assert!(service(config).build_workers().is_empty());
    }

    #[tokio::test]
    async fn test_run_without_accounts_returns_on_shutdown() {
        let svc = service(Config::default());
        svc.shutdown.cancel();
        svc.run().await.unwrap();
    }

    #[test]
    fn test_blank_configured_tag_is_rejected() {
        let config = ConfigBuilder::new().notifications_tag("  ").build();
        let result = DaemonService::new(
            config,
            PluginRegistry::new(),
            Arc::new(JsonLinesTransport::new(Vec::new())),
            CancellationToken::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cancellation_token_child_propagation() {
        let parent = CancellationToken::new();
        let child1 = parent.child_token();
        let child2 = parent.child_token();

        parent.cancel();

        assert!(child1.is_cancelled());
        assert!(child2.is_cancelled());
    }
}
