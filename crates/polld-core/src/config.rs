//! Configuration module for account-polld.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{ApplicationId, AuthTokens, Priority};
use crate::usecases::build_message::{DEFAULT_SOUND, DEFAULT_VIBRATION_MS};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for account-polld.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notifications: NotificationsConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
    pub accounts: Vec<AccountConfig>,
}

/// Defaults applied to standard notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Sound path, searched within `XDG_DATA_DIRS`.
    pub sound: String,
    /// Vibration length in milliseconds.
    pub vibration_ms: u32,
    /// Notification tag. `None` uses the name the daemon was invoked as.
    pub tag: Option<String>,
}

/// Polling cadence and throttling, all in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval for `Priority::Maximum` plugins.
    pub maximum: u64,
    /// Interval for `Priority::High` plugins.
    pub high: u64,
    /// Interval for `Priority::Default` plugins.
    pub default: u64,
    /// Interval for `Priority::Low` plugins.
    pub low: u64,
    /// Upper bound for a single poll before it is abandoned.
    pub timeout: u64,
    /// Wait after a plugin reported expired credentials.
    pub token_expired_backoff: u64,
    /// Wait after any other poll failure.
    pub failure_backoff: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

/// One account the daemon polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account number, unique per plugin and service.
    pub id: u32,
    /// Registry id of the plugin (e.g. `gmail`).
    pub plugin: String,
    /// Service the account is enabled for.
    #[serde(default)]
    pub service_id: String,
    /// Disabled accounts are skipped.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Overrides the plugin's default delivery target.
    #[serde(default)]
    pub application_id: Option<String>,
    /// Credential material handed to the plugin.
    #[serde(default)]
    pub auth: AuthTokens,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/account-polld/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("account-polld")
            .join("config.yaml")
    }

    /// Accounts with `enabled: true`.
    pub fn enabled_accounts(&self) -> impl Iterator<Item = &AccountConfig> {
        self.accounts.iter().filter(|a| a.enabled)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            sound: DEFAULT_SOUND.to_string(),
            vibration_ms: DEFAULT_VIBRATION_MS,
            tag: None,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            maximum: 60,
            high: 300,
            default: 900,
            low: 3600,
            timeout: 60,
            token_expired_backoff: 1800,
            failure_backoff: 300,
        }
    }
}

impl PollingConfig {
    /// Polling interval for plugins of the given priority.
    pub fn interval_for(&self, priority: Priority) -> Duration {
        let secs = match priority {
            Priority::Maximum => self.maximum,
            Priority::High => self.high,
            Priority::Default => self.default,
            Priority::Low => self.low,
        };
        Duration::from_secs(secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn token_expired_backoff(&self) -> Duration {
        Duration::from_secs(self.token_expired_backoff)
    }

    pub fn failure_backoff(&self) -> Duration {
        Duration::from_secs(self.failure_backoff)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"polling.high"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- notifications ---
        if self.notifications.vibration_ms == 0 {
            errors.push(ValidationError {
                field: "notifications.vibration_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        if let Some(tag) = &self.notifications.tag {
            if tag.trim().is_empty() {
                errors.push(ValidationError {
                    field: "notifications.tag".into(),
                    message: "must not be blank".into(),
                });
            }
        }

        // --- polling ---
        let polling = [
            ("polling.maximum", self.polling.maximum),
            ("polling.high", self.polling.high),
            ("polling.default", self.polling.default),
            ("polling.low", self.polling.low),
            ("polling.timeout", self.polling.timeout),
            ("polling.token_expired_backoff", self.polling.token_expired_backoff),
            ("polling.failure_backoff", self.polling.failure_backoff),
        ];
        for (field, value) in polling {
            if value == 0 {
                errors.push(ValidationError {
                    field: field.into(),
                    message: "must be greater than 0".into(),
                });
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        // --- accounts ---
        let mut seen = HashSet::new();
        for (i, account) in self.accounts.iter().enumerate() {
            if account.plugin.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("accounts[{i}].plugin"),
                    message: "must not be empty".into(),
                });
            }
            if let Some(app_id) = &account.application_id {
                if let Err(e) = ApplicationId::new(app_id.clone()) {
                    errors.push(ValidationError {
                        field: format!("accounts[{i}].application_id"),
                        message: e.to_string(),
                    });
                }
            }
            if !seen.insert((&account.plugin, account.id, &account.service_id)) {
                errors.push(ValidationError {
                    field: format!("accounts[{i}]"),
                    message: format!(
                        "duplicate account {}#{} for service '{}'",
                        account.plugin, account.id, account.service_id
                    ),
                });
            }
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Config`], starting from defaults.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from [`Config::default`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // -- notifications --

    pub fn notifications_sound(mut self, sound: impl Into<String>) -> Self {
        self.config.notifications.sound = sound.into();
        self
    }

    pub fn notifications_vibration_ms(mut self, ms: u32) -> Self {
        self.config.notifications.vibration_ms = ms;
        self
    }

    pub fn notifications_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.notifications.tag = Some(tag.into());
        self
    }

    // -- polling --

    pub fn polling_interval(mut self, priority: Priority, seconds: u64) -> Self {
        match priority {
            Priority::Maximum => self.config.polling.maximum = seconds,
            Priority::High => self.config.polling.high = seconds,
            Priority::Default => self.config.polling.default = seconds,
            Priority::Low => self.config.polling.low = seconds,
        }
        self
    }

    pub fn polling_timeout(mut self, seconds: u64) -> Self {
        self.config.polling.timeout = seconds;
        self
    }

    pub fn polling_token_expired_backoff(mut self, seconds: u64) -> Self {
        self.config.polling.token_expired_backoff = seconds;
        self
    }

    pub fn polling_failure_backoff(mut self, seconds: u64) -> Self {
        self.config.polling.failure_backoff = seconds;
        self
    }

    // -- logging --

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // -- accounts --

    pub fn account(mut self, account: AccountConfig) -> Self {
        self.config.accounts.push(account);
        self
    }

    /// Consume the builder and return the configuration (no validation).
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the configuration or errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
