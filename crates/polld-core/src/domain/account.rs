//! Account domain entity
//!
//! An account pairs one configured service login with the plugin that
//! polls it. Credentials are resolved elsewhere and only carried here.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::auth::AuthTokens;

/// Represents the current state of an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    /// Credentials are believed valid and the account is polled
    #[default]
    Active,
    /// The backend rejected the credentials as expired
    AuthFailed,
}

impl AccountState {
    /// Returns true if the account can be polled on its normal cadence
    pub fn can_poll(&self) -> bool {
        matches!(self, AccountState::Active)
    }

    /// Returns true if the account is waiting for refreshed credentials
    pub fn needs_token_refresh(&self) -> bool {
        matches!(self, AccountState::AuthFailed)
    }
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountState::Active => write!(f, "active"),
            AccountState::AuthFailed => write!(f, "auth_failed"),
        }
    }
}

/// One account the daemon polls
///
/// Identity is `(plugin_id, id, service_id)`; the credential map and state
/// take no part in equality or hashing, so an account keeps its identity
/// across credential refreshes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    /// Account number assigned by the account store
    id: u32,
    /// Registry id of the plugin that handles this account (e.g. `gmail`)
    plugin_id: String,
    /// Service the account is enabled for (e.g. `google-gmail-poll`)
    service_id: String,
    /// Current credential material
    auth: AuthTokens,
    /// Current account state
    #[serde(default)]
    state: AccountState,
}

impl AccountData {
    /// Creates an active account
    pub fn new(
        id: u32,
        plugin_id: impl Into<String>,
        service_id: impl Into<String>,
        auth: AuthTokens,
    ) -> Self {
        Self {
            id,
            plugin_id: plugin_id.into(),
            service_id: service_id.into(),
            auth,
            state: AccountState::Active,
        }
    }

    // --- Getters ---

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn auth(&self) -> &AuthTokens {
        &self.auth
    }

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    // --- State transitions ---

    /// Records that the backend refused the credentials as expired
    pub fn mark_auth_failure(&mut self) {
        self.state = AccountState::AuthFailed;
    }

    /// Installs refreshed credentials and reactivates the account
    pub fn update_auth(&mut self, auth: AuthTokens) {
        self.auth = auth;
        self.state = AccountState::Active;
    }

    /// Returns the account to `Active` once the backend accepts it again
    pub fn activate(&mut self) {
        self.state = AccountState::Active;
    }
}

impl PartialEq for AccountData {
    fn eq(&self, other: &Self) -> bool {
        self.plugin_id == other.plugin_id
            && self.id == other.id
            && self.service_id == other.service_id
    }
}

impl Eq for AccountData {}

impl Hash for AccountData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plugin_id.hash(state);
        self.id.hash(state);
        self.service_id.hash(state);
    }
}

impl std::fmt::Display for AccountData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.plugin_id, self.service_id, self.id)
    }
}
