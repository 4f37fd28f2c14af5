//! Credential material handed to plugins
//!
//! The account subsystem resolves credentials for each account and passes
//! them to the plugin on every poll. Plugins read what they need and must
//! not keep the map beyond the call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Well-known credential keys
pub mod keys {
    /// OAuth 2.0 bearer token or OAuth 1.0a token
    pub const ACCESS_TOKEN: &str = "AccessToken";
    /// OAuth 1.0a token secret
    pub const TOKEN_SECRET: &str = "TokenSecret";
    /// Consumer key / OAuth client id
    pub const CLIENT_ID: &str = "ClientId";
    /// Consumer secret / OAuth client secret
    pub const CLIENT_SECRET: &str = "ClientSecret";
}

/// A single credential value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthValue {
    Bool(bool),
    Integer(i64),
    String(String),
    Blob(Vec<u8>),
}

impl From<&str> for AuthValue {
    fn from(value: &str) -> Self {
        AuthValue::String(value.to_string())
    }
}

impl From<String> for AuthValue {
    fn from(value: String) -> Self {
        AuthValue::String(value)
    }
}

impl From<i64> for AuthValue {
    fn from(value: i64) -> Self {
        AuthValue::Integer(value)
    }
}

impl From<bool> for AuthValue {
    fn from(value: bool) -> Self {
        AuthValue::Bool(value)
    }
}

impl From<Vec<u8>> for AuthValue {
    fn from(value: Vec<u8>) -> Self {
        AuthValue::Blob(value)
    }
}

/// Credential map for one account
///
/// `Debug` prints key names only so tokens never reach the logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthTokens(BTreeMap<String, AuthValue>);

impl AuthTokens {
    /// Creates an empty credential map
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any previous value for `key`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AuthValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts an entry, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AuthValue>) -> Option<AuthValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AuthValue> {
        self.0.get(key)
    }

    /// Returns the entry as a string, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AuthValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the entry as an integer, if present and an integer
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(AuthValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Returns the entry as a bool, if present and a bool
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(AuthValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns a non-empty string entry
    ///
    /// # Errors
    /// Returns [`DomainError::MissingCredential`] if the key is absent, not a
    /// string, or empty
    pub fn require_str(&self, key: &str) -> Result<&str, DomainError> {
        self.get_str(key)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::MissingCredential(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the key names
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<AuthValue>> FromIterator<(K, V)> for AuthTokens {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
