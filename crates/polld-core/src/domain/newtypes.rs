//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for the identifiers that
//! travel with every push message. Each newtype ensures data validity at
//! construction time.

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Tag used when the invocation name cannot be determined
const FALLBACK_TAG: &str = "account-polld";

// ============================================================================
// ApplicationId
// ============================================================================

/// Identifier of the application a push message is delivered to
///
/// Reverse-DNS style package plus application name, optionally followed by
/// a version, e.g. `com.ubuntu.gmail_gmail` or `com.ubuntu.gmail_gmail_1.0`.
/// The value is opaque to the daemon; only emptiness and whitespace are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Create a new validated ApplicationId
    ///
    /// # Errors
    /// Returns error if the id is empty or contains whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidApplicationId(
                "Application id cannot be empty".to_string(),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidApplicationId(format!(
                "Application id cannot contain whitespace: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ApplicationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApplicationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ApplicationId> for String {
    fn from(id: ApplicationId) -> Self {
        id.0
    }
}

// ============================================================================
// Tag
// ============================================================================

/// Grouping tag attached to notifications
///
/// Notifications sharing a tag replace each other on the device. The daemon
/// derives its default tag once at startup from the name it was invoked as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Create a new validated Tag
    ///
    /// # Errors
    /// Returns error if the tag is empty
    pub fn new(tag: impl Into<String>) -> Result<Self, DomainError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(DomainError::InvalidTag("Tag cannot be empty".to_string()));
        }
        Ok(Self(tag))
    }

    /// Derive the tag from the running program's invocation name
    ///
    /// Uses the file name of `argv[0]`, so `/usr/bin/account-polld` yields
    /// `account-polld`.
    #[must_use]
    pub fn from_invocation() -> Self {
        let program = std::env::args_os().next().unwrap_or_default();
        Self::from_program_path(Path::new(&program))
    }

    /// Derive the tag from a program path
    #[must_use]
    pub fn from_program_path(program: &Path) -> Self {
        program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .and_then(|name| Self::new(name).ok())
            .unwrap_or_else(|| Self(FALLBACK_TAG.to_string()))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

// ============================================================================
// Tests
// ============================================================================
