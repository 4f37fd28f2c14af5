//! Domain error types
//!
//! This module defines error types raised while constructing or validating
//! the notification model and its identifiers.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Application id is empty or malformed
    #[error("Invalid application id: {0}")]
    InvalidApplicationId(String),

    /// Notification tag is empty or malformed
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Vibration uses both modes, neither, or an empty pattern
    #[error("Invalid vibration: {0}")]
    InvalidVibration(String),

    /// A card was supplied without a summary
    #[error("Card is missing a summary")]
    MissingSummary,

    /// A push message carries neither a message nor a notification
    #[error("Push message is empty")]
    EmptyPushMessage,

    /// A credential entry required by a plugin is absent or has the wrong type
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
