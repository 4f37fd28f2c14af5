//! Domain entities and business logic
//!
//! This module contains the core domain types for account-polld:
//! - Newtypes for the application id and notification tag
//! - The push message / notification model
//! - Polling priority and plugin category
//! - Credential material and account types
//! - Domain-specific error types

pub mod account;
pub mod auth;
pub mod errors;
pub mod newtypes;
pub mod notification;
pub mod priority;

// Re-export commonly used types
pub use account::{AccountData, AccountState};
pub use auth::{AuthTokens, AuthValue};
pub use errors::DomainError;
pub use newtypes::{ApplicationId, Tag};
pub use notification::{Card, EmblemCounter, Notification, PushMessage, Vibrate};
pub use priority::{PluginCategory, Priority};
