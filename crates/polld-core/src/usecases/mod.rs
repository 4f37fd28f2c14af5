//! Use cases (interactors) for account-polld
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces.
//!
//! ## Use Cases
//!
//! - [`MessageBuilder`] - Standard push messages with process-wide defaults
//! - [`PollAccountUseCase`] - One poll cycle: poll, validate, deliver, classify

pub mod build_message;
pub mod poll_account;

pub use build_message::{MessageBuilder, NotificationDefaults, DEFAULT_SOUND, DEFAULT_VIBRATION_MS};
pub use poll_account::{NextAction, PollAccountUseCase, PollOutcome};
