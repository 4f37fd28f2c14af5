//! account-polld core - plugin contract and notification model
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `PushMessage`, `Notification`, `Card`, `Vibrate`,
//!   `EmblemCounter`, `Priority`, `AccountData`, `AuthTokens`
//! - **Use cases** - `MessageBuilder`, `PollAccountUseCase`
//! - **Port definitions** - Traits for adapters: `IPlugin`, `IPushTransport`
//! - **Configuration** - YAML configuration for the daemon
//!
//! # Architecture
//!
//! The domain module holds the values exchanged between the daemon and its
//! plugins. Ports define the traits adapter crates implement. Use cases
//! orchestrate a poll cycle through those ports.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
