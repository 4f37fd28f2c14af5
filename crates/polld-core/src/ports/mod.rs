//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! core. Ports are interfaces the use cases depend on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IPlugin`] - One data-source adapter per backend service
//! - [`IPushTransport`] - Delivery of push messages to the relay

pub mod plugin;
pub mod push_transport;

pub use plugin::{IPlugin, PluginError};
pub use push_transport::IPushTransport;
