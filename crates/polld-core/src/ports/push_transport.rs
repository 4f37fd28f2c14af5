//! Push transport port (driven/secondary port)
//!
//! This module defines the interface for handing push messages to the
//! delivery service. Implementations may post to a push relay, a local
//! message bus, or write records to a stream.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because delivery errors are adapter-specific.
//! - Messages are serialized with the wire names defined on
//!   [`PushMessage`]; transports must not rename fields.

use crate::domain::{ApplicationId, PushMessage};

/// Port trait for delivering push messages
#[async_trait::async_trait]
pub trait IPushTransport: Send + Sync {
    /// Delivers one push message to the given application
    ///
    /// # Arguments
    /// * `app_id` - Target application, taken from the producing plugin
    /// * `message` - The validated push message
    async fn deliver(&self, app_id: &ApplicationId, message: &PushMessage)
        -> anyhow::Result<()>;
}
