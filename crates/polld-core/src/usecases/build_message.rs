//! Standard push message construction
//!
//! Plugins build most of their notifications the same way: a persistent
//! popup card with one action, the default sound and vibration, and the
//! daemon's tag. [`MessageBuilder`] owns those defaults so plugins only
//! supply the text.

use crate::config::NotificationsConfig;
use crate::domain::{Card, DomainError, Notification, PushMessage, Tag, Vibrate};

/// Sound played by standard notifications, looked up within `XDG_DATA_DIRS`
pub const DEFAULT_SOUND: &str = "sounds/ubuntu/notifications/Slick.ogg";

/// Vibration length of standard notifications, in milliseconds
pub const DEFAULT_VIBRATION_MS: u32 = 200;

/// Process-wide values applied to every standard notification
///
/// Built once at startup and shared read-only with every plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDefaults {
    pub sound: String,
    pub vibrate: Vibrate,
    pub tag: Tag,
}

impl NotificationDefaults {
    /// Defaults with the stock sound and vibration and the given tag
    pub fn new(tag: Tag) -> Self {
        Self {
            sound: DEFAULT_SOUND.to_string(),
            vibrate: Vibrate::duration(DEFAULT_VIBRATION_MS),
            tag,
        }
    }

    /// Builds defaults from the `notifications` configuration section
    ///
    /// When no tag is configured the tag is derived from the invocation name.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTag`] if a configured tag is blank
    pub fn from_config(config: &NotificationsConfig) -> Result<Self, DomainError> {
        let tag = match &config.tag {
            Some(tag) => Tag::new(tag.clone())?,
            None => Tag::from_invocation(),
        };
        Ok(Self {
            sound: config.sound.clone(),
            vibrate: Vibrate::duration(config.vibration_ms),
            tag,
        })
    }
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self::new(Tag::from_invocation())
    }
}

/// Builds push messages carrying the standard defaults
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    defaults: NotificationDefaults,
}

impl MessageBuilder {
    pub fn new(defaults: NotificationDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &NotificationDefaults {
        &self.defaults
    }

    /// Creates a push message with a persistent popup card
    ///
    /// The card gets `summary`, `body`, a single `action` and `icon`; the
    /// notification gets the default sound, vibration and tag. An empty
    /// `summary` produces a card that [`PushMessage::validate`] rejects.
    pub fn standard(&self, summary: &str, body: &str, action: &str, icon: &str) -> PushMessage {
        let card = Card::new(summary)
            .with_body(body)
            .with_action(action)
            .with_icon(icon)
            .with_popup(true)
            .with_persist(true);

        PushMessage::with_notification(
            Notification::new(card)
                .with_sound(self.defaults.sound.clone())
                .with_vibrate(self.defaults.vibrate.clone())
                .with_tag(self.defaults.tag.clone()),
        )
    }
}
