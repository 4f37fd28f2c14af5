//! Push message and notification model
//!
//! These are the values a plugin hands back from a poll cycle. They are
//! created per cycle, serialized for the push relay and discarded.
//!
//! ## Wire format
//!
//! Every optional member is left out of the serialized record when unset, so
//! a message carrying nothing serializes as `{}`. The emblem counter keeps
//! its hyphenated key, `emblem-counter`.

use serde::{Deserialize, Serialize};

use super::{errors::DomainError, newtypes::Tag};

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

// ============================================================================
// PushMessage
// ============================================================================

/// Unit of output from a poll cycle
///
/// Carries an opaque `message` forwarded verbatim to the target application
/// and/or a user-facing [`Notification`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Opaque payload passed as-is to the application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// User-facing part of the push message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl PushMessage {
    /// Creates a push message carrying only a notification
    pub fn with_notification(notification: Notification) -> Self {
        Self {
            message: None,
            notification: Some(notification),
        }
    }

    /// Sets the opaque application payload
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns true if neither a payload nor a notification is present
    pub fn is_empty(&self) -> bool {
        self.message.as_deref().map_or(true, str::is_empty)
            && self.notification.as_ref().map_or(true, Notification::is_empty)
    }

    /// Checks the message is worth delivering
    ///
    /// # Errors
    /// - [`DomainError::EmptyPushMessage`] if nothing would reach the device
    /// - [`DomainError::MissingSummary`] if the notification carries a card
    ///   that cannot be presented
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::EmptyPushMessage);
        }
        if let Some(card) = self.notification.as_ref().and_then(|n| n.card.as_ref()) {
            if !card.is_presentable() {
                return Err(DomainError::MissingSummary);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Notification
// ============================================================================

/// User-facing description of a push message
///
/// All members are independent; an absent sound is silent, an absent card
/// shows nothing, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Path to a sound file, looked up within `XDG_DATA_DIRS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Visual bubble
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Haptic feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<Vibrate>,
    /// Application badge hint
    #[serde(
        default,
        rename = "emblem-counter",
        skip_serializing_if = "Option::is_none"
    )]
    pub emblem_counter: Option<EmblemCounter>,
    /// Groups notifications that replace one another
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

impl Notification {
    /// Creates a notification showing the given card
    pub fn new(card: Card) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    /// Sets the sound path
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Sets the vibration
    pub fn with_vibrate(mut self, vibrate: Vibrate) -> Self {
        self.vibrate = Some(vibrate);
        self
    }

    /// Sets the emblem counter
    pub fn with_emblem_counter(mut self, counter: EmblemCounter) -> Self {
        self.emblem_counter = Some(counter);
        self
    }

    /// Sets the grouping tag
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Returns true if nothing would be shown, played or updated
    ///
    /// A tag on its own does not count as content.
    pub fn is_empty(&self) -> bool {
        self.sound.is_none()
            && self.card.is_none()
            && self.vibrate.is_none()
            && self.emblem_counter.is_none()
    }
}

// ============================================================================
// Card
// ============================================================================

/// Visible bubble of a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Title; the card is not presented without it
    pub summary: String,
    /// Longer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether to show a transient bubble. Users can disable these.
    #[serde(default, skip_serializing_if = "is_false")]
    pub popup: bool,
    /// Action identifiers for snap-decision buttons, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    /// Path to an icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether to keep the card in the notification centre
    #[serde(default, skip_serializing_if = "is_false")]
    pub persist: bool,
}

impl Card {
    /// Creates a card with only a summary
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Sets the body text; an empty string leaves it unset
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = non_empty(body.into());
        self
    }

    /// Sets the icon path; an empty string leaves it unset
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = non_empty(icon.into());
        self
    }

    /// Appends an action identifier
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Sets whether a popup bubble is shown
    pub fn with_popup(mut self, popup: bool) -> Self {
        self.popup = popup;
        self
    }

    /// Sets whether the card persists in the notification centre
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Returns true if the card has a non-blank summary
    pub fn is_presentable(&self) -> bool {
        !self.summary.trim().is_empty()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// Vibrate
// ============================================================================

/// Haptic part of a notification
///
/// Either a flat `duration` or a `pattern` of on/off durations repeated
/// `repeat` times. The two modes are exclusive: the constructors only build
/// one of them and deserialization rejects records that set both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVibrate")]
pub struct Vibrate {
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pattern: Vec<u32>,
    #[serde(skip_serializing_if = "is_zero")]
    repeat: u32,
}

impl Vibrate {
    /// Vibrates once for `ms` milliseconds
    pub fn duration(ms: u32) -> Self {
        Self {
            duration: Some(ms),
            pattern: Vec::new(),
            repeat: 0,
        }
    }

    /// Vibrates following `pattern` (alternating on/off milliseconds),
    /// repeated `repeat` times
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidVibration`] if the pattern is empty
    pub fn pattern(pattern: Vec<u32>, repeat: u32) -> Result<Self, DomainError> {
        if pattern.is_empty() {
            return Err(DomainError::InvalidVibration(
                "pattern cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            duration: None,
            pattern,
            repeat,
        })
    }

    /// Flat duration in milliseconds, if this is a duration vibration
    pub fn duration_ms(&self) -> Option<u32> {
        self.duration
    }

    /// On/off pattern in milliseconds; empty for a duration vibration
    pub fn pattern_ms(&self) -> &[u32] {
        &self.pattern
    }

    /// Number of times the pattern repeats
    pub fn repeat(&self) -> u32 {
        self.repeat
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVibrate {
    duration: Option<u32>,
    pattern: Option<Vec<u32>>,
    repeat: Option<u32>,
}

impl TryFrom<RawVibrate> for Vibrate {
    type Error = DomainError;

    fn try_from(raw: RawVibrate) -> Result<Self, Self::Error> {
        match (raw.duration, raw.pattern) {
            (Some(_), Some(_)) => Err(DomainError::InvalidVibration(
                "duration cannot be combined with pattern".to_string(),
            )),
            (Some(_), None) if raw.repeat.is_some() => Err(DomainError::InvalidVibration(
                "repeat requires a pattern".to_string(),
            )),
            (Some(ms), None) => Ok(Self::duration(ms)),
            (None, Some(pattern)) => Self::pattern(pattern, raw.repeat.unwrap_or(0)),
            (None, None) => Err(DomainError::InvalidVibration(
                "either duration or pattern is required".to_string(),
            )),
        }
    }
}

// ============================================================================
// EmblemCounter
// ============================================================================

/// Badge hint shown over the application's launcher icon
///
/// Both members are always serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmblemCounter {
    /// Number to display
    pub count: u32,
    /// Whether the counter is visible
    pub visible: bool,
}

impl EmblemCounter {
    /// Creates an emblem counter
    pub fn new(count: u32, visible: bool) -> Self {
        Self { count, visible }
    }
}
