//! Polling priority and plugin category
//!
//! The scheduler uses these to pick a polling cadence per plugin. They
//! classify a plugin, never an individual push message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Polling aggressiveness for a plugin
///
/// Ordered from most to least urgent; `Maximum` is numerically lowest.
///
/// - `Maximum`: calls, health warnings
/// - `High`: SMS, chat messages, new email
/// - `Default`: social media updates
/// - `Low`: software updates, junk email
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Priority {
    Maximum = 0,
    High = 1,
    #[default]
    Default = 2,
    Low = 3,
}

impl Priority {
    /// All levels, most urgent first
    pub const ALL: [Priority; 4] = [
        Priority::Maximum,
        Priority::High,
        Priority::Default,
        Priority::Low,
    ];

    /// Numeric level, 0 for `Maximum` up to 3 for `Low`
    pub const fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Maximum => "maximum",
            Priority::High => "high",
            Priority::Default => "default",
            Priority::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// Class of service a plugin talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginCategory {
    Email,
    Social,
}

impl fmt::Display for PluginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginCategory::Email => write!(f, "email"),
            PluginCategory::Social => write!(f, "social"),
        }
    }
}
