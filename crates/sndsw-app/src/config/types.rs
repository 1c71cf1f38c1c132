//! Configuration types for sndsw
//!
//! Defines:
//! - `Settings` - Global application settings
//! - Related sub-types and enums

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sndsw_ctl::{DEFAULT_DEVICE, DEFAULT_LIBRARY};

/// Application settings (`~/.config/sndsw/config.toml`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub control: ControlSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Which server to talk to and how
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlSettings {
    /// sndio control device ("default" lets libsndio pick)
    #[serde(default = "default_device")]
    pub device: String,

    /// Shared object providing the sndio API
    #[serde(default = "default_library")]
    pub library: String,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            device: default_device(),
            library: default_library(),
        }
    }
}

fn default_device() -> String {
    DEFAULT_DEVICE.to_string()
}

fn default_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

/// Order in which devices appear in the registry and the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Newly announced or re-announced devices move to the top
    #[default]
    MostRecentFirst,
    /// Devices keep the position of their first announcement
    Insertion,
}

/// What to do when the server reports no devices at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// Exit with an error
    #[default]
    Fatal,
    /// Show an empty menu until devices appear
    Wait,
}

impl std::fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderPolicy::MostRecentFirst => write!(f, "most_recent_first"),
            OrderPolicy::Insertion => write!(f, "insertion"),
        }
    }
}

impl std::fmt::Display for EmptyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyPolicy::Fatal => write!(f, "fatal"),
            EmptyPolicy::Wait => write!(f, "wait"),
        }
    }
}

/// Behavior settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BehaviorSettings {
    #[serde(default)]
    pub order: OrderPolicy,

    #[serde(default)]
    pub on_empty: EmptyPolicy,

    /// Leave the program once a device has been selected
    #[serde(default = "default_true")]
    pub exit_on_commit: bool,

    /// Upper bound on a single wait in milliseconds (0 = wait indefinitely)
    #[serde(default)]
    pub poll_interval_ms: u64,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            order: OrderPolicy::default(),
            on_empty: EmptyPolicy::default(),
            exit_on_commit: true,
            poll_interval_ms: 0,
        }
    }
}

impl BehaviorSettings {
    /// Timeout for one readiness wait, `None` meaning no timeout
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_ms > 0).then(|| Duration::from_millis(self.poll_interval_ms))
    }
}

/// UI settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    /// Text of the title bar
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

fn default_title() -> String {
    "Select default sndio device".to_string()
}

fn default_true() -> bool {
    true
}
