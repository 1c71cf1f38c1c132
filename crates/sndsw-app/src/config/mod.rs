//! Configuration file parsing for sndsw
//!
//! Supports:
//! - `~/.config/sndsw/config.toml` - Global settings

pub mod settings;
pub mod types;

pub use settings::{config_path, load_settings, load_user_settings, parse_settings};
pub use types::*;
