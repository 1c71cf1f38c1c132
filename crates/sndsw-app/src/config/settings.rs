//! Settings loading
//!
//! Settings are read once at startup and never written back.

use std::path::{Path, PathBuf};

use sndsw_core::prelude::*;

use super::types::Settings;

const CONFIG_DIR: &str = "sndsw";
const CONFIG_FILENAME: &str = "config.toml";

/// Path of the user's config file (`~/.config/sndsw/config.toml`)
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from the user's config file, falling back to defaults
pub fn load_user_settings() -> Settings {
    match config_path() {
        Some(path) => load_settings(&path),
        None => {
            debug!("No config directory on this system, using defaults");
            Settings::default()
        }
    }
}

/// Load settings from `config_path`
///
/// A missing file yields defaults silently; an unreadable or invalid file
/// yields defaults with a warning.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Parse the contents of a config file
pub fn parse_settings(content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| Error::config(e.to_string()))
}
