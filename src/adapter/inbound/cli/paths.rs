//! Path utilities for stocklive.
//!
//! User configuration lives under `~/.stocklive/`:
//! - `~/.stocklive/config.toml` - main configuration

use std::path::PathBuf;

use crate::infrastructure::config::settings::CONFIG_ENV;

/// Returns the stocklive home directory (`~/.stocklive/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stocklive")
}

/// Config path from `STOCKLIVE_CONFIG`, falling back to
/// `~/.stocklive/config.toml`.
pub fn default_config() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| home_dir().join("config.toml"), PathBuf::from)
}
