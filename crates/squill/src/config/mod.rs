//! Configuration loading.
//!
//! Settings come from `config.toml` in the squill config directory, which
//! is `$SQUILL_CONFIG_DIR` when set and the platform config dir otherwise.
//! A missing file means defaults; a malformed one is an error the caller
//! can downgrade to a warning.

mod connections;
mod schema;

pub use connections::{
    connections_path, load_connections, save_connections, ConnectionEntry, ConnectionsFile,
};
pub use schema::{Config, HistoryConfig, OutputConfig};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The squill configuration directory, if one can be determined.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SQUILL_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|p| p.join("squill"))
}

/// Path to the main config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Path to the statement history file.
pub fn history_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("history.json"))
}

/// Loads the configuration, falling back to defaults when no file exists.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Loads configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
