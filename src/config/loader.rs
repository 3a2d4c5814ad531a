// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawConfig, WormholeConfig};
use crate::errors::Result;

/// Parse a configuration snapshot from TOML source text.
///
/// Deserialization and semantic validation (unique mapping prefixes,
/// non-empty app commands) happen in one step; the caller gets either a
/// complete snapshot or an error.
pub fn parse(source: &str) -> Result<WormholeConfig> {
    let raw: RawConfig = toml::from_str(source)?;
    WormholeConfig::try_from(raw)
}

/// Load a configuration snapshot from a file on disk.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<WormholeConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse(&contents)
}

/// Default config path: `.wormhole.toml` in the user's home directory.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wormhole.toml")
}

/// Default log path: `wormhole.log` in the user's home directory.
pub fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wormhole.log")
}
