//! Store configuration via `stowage.toml`
//!
//! Configuration is a small TOML file next to the store's snapshot. On first
//! load a commented default file is created; edit it and reopen the store to
//! change settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stowage_core::{Error, Result};

/// Config file name placed in the store directory.
pub const CONFIG_FILE_NAME: &str = "stowage.toml";

/// Default snapshot file name, relative to the store directory.
pub const SNAPSHOT_FILE_NAME: &str = "defaults.snapshot";

/// When the store writes its snapshot to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    /// Only on an explicit `flush()`
    Manual,
    /// After every mutation
    OnWrite,
}

/// Store configuration loaded from `stowage.toml`.
///
/// # Example
///
/// ```toml
/// # Snapshot file; relative paths resolve against the config directory.
/// snapshot_path = "defaults.snapshot"
///
/// # "manual" (default) or "on_write"
/// flush = "manual"
///
/// # log_filter = "stowage=debug"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Where the snapshot lives; `None` keeps the store purely in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    /// Flush mode: `"manual"` or `"on_write"`.
    #[serde(default = "default_flush_str")]
    pub flush: String,
    /// Default tracing filter used when `RUST_LOG` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

fn default_flush_str() -> String {
    "manual".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            flush: default_flush_str(),
            log_filter: None,
        }
    }
}

impl StoreConfig {
    /// In-memory store config persisting to `path`.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Parse the flush string into a `FlushMode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"manual"` or `"on_write"`.
    pub fn flush_mode(&self) -> Result<FlushMode> {
        match self.flush.as_str() {
            "manual" => Ok(FlushMode::Manual),
            "on_write" => Ok(FlushMode::OnWrite),
            other => Err(Error::Config(format!(
                "Invalid flush mode '{}' in {}. Expected \"manual\" or \"on_write\".",
                other, CONFIG_FILE_NAME
            ))),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Stowage store configuration
#
# Snapshot file holding every stored key. Relative paths resolve against
# the directory containing this file.
snapshot_path = "defaults.snapshot"

# Flush mode: "manual" (default) or "on_write"
#   "manual"   = written only when the application calls flush()
#   "on_write" = rewritten after every mutation
flush = "manual"

# Default tracing filter when RUST_LOG is unset.
# log_filter = "stowage=info"
"#
    }

    /// Parse config text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)?;
        config.flush_mode()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// A relative `snapshot_path` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let (Some(snapshot), Some(dir)) = (config.snapshot_path.as_ref(), path.parent()) {
            if snapshot.is_relative() {
                config.snapshot_path = Some(dir.join(snapshot));
            }
        }
        Ok(config)
    }

    /// Load `stowage.toml` from `dir`, writing the default file first if missing.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        Self::from_file(&path)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }
}
