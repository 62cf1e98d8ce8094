//! Client configuration — backend address, timeout, and input sizing.
//!
//! User-level config: `~/.policychat/config.yaml`
//! Project-level config: `.policychat/config.yaml`
//!
//! Resolution: defaults → user file → project file → `POLICYCHAT_BASE_URL`
//! → explicit `--config` file → CLI flags (applied by the caller).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::api::DEFAULT_BASE_URL;

/// Environment override for the backend address.
pub const BASE_URL_ENV: &str = "POLICYCHAT_BASE_URL";

/// Errors loading an explicitly requested config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub base_url: String,
    /// Per-request timeout. None = transport default.
    pub request_timeout_secs: Option<u64>,
    /// Visible rows of the input box before it grows.
    pub input_rows: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: None,
            input_rows: 2,
        }
    }
}

/// A config file layer. Every field optional so files can be partial.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    input_rows: Option<u16>,
}

/// Path to `~/.policychat/config.yaml`.
fn user_config_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let home = std::env::var("USERPROFILE").ok();
    #[cfg(not(windows))]
    let home = std::env::var("HOME").ok();

    home.map(|p| PathBuf::from(p).join(".policychat").join("config.yaml"))
}

impl ChatConfig {
    /// Load defaults, user and project files, then the env override.
    /// Missing or unreadable files are skipped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = user_config_path() {
            config.merge(Self::read_layer_lenient(&path));
        }
        config.merge(Self::read_layer_lenient(Path::new(".policychat/config.yaml")));

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.apply_base_url(&url);
        }

        config
    }

    /// `load()` plus an explicit file that must exist and parse.
    pub fn load_with(path: &Path) -> Result<Self, ConfigError> {
        Self::load().with_file(path)
    }

    /// Layer a file that must exist and parse over this config.
    pub fn with_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        self.merge(Self::read_layer(path)?);
        Ok(self)
    }

    /// Override the backend address. Blank values are ignored.
    pub fn apply_base_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.base_url = url.to_string();
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn read_layer(path: &Path) -> Result<ConfigFile, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read_layer_lenient(path: &Path) -> ConfigFile {
        match Self::read_layer(path) {
            Ok(layer) => layer,
            Err(ConfigError::Read { .. }) => ConfigFile::default(),
            Err(e) => {
                tracing::warn!("ignoring {e}");
                ConfigFile::default()
            }
        }
    }

    fn merge(&mut self, layer: ConfigFile) {
        if let Some(url) = layer.base_url {
            self.apply_base_url(&url);
        }
        if layer.request_timeout_secs.is_some() {
            self.request_timeout_secs = layer.request_timeout_secs;
        }
        if let Some(rows) = layer.input_rows {
            self.input_rows = rows.max(1);
        }
    }
}
