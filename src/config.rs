//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for utf8clip's own diagnostics on stderr
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

/// Clipboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Print nothing instead of failing when the clipboard cannot be read
    #[serde(default)]
    pub empty_on_read_error: bool,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration, falling back to defaults when the file is broken.
    ///
    /// The file only tunes diagnostics, so a bad one never stops a clipboard
    /// transfer. Logging is not up yet, hence the plain stderr notice.
    pub fn load_or_default() -> Self {
        Self::or_default(Self::load())
    }

    fn or_default(loaded: Result<Self>) -> Self {
        loaded.unwrap_or_else(|e| {
            eprintln!("utf8clip: {:#}; using default settings", e);
            Self::default()
        })
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the default config path, e.g. `%APPDATA%\utf8clip\config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("utf8clip").join("config.toml"))
    }

    /// Log filter directive for the subscriber.
    ///
    /// `[logging] level` must be a single level name such as `debug`.
    pub fn log_directive(&self) -> Result<String> {
        let level = Level::from_str(self.logging.level.trim())
            .with_context(|| format!("invalid log level {:?}", self.logging.level))?;
        Ok(format!("utf8clip={},warn", level.as_str().to_ascii_lowercase()))
    }
}
