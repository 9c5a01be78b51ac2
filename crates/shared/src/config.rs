//! Configuration management for club-scout.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scraper settings
    #[serde(default)]
    pub scout: ScoutConfig,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the given file
    File,
    /// File missing, built-in defaults used
    Defaults,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output (stderr)
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Leaderboard scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Site origin, prepended to every relative link
    pub base_url: String,

    /// Path of the global club statistics page
    pub stats_path: String,

    /// Link printed by the "GitHub" menu entry
    pub info_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds (None = no timeout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Concurrent club checks per country (None = runtime default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Clubs with this many members or more are skipped
    pub max_members: u32,

    /// Rate limit handling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// HTTP 429 handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Fixed delay before re-issuing a rate-limited request
    pub retry_delay_secs: u64,

    /// Maximum retries (None = retry forever)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root_dir: "data".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: false,
            file: true,
            json_format: false,
        }
    }
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            base_url: "https://brawlify.com".to_string(),
            stats_path: "/stats/clubs/global".to_string(),
            info_url: "https://github.com/pinkstoney/HDrezka-Downloader.git".to_string(),
            user_agent: concat!("club-scout/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: None,
            workers: None,
            max_members: 30,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            retry_delay_secs: 10,
            max_retries: None, // Unbounded
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            logging: LoggingConfig::default(),
            scout: ScoutConfig::default(),
        }
    }
}

impl ScoutConfig {
    /// Absolute URL of the global club statistics page
    pub fn stats_url(&self) -> String {
        format!("{}{}", self.base_url, self.stats_path)
    }

    /// Worker count, falling back to min(32, cpus + 4)
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            let cpus = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            (cpus + 4).min(32)
        })
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration. Nothing
    /// is logged here since this runs before logging is set up; the caller
    /// reports the returned `ConfigSource` instead.
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok((config, ConfigSource::File))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.scout.workers == Some(0) {
            bail!("scout.workers must be at least 1");
        }

        let base = &self.scout.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("scout.base_url must be an absolute http(s) URL: {}", base);
        }
        if base.ends_with('/') {
            bail!("scout.base_url must not end with '/': {}", base);
        }

        Ok(())
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }
}
