//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/unwind/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/unwind/` (~/.config/unwind/)
//! - State/Logs: `$XDG_STATE_HOME/unwind/` (~/.local/state/unwind/)

use crate::analytics::YearOptions;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Time zone used for calendar boundaries
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneSetting {
    /// The machine's local zone
    #[default]
    Local,
    Utc,
}

/// Limits and windows for the year review
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Minutes after a play event in which a count event closes a session
    #[serde(default = "default_session_window_minutes")]
    pub session_window_minutes: u32,

    #[serde(default = "default_top_people")]
    pub top_people: usize,

    #[serde(default = "default_top_tags")]
    pub top_tags: usize,

    #[serde(default = "default_top_tags")]
    pub top_play_tags: usize,

    #[serde(default = "default_top_media")]
    pub top_media: usize,

    /// Sessions shown in the shortest and longest lists
    #[serde(default = "default_top_sessions")]
    pub top_sessions: usize,

    /// Size of "top 3" style views
    #[serde(default = "default_breakdown_size")]
    pub breakdown_size: usize,

    /// Rows in each all-time ranking
    #[serde(default = "default_lifetime_limit")]
    pub lifetime_limit: usize,

    #[serde(default)]
    pub timezone: TimeZoneSetting,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            session_window_minutes: default_session_window_minutes(),
            top_people: default_top_people(),
            top_tags: default_top_tags(),
            top_play_tags: default_top_tags(),
            top_media: default_top_media(),
            top_sessions: default_top_sessions(),
            breakdown_size: default_breakdown_size(),
            lifetime_limit: default_lifetime_limit(),
            timezone: TimeZoneSetting::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.session_window_minutes == 0 {
            return Err(Error::Config(
                "analytics.session_window_minutes must be at least 1".to_string(),
            ));
        }

        let limits = [
            ("top_people", self.top_people),
            ("top_tags", self.top_tags),
            ("top_play_tags", self.top_play_tags),
            ("top_media", self.top_media),
            ("top_sessions", self.top_sessions),
            ("breakdown_size", self.breakdown_size),
            ("lifetime_limit", self.lifetime_limit),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(Error::Config(format!(
                    "analytics.{} must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Engine options for these settings
    pub fn year_options(&self) -> YearOptions {
        YearOptions {
            session_window: chrono::Duration::minutes(i64::from(self.session_window_minutes)),
            top_people: self.top_people,
            top_tags: self.top_tags,
            top_play_tags: self.top_play_tags,
            top_media: self.top_media,
            top_sessions: self.top_sessions,
            breakdown_size: self.breakdown_size,
        }
    }
}

fn default_session_window_minutes() -> u32 {
    60
}

fn default_top_people() -> usize {
    5
}

fn default_top_tags() -> usize {
    8
}

fn default_top_media() -> usize {
    5
}

fn default_top_sessions() -> usize {
    5
}

fn default_breakdown_size() -> usize {
    3
}

fn default_lifetime_limit() -> usize {
    crate::analytics::lifetime::DEFAULT_LIFETIME_LIMIT
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analytics.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/unwind/config.toml` (~/.config/unwind/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("unwind").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/unwind/` (~/.local/state/unwind/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("unwind")
    }

    /// Returns the log file path prefix
    ///
    /// Daily rotation appends the date: `unwind.YYYY-MM-DD.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("unwind.log")
    }
}
