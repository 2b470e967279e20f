//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/gapscout/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/gapscout/` (~/.config/gapscout/)
//! - State/Logs: `$XDG_STATE_HOME/gapscout/` (~/.local/state/gapscout/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

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
    /// Session discovery configuration
    #[serde(default)]
    pub sessions: SessionsConfig,

    /// Catalog location
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Matching behavior
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where session transcripts live and how far back to look
#[derive(Debug, Deserialize)]
pub struct SessionsConfig {
    /// Root directory scanned recursively for `*.jsonl` transcripts.
    /// Defaults to the Claude Code projects directory.
    pub root: Option<PathBuf>,

    /// Only sessions modified within this many days are analyzed
    #[serde(default = "default_days_back")]
    pub days_back: u32,

    /// Upper bound on sessions per run, newest first
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            root: None,
            days_back: default_days_back(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl SessionsConfig {
    /// The configured root, or `~/.claude/projects`.
    pub fn root_dir(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| home_dir().join(".claude").join("projects"))
    }
}

fn default_days_back() -> u32 {
    7
}

fn default_max_sessions() -> usize {
    50
}

/// Catalog location
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Directory scanned recursively for recommendation YAML files
    pub dir: Option<PathBuf>,
}

/// Matching behavior defaults; an invocation can override both
#[derive(Debug, Deserialize, Default)]
pub struct MatchingConfig {
    /// Restrict recommendations to one category by serialized name
    pub category: Option<String>,

    /// Attach the ranked friction-signal breakdown to every report
    #[serde(default)]
    pub explain: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
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
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/gapscout/config.toml` (~/.config/gapscout/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("gapscout").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/gapscout/` (~/.local/state/gapscout/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("gapscout")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/gapscout/gapscout.log` (~/.local/state/gapscout/gapscout.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("gapscout.log")
    }
}
