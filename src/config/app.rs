//! Main application configuration
//!
//! This module defines the configuration structures for the prediction
//! board, including environment variable loading, TOML files and
//! validation.

use crate::trend::window::{WindowSettings, DEFAULT_TOP_N, DEFAULT_WINDOW_SIZE, MIN_TREND_GAMES};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub data: DataSettings,
    pub dashboard: DashboardSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and health output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interface the HTTP server binds to
    pub http_host: String,
    /// Port for the dashboard, health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Score sheet locations and parsing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Current score sheet
    pub scores_file: PathBuf,
    /// Earlier score sheet used for rank changes
    pub previous_file: Option<PathBuf>,
    /// Read empty score cells as zero
    pub blank_as_zero: bool,
    /// Reuse parsed sheets while their modification time is unchanged
    pub cache_snapshots: bool,
}

/// Dashboard presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Page title
    pub title: String,
    /// Trailing games shown in the title race
    pub trend_window: usize,
    /// Leading players shown in the title race
    pub trend_top_n: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "prediction-board".to_string(),
            log_level: "info".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            scores_file: PathBuf::from("points.csv"),
            previous_file: None,
            blank_as_zero: false,
            cache_snapshots: true,
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Prediction Leaderboard".to_string(),
            trend_window: DEFAULT_WINDOW_SIZE,
            trend_top_n: DEFAULT_TOP_N,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still win
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents, |key| env::var(key).ok())
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse TOML configuration, then apply overrides from `lookup`
    pub fn from_toml<F>(contents: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig =
            toml::from_str(contents).context("Failed to parse config file")?;

        config.apply_overrides(lookup)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup such as the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Some(host) = lookup("HTTP_HOST") {
            self.service.http_host = host;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            self.service.http_port = parse_var("HTTP_PORT", &port)?;
        }
        if let Some(timeout) = lookup("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = parse_var("SHUTDOWN_TIMEOUT_SECONDS", &timeout)?;
        }

        // Data settings
        if let Some(path) = lookup("SCORES_FILE") {
            self.data.scores_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("PREVIOUS_SCORES_FILE") {
            self.data.previous_file = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(blank) = lookup("BLANK_AS_ZERO") {
            self.data.blank_as_zero = parse_var("BLANK_AS_ZERO", &blank)?;
        }
        if let Some(cache) = lookup("CACHE_SNAPSHOTS") {
            self.data.cache_snapshots = parse_var("CACHE_SNAPSHOTS", &cache)?;
        }

        // Dashboard settings
        if let Some(title) = lookup("DASHBOARD_TITLE") {
            self.dashboard.title = title;
        }
        if let Some(window) = lookup("TREND_WINDOW") {
            self.dashboard.trend_window = parse_var("TREND_WINDOW", &window)?;
        }
        if let Some(top_n) = lookup("TREND_TOP_N") {
            self.dashboard.trend_top_n = parse_var("TREND_TOP_N", &top_n)?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Trend window settings for the dashboard
    pub fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            window_size: self.dashboard.trend_window,
            top_n: self.dashboard.trend_top_n,
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate HTTP settings
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.http_host.is_empty() {
        return Err(anyhow!("HTTP host cannot be empty"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate data settings
    if config.data.scores_file.as_os_str().is_empty() {
        return Err(anyhow!("Scores file path cannot be empty"));
    }
    if config.data.previous_file.as_ref() == Some(&config.data.scores_file) {
        return Err(anyhow!("Previous scores file must differ from the current one"));
    }

    // Validate dashboard settings
    if config.dashboard.trend_window < MIN_TREND_GAMES {
        return Err(anyhow!(
            "Trend window must cover at least {} games",
            MIN_TREND_GAMES
        ));
    }
    if config.dashboard.trend_top_n == 0 {
        return Err(anyhow!("Trend top N must be greater than 0"));
    }

    Ok(())
}
