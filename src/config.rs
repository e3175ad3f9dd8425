//! Configuration for the Textract client and logging.
//!
//! Optional JSON file: `~/.config/textract-overlay/config.json`.
//! Environment variables take precedence over the file for the AWS region.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs::config_dir;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const APP_CONFIG_DIR_NAME: &str = "textract-overlay";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ERROR" => Some(Self::Error),
            "WARN" | "WARNING" => Some(Self::Warn),
            "INFO" => Some(Self::Info),
            "DEBUG" => Some(Self::Debug),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
}

/// Settings for a [`TextractAnalyzer`](crate::TextractAnalyzer).
///
/// Constructed by the caller and handed to the analyzer; nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub region: String,
    pub log_level: LogLevel,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Resolves configuration from the environment and the config file.
    ///
    /// A missing or unreadable file falls back to defaults.
    pub fn load() -> Self {
        let raw = config_path()
            .map(|path| load_or_default(&path))
            .unwrap_or_default();
        Self::from_sources(
            non_empty_env("AWS_REGION"),
            non_empty_env("AWS_DEFAULT_REGION"),
            raw,
        )
    }

    /// Loads from an explicit config file path instead of the platform default.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = load_raw_config(path)?;
        Ok(Self::from_sources(
            non_empty_env("AWS_REGION"),
            non_empty_env("AWS_DEFAULT_REGION"),
            raw,
        ))
    }

    fn from_sources(
        aws_region: Option<String>,
        aws_default_region: Option<String>,
        raw: RawConfig,
    ) -> Self {
        let region = aws_region
            .or(aws_default_region)
            .or(raw.region.filter(|s| !s.trim().is_empty()))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let log_level = raw
            .log_level
            .as_deref()
            .and_then(LogLevel::from_str)
            .unwrap_or_default();
        debug!(region = %region, ?log_level, "Configuration resolved");
        Self { region, log_level }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn config_path() -> Option<PathBuf> {
    let path = config_dir()?
        .join(APP_CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);
    Some(path)
}

fn load_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    if !path.exists() {
        debug!(?path, "Config file does not exist, using defaults");
        return Ok(RawConfig::default());
    }

    let data = fs::read_to_string(path)?;
    let cfg = serde_json::from_str(&data)?;
    debug!(?path, "Config loaded");
    Ok(cfg)
}

fn load_or_default(path: &Path) -> RawConfig {
    match load_raw_config(path) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(error = ?err, "Failed to load config, using defaults");
            RawConfig::default()
        }
    }
}
