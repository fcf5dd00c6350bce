//! Codec configuration file.
//!
//! A small JSON document: a format version, the driver's log level and the
//! contour tool settings. Missing sections take their defaults, so
//! `{"version": 1}` is a complete file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::tools::ContourToolConfiguration;

/// Format version written by this build. Files with a higher version are
/// rejected.
pub const CONFIG_VERSION: u32 = 1;

/// How much the `sr-codec` driver logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    /// Dispatch summaries
    #[default]
    Info,
    /// Skipped groups, fallbacks and synthesized handles
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings read by the `sr-codec` driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecConfig {
    pub version: u32,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Replaces the built-in contour tool's configuration
    #[serde(default)]
    pub contour_tool: ContourToolConfiguration,
}

impl CodecConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            contour_tool: ContourToolConfiguration::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a configuration document, refusing versions this build does not
    /// know.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded codec configuration from {:?}", path);
        Ok(config)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a configuration file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid codec configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Codec configuration version {found} is not supported (up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Cannot read codec configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
