//! Engine configuration
//!
//! One serde-backed [`EngineConfig`] covering sensor options, filter
//! thresholds, the proximity throttle and history size. Every field has a
//! default, so a JSON file only needs the values it changes. Configs are
//! validated on load and before the controller accepts them.

use crate::core::{DEFAULT_MAX_HISTORY_SIZE, DEFAULT_PROXIMITY_CHECK_INTERVAL_MS};
use crate::hardware::SensorOptions;
use crate::processing::PositionFilterConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A parameter is outside its accepted range
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Configuration file could not be read or written
    #[error("config file '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for [`EngineConfig`]
    #[error("failed to parse config file '{}': {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(parameter: &str, value: impl Display, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the engine can be configured with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Passed through to the sensor provider
    pub sensor: SensorOptions,
    /// Position filter thresholds
    pub filter: PositionFilterConfig,
    /// Minimum spacing between proximity evaluations (milliseconds)
    pub proximity_check_interval_ms: u64,
    /// Accepted positions retained for velocity estimation
    pub max_history_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sensor: SensorOptions::default(),
            filter: PositionFilterConfig::default(),
            proximity_check_interval_ms: DEFAULT_PROXIMITY_CHECK_INTERVAL_MS,
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sensor.validate()?;
        self.filter.validate()?;
        if self.max_history_size < 2 {
            return Err(ConfigError::invalid(
                "max_history_size",
                self.max_history_size,
                "velocity needs at least two retained positions",
            ));
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
