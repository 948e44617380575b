//! Logging section of the app config

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// How log lines are rendered on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, human oriented
    #[default]
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation {
                field: "logging.format".to_string(),
                message: format!("unknown log format '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level applied to every target
    pub level: String,
    pub format: LogFormat,
    /// Colour escape codes in pretty and compact output
    pub ansi: bool,
    /// Per-module levels keyed by module under the crate, e.g. {"target": "debug"}
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
            component_levels: None,
        }
    }
}

impl LoggingConfig {
    /// Reject levels `EnvFilter` would silently misread as a target name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_level("logging.level", &self.level)?;
        if let Some(components) = &self.component_levels {
            for (component, level) in components {
                check_level(&format!("logging.component_levels.{}", component), level)?;
            }
        }
        Ok(())
    }
}

fn check_level(field: &str, level: &str) -> Result<(), ConfigError> {
    if LEVELS.contains(&level.to_lowercase().as_str()) {
        return Ok(());
    }
    Err(ConfigError::Validation {
        field: field.to_string(),
        message: format!("unknown level '{}', expected one of {}", level, LEVELS.join(", ")),
    })
}
