//! Configuration module for the ASG target
//!
//! Two layers of configuration exist:
//!
//! - [`AppConfig`]: the TOML file read by the CLI (logging, endpoints and
//!   the plugin-level target map).
//! - [`TargetSettings`]: the operator's flat key/value map, resolved once
//!   at construction and again per call.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ASG_TARGET_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use asg_target::config::AppConfig;
//!
//! let toml = r#"
//! [provider]
//! endpoint = "http://gateway:8080"
//!
//! [target]
//! asg_name = "workers"
//! "#;
//! let config: AppConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.provider.endpoint, "http://gateway:8080");
//! assert_eq!(config.target.get("asg_name").map(String::as_str), Some("workers"));
//! ```

pub mod endpoints;
pub mod error;
pub mod logging;
pub mod settings;

pub use endpoints::{DrainConfig, ProviderConfig};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use settings::{
    ConvergenceSettings, Credentials, DrainSettings, ProviderSettings, TargetSettings,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Unified configuration for the `asg-target` binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Provider gateway
    pub provider: ProviderConfig,
    /// Node drain service
    pub drain: DrainConfig,
    /// Plugin-level operator map (region, credentials, drain options, ...)
    pub target: HashMap<String, String>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("ASG_TARGET_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ASG_TARGET_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(endpoint) = std::env::var("ASG_TARGET_PROVIDER_ENDPOINT") {
            self.provider.endpoint = endpoint;
        }
        if let Ok(endpoint) = std::env::var("ASG_TARGET_DRAIN_ENDPOINT") {
            self.drain.endpoint = endpoint;
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;

        if self.provider.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "provider.endpoint".to_string(),
                message: "endpoint cannot be empty".to_string(),
            });
        }
        if self.drain.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "drain.endpoint".to_string(),
                message: "endpoint cannot be empty".to_string(),
            });
        }
        if self.provider.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "provider.request_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.drain.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "drain.request_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        // Surface malformed target values at startup rather than on first scale.
        TargetSettings::from_map(&self.target)?;

        Ok(())
    }
}
