//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// A key the operator must supply on every call is absent.
    #[error("required config param {0} not found")]
    MissingKey(&'static str),

    /// A key was supplied but its value could not be interpreted.
    #[error("invalid value for config param {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
