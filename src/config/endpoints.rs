//! Endpoint configuration for the provider gateway and the drain service

use serde::{Deserialize, Serialize};

/// Provider gateway connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub request_timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4566".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// Drain service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrainConfig {
    pub endpoint: String,
    /// Applies to individual requests; the drain itself is bounded by `drain_deadline`.
    pub request_timeout_seconds: u64,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4646".to_string(),
            request_timeout_seconds: 30,
        }
    }
}
