//! Error types for provider operations.

use thiserror::Error;

/// Errors that can occur while talking to the provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Provider rejected the call (4xx, 5xx).
    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider response doesn't match expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Adapter configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
