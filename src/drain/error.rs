//! Error types for node drain operations.

use std::time::Duration;
use thiserror::Error;

/// Errors from the node drain collaborator.
///
/// A drain error raised before termination means no capacity change was
/// made, so the whole scale call is safe to retry.
#[derive(Error, Debug)]
pub enum DrainError {
    /// Network connectivity error.
    #[error("Network error: {0}")]
    Network(String),

    /// Drain service rejected the call.
    #[error("Drain service error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Drain service response doesn't match expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Selection and drain did not finish within the deadline.
    #[error("drain did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    /// Not enough eligible nodes, or nodes could not be drained.
    #[error("node selection failed: {0}")]
    Selection(String),
}
