//! Node drain collaborator.
//!
//! Before an instance is destroyed its cluster node must be drained of
//! workloads. Selection and draining are owned by an external service;
//! this module defines the contract with it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

pub mod error;
pub mod http;

pub use error::DrainError;
pub use http::HttpNodeDrainer;

/// Input to [`NodeDrainer::select_and_drain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainRequest {
    pub group: String,
    /// Provider instance IDs currently in the group. Only nodes backed by
    /// one of these may be selected.
    pub eligible_instance_ids: BTreeSet<String>,
    pub count: u32,
    pub deadline: Duration,
    /// Opaque operator class label narrowing the node pool.
    pub node_class: Option<String>,
    pub ignore_system_jobs: bool,
}

/// A cluster node that has been drained, with the provider instance behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainedNode {
    pub node_id: String,
    pub instance_id: String,
}

/// Selects nodes for removal and drains them.
#[async_trait]
pub trait NodeDrainer: Send + Sync + 'static {
    /// Select `request.count` nodes of the group and drain them, honoring
    /// the deadline. Returns the drained nodes in termination order.
    async fn select_and_drain(&self, request: &DrainRequest)
        -> Result<Vec<DrainedNode>, DrainError>;

    /// Remove nodes whose instances are gone from the cluster's node list.
    ///
    /// Default implementation does nothing.
    async fn purge(&self, _nodes: &[DrainedNode]) -> Result<(), DrainError> {
        Ok(())
    }
}
