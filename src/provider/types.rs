//! Value types read from and written to the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle state of an instance inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Pending,
    InService,
    Terminating,
    Terminated,
    Detaching,
    Standby,
    #[serde(other)]
    Other,
}

/// Health as reported by the provider for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    #[serde(other)]
    Unknown,
}

/// One member instance of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInstance {
    pub instance_id: String,
    pub lifecycle_state: LifecycleState,
    pub health_status: HealthStatus,
}

impl GroupInstance {
    /// Registered and passing health checks.
    pub fn is_serving(&self) -> bool {
        self.lifecycle_state == LifecycleState::InService
            && self.health_status == HealthStatus::Healthy
    }
}

/// Point-in-time read of a group. Never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub desired_capacity: u32,
    #[serde(default)]
    pub min_size: u32,
    #[serde(default)]
    pub max_size: u32,
    /// Present while the provider itself is transitioning the group,
    /// e.g. "Delete in progress".
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub instances: Vec<GroupInstance>,
}

impl GroupSnapshot {
    /// Provider-level IDs of every instance currently in the group.
    pub fn instance_ids(&self) -> BTreeSet<String> {
        self.instances
            .iter()
            .map(|i| i.instance_id.clone())
            .collect()
    }

    /// Number of instances registered and healthy.
    pub fn serving_count(&self) -> usize {
        self.instances.iter().filter(|i| i.is_serving()).count()
    }
}

/// One entry of the provider's scaling history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub activity_id: String,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Absent while the activity is still running.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl ActivityRecord {
    pub fn is_complete(&self) -> bool {
        self.progress == 100
    }
}

/// Narrows an activity history query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// `None` asks for the provider's full page of latest entries.
    pub max_records: Option<u32>,
}

impl ActivityFilter {
    /// Latest entries across all activity types.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn latest(max_records: u32) -> Self {
        Self {
            max_records: Some(max_records),
        }
    }
}
