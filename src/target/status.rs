//! Status reconciliation.

use crate::provider::{ActivityRecord, GroupSnapshot};
use serde::Serialize;
use std::collections::HashMap;

/// Meta key carrying the end time of the latest completed activity,
/// in nanoseconds since the Unix epoch.
pub const META_KEY_LAST_EVENT: &str = "nomad_autoscaler.last_event";

/// Readiness of a group to accept a new scaling action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusVerdict {
    pub ready: bool,
    /// The provider's current desired capacity.
    pub count: u32,
    /// Nanoseconds since epoch of the latest activity's end time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<i64>,
}

impl StatusVerdict {
    /// Meta map for the orchestrating host. Empty when no completed activity exists.
    pub fn meta(&self) -> HashMap<String, String> {
        self.last_event
            .map(|ts| HashMap::from([(META_KEY_LAST_EVENT.to_string(), ts.to_string())]))
            .unwrap_or_default()
    }
}

/// Reduce a fresh snapshot and its activity history (most recent first)
/// to a verdict.
///
/// The group is ready when the provider reports no transition of its own;
/// a latest activity at 100% also makes it ready. Only the first record is
/// consulted.
pub fn reconcile_status(snapshot: &GroupSnapshot, activities: &[ActivityRecord]) -> StatusVerdict {
    let mut verdict = StatusVerdict {
        ready: snapshot.status.is_none(),
        count: snapshot.desired_capacity,
        last_event: None,
    };

    if let Some(latest) = activities.first() {
        verdict.ready = verdict.ready || latest.is_complete();
        verdict.last_event = latest.end_time.and_then(|t| t.timestamp_nanos_opt());
    }

    verdict
}
