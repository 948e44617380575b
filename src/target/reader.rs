//! Group state reads.

use super::TargetError;
use crate::provider::{ActivityFilter, ActivityRecord, GroupProvider, GroupSnapshot};

/// Read exactly one group by name.
///
/// Zero or several matches are both errors; ambiguity is never resolved
/// by picking one.
pub async fn describe_group(
    provider: &dyn GroupProvider,
    name: &str,
) -> Result<GroupSnapshot, TargetError> {
    let mut groups = provider
        .describe_groups(name)
        .await
        .map_err(|e| TargetError::provider("failed to describe AWS Autoscaling Group", e))?;

    if groups.len() != 1 {
        return Err(TargetError::GroupLookup {
            name: name.to_string(),
            matches: groups.len(),
        });
    }

    let snapshot = groups.remove(0);
    tracing::debug!(
        asg_name = name,
        desired_capacity = snapshot.desired_capacity,
        instances = snapshot.instances.len(),
        status = ?snapshot.status,
        "Described autoscaling group"
    );
    Ok(snapshot)
}

/// Read the group's activity history, most recent first.
pub async fn describe_activities(
    provider: &dyn GroupProvider,
    name: &str,
    filter: ActivityFilter,
) -> Result<Vec<ActivityRecord>, TargetError> {
    provider.describe_activities(name, filter).await.map_err(|e| {
        TargetError::provider("failed to describe AWS Autoscaling Group activities", e)
    })
}
