//! Scale-in executor.
//!
//! Shrinks the group's desired capacity and its set of schedulable nodes
//! together:
//!
//! 1. The drain collaborator selects `amount` nodes backed by the group's
//!    instances and drains them. Failure here, including a short selection,
//!    leaves capacity untouched.
//! 2. Each drained instance is terminated with a provider call that also
//!    decrements desired capacity, so the two counters never diverge.
//! 3. Termination failures are collected and returned together. Instances
//!    that did terminate are not rolled back and drained nodes stay drained.
//! 4. With `node_purge` set, nodes whose instances terminated are purged.

use super::{TargetError, TerminationFailure};
use crate::config::DrainSettings;
use crate::drain::{DrainError, DrainRequest, DrainedNode, NodeDrainer};
use crate::provider::{GroupProvider, GroupSnapshot};
use std::time::Duration;

/// Extra time allowed past the drain deadline for the collaborator to report back.
pub const DRAIN_DEADLINE_GRACE: Duration = Duration::from_secs(30);

/// Remove `amount` instances from the group. Returns the terminated instance IDs.
pub async fn scale_in(
    provider: &dyn GroupProvider,
    drainer: &dyn NodeDrainer,
    snapshot: &GroupSnapshot,
    amount: u32,
    drain: &DrainSettings,
) -> Result<Vec<String>, TargetError> {
    let eligible = snapshot.instance_ids();
    let request = DrainRequest {
        group: snapshot.name.clone(),
        eligible_instance_ids: eligible.clone(),
        count: amount,
        deadline: drain.deadline,
        node_class: drain.node_class.clone(),
        ignore_system_jobs: drain.ignore_system_jobs,
    };

    let mut nodes = tokio::time::timeout(
        drain.deadline + DRAIN_DEADLINE_GRACE,
        drainer.select_and_drain(&request),
    )
    .await
    .map_err(|_| TargetError::Drain(DrainError::DeadlineExceeded(drain.deadline)))?
    .map_err(TargetError::Drain)?;

    if nodes.len() < amount as usize {
        tracing::warn!(
            asg_name = %snapshot.name,
            requested = amount,
            drained = nodes.len(),
            "Drainer returned fewer nodes than requested, leaving capacity unchanged"
        );
        return Err(TargetError::Drain(DrainError::Selection(format!(
            "drained {} of {} requested nodes",
            nodes.len(),
            amount
        ))));
    }
    if nodes.len() > amount as usize {
        tracing::warn!(
            asg_name = %snapshot.name,
            requested = amount,
            drained = nodes.len(),
            "Drainer returned more nodes than requested, terminating only the first"
        );
        nodes.truncate(amount as usize);
    }

    tracing::info!(
        asg_name = %snapshot.name,
        instances = ?nodes.iter().map(|n| n.instance_id.as_str()).collect::<Vec<_>>(),
        "Nodes drained, terminating instances"
    );

    let mut terminated: Vec<DrainedNode> = Vec::with_capacity(nodes.len());
    let mut failures = Vec::new();

    for node in &nodes {
        if !eligible.contains(&node.instance_id) {
            failures.push(TerminationFailure {
                instance_id: node.instance_id.clone(),
                reason: format!("not a member of group {}", snapshot.name),
            });
            continue;
        }

        match provider
            .terminate_instance_decrementing(&node.instance_id)
            .await
        {
            Ok(()) => {
                tracing::debug!(
                    asg_name = %snapshot.name,
                    instance_id = %node.instance_id,
                    "Instance terminated"
                );
                terminated.push(node.clone());
            }
            Err(e) => {
                tracing::warn!(
                    asg_name = %snapshot.name,
                    instance_id = %node.instance_id,
                    error = %e,
                    "Failed to terminate instance"
                );
                failures.push(TerminationFailure {
                    instance_id: node.instance_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let purge_result = if drain.purge {
        drainer.purge(&terminated).await
    } else {
        Ok(())
    };

    if !failures.is_empty() {
        if let Err(e) = purge_result {
            tracing::warn!(asg_name = %snapshot.name, error = %e, "Failed to purge nodes");
        }
        return Err(TargetError::Termination {
            attempted: nodes.len(),
            failures,
        });
    }
    purge_result.map_err(TargetError::PostScaleIn)?;

    Ok(terminated.into_iter().map(|n| n.instance_id).collect())
}
