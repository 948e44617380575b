//! Scale-out executor.

use super::{reader, TargetError};
use crate::config::ConvergenceSettings;
use crate::provider::{GroupProvider, GroupSnapshot};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Set desired capacity to `new_desired` and wait until that many instances
/// are in service and healthy.
///
/// No rollback on timeout: the new desired capacity stays issued and the
/// caller should poll status.
pub async fn scale_out(
    provider: &dyn GroupProvider,
    snapshot: &GroupSnapshot,
    new_desired: u32,
    convergence: ConvergenceSettings,
    cancel: &CancellationToken,
) -> Result<(), TargetError> {
    let name = snapshot.name.as_str();

    provider
        .set_desired_capacity(name, new_desired)
        .await
        .map_err(|e| TargetError::provider("failed to set desired capacity", e))?;

    tracing::info!(
        asg_name = name,
        from = snapshot.desired_capacity,
        to = new_desired,
        "Desired capacity updated, waiting for instances"
    );

    wait_for_serving(provider, name, new_desired, convergence, cancel).await
}

async fn wait_for_serving(
    provider: &dyn GroupProvider,
    name: &str,
    desired: u32,
    convergence: ConvergenceSettings,
    cancel: &CancellationToken,
) -> Result<(), TargetError> {
    let start = Instant::now();
    let deadline = tokio::time::Instant::now() + convergence.timeout;
    let mut in_service = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(TargetError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => {
                return Err(TargetError::Timeout {
                    desired,
                    in_service,
                    elapsed: start.elapsed(),
                });
            }
            _ = tokio::time::sleep(convergence.poll_interval) => {}
        }

        // Transient read failures are retried until the deadline.
        match reader::describe_group(provider, name).await {
            Ok(snapshot) => {
                in_service = snapshot.serving_count();
                tracing::debug!(
                    asg_name = name,
                    desired,
                    in_service,
                    "Polled group convergence"
                );
                if in_service >= desired as usize {
                    tracing::info!(
                        asg_name = name,
                        in_service,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Group converged"
                    );
                    return Ok(());
                }
            }
            Err(e) => {
                tracing::warn!(asg_name = name, error = %e, "Convergence poll failed");
            }
        }
    }
}
