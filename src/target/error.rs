//! Error and outcome types for scaling and status calls.

use crate::config::ConfigError;
use crate::drain::DrainError;
use crate::provider::ProviderError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// What a successful `scale` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// Desired capacity raised and the group converged.
    ScaledOut { from: u32, to: u32 },
    /// Listed instances were drained and terminated.
    ScaledIn { from: u32, removed: Vec<String> },
    /// The group already matches the requested count. Nothing was issued.
    NoopNeeded { current: u32, desired: u32 },
}

impl ScaleOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoopNeeded { .. })
    }
}

impl fmt::Display for ScaleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScaledOut { from, to } => {
                write!(f, "scaled out from {} to {} instances", from, to)
            }
            Self::ScaledIn { from, removed } => write!(
                f,
                "scaled in from {} by {} instances ({})",
                from,
                removed.len(),
                removed.join(", ")
            ),
            Self::NoopNeeded { current, desired } => write!(
                f,
                "scaling not required, ASG count {} and Autoscaler desired count {}",
                current, desired
            ),
        }
    }
}

/// One instance that could not be terminated during scale in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationFailure {
    pub instance_id: String,
    pub reason: String,
}

impl fmt::Display for TerminationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.instance_id, self.reason)
    }
}

/// Errors returned by the target's `scale` and `status` calls.
#[derive(Error, Debug)]
pub enum TargetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A provider call failed; `context` names the step.
    #[error("{context}: {source}")]
    Provider {
        context: &'static str,
        #[source]
        source: ProviderError,
    },

    /// The group name did not resolve to exactly one group.
    #[error("expected exactly one autoscaling group named {name}, found {matches}")]
    GroupLookup { name: String, matches: usize },

    #[error(
        "timed out after {elapsed:?} waiting for {desired} in-service instances ({in_service} ready)"
    )]
    Timeout {
        desired: u32,
        in_service: usize,
        elapsed: Duration,
    },

    #[error("operation cancelled")]
    Cancelled,

    /// Node selection or drain failed. No capacity change has been made.
    #[error("failed to drain nodes: {0}")]
    Drain(#[source] DrainError),

    /// Some drained instances could not be terminated. Those that were
    /// terminated stay terminated.
    #[error(
        "failed to terminate {} of {attempted} instances: {}",
        .failures.len(),
        join_failures(.failures)
    )]
    Termination {
        attempted: usize,
        failures: Vec<TerminationFailure>,
    },

    #[error("failed to purge scaled-in nodes: {0}")]
    PostScaleIn(#[source] DrainError),

    /// Outer context for any executor failure.
    #[error("failed to perform scaling action: {0}")]
    ScalingAction(#[source] Box<TargetError>),
}

impl TargetError {
    pub(crate) fn provider(context: &'static str, source: ProviderError) -> Self {
        Self::Provider { context, source }
    }

    /// The error with any outer scaling-action context removed.
    pub fn root(&self) -> &TargetError {
        match self {
            Self::ScalingAction(inner) => inner.root(),
            other => other,
        }
    }

    /// Safe to retry the whole call without risk of a half-applied change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            Self::Drain(_) | Self::Provider { .. } | Self::GroupLookup { .. }
        )
    }
}

fn join_failures(failures: &[TerminationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
