//! Scaling target for a cloud-managed instance group.
//!
//! [`AsgTarget`] ties the pieces together for a single request:
//!
//! ```text
//! scale:  config -> describe group (once) -> calculate_direction
//!                -> scale_in | scale_out | NoopNeeded
//! status: config -> describe group + activities -> reconcile_status
//! ```
//!
//! Nothing is cached between calls. Concurrent calls for different groups
//! are independent; concurrent calls for the same group are not serialized
//! here, the caller owns that.

pub mod direction;
pub mod error;
pub mod reader;
pub mod scale_in;
pub mod scale_out;
pub mod status;


pub use direction::{calculate_direction, ScaleDirection};
pub use error::{ScaleOutcome, TargetError, TerminationFailure};
pub use status::{reconcile_status, StatusVerdict, META_KEY_LAST_EVENT};

use crate::config::{settings, AppConfig, ConfigError, TargetSettings};
use crate::drain::{HttpNodeDrainer, NodeDrainer};
use crate::provider::{ActivityFilter, GroupProvider, HttpGroupProvider};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Unique name of this target among target plugins.
pub const PLUGIN_NAME: &str = "aws-asg";

/// Identity reported to the orchestrating host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: &'static str,
    pub plugin_type: &'static str,
}

/// Desired count produced by the upstream strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleAction {
    pub count: u32,
    pub reason: Option<String>,
}

impl ScaleAction {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            reason: None,
        }
    }
}

/// The scaling target. Cheap to share behind an `Arc`.
pub struct AsgTarget {
    provider: Arc<dyn GroupProvider>,
    drainer: Arc<dyn NodeDrainer>,
    /// Plugin-level operator map; per-call maps are layered on top.
    config: HashMap<String, String>,
    settings: TargetSettings,
    cancel: CancellationToken,
}

impl AsgTarget {
    /// Build a target from injected collaborators and the plugin-level map.
    pub fn new(
        provider: Arc<dyn GroupProvider>,
        drainer: Arc<dyn NodeDrainer>,
        config: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let settings = TargetSettings::from_map(&config)?;
        Ok(Self {
            provider,
            drainer,
            config,
            settings,
            cancel: CancellationToken::new(),
        })
    }

    /// Build a target wired to the HTTP provider and drain adapters.
    pub fn from_app_config(app: &AppConfig) -> Result<Self, ConfigError> {
        let settings = TargetSettings::from_map(&app.target)?;
        let client = Arc::new(reqwest::Client::builder().build().map_err(|e| {
            ConfigError::Validation {
                field: "provider".to_string(),
                message: format!("failed to build HTTP client: {}", e),
            }
        })?);

        let provider = HttpGroupProvider::new(
            app.provider.endpoint.clone(),
            Arc::clone(&client),
            settings.provider.clone(),
            Duration::from_secs(app.provider.request_timeout_seconds),
        );
        let drainer = HttpNodeDrainer::new(
            app.drain.endpoint.clone(),
            client,
            Duration::from_secs(app.drain.request_timeout_seconds),
        );

        Self::new(Arc::new(provider), Arc::new(drainer), app.target.clone())
    }

    /// Abort in-flight convergence waits when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn plugin_info() -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME,
            plugin_type: "target",
        }
    }

    /// Settings resolved from the plugin-level map.
    pub fn settings(&self) -> &TargetSettings {
        &self.settings
    }

    /// Move the group named in `config` toward `action.count`.
    ///
    /// The group is read exactly once; that snapshot drives both the
    /// direction and the executor. An already-matching group yields
    /// [`ScaleOutcome::NoopNeeded`] without any provider write.
    pub async fn scale(
        &self,
        action: &ScaleAction,
        config: &HashMap<String, String>,
    ) -> Result<ScaleOutcome, TargetError> {
        let name = settings::require_group_name(config)?;
        let resolved = TargetSettings::from_map(&settings::merge(&self.config, config))?;

        let span = tracing::info_span!(
            "scale",
            asg_name = name,
            action_id = %uuid::Uuid::new_v4(),
            desired = action.count,
        );

        self.scale_inner(name, action, &resolved).instrument(span).await
    }

    async fn scale_inner(
        &self,
        name: &str,
        action: &ScaleAction,
        resolved: &TargetSettings,
    ) -> Result<ScaleOutcome, TargetError> {
        let start = Instant::now();
        let snapshot = reader::describe_group(self.provider.as_ref(), name).await?;
        let direction = calculate_direction(snapshot.desired_capacity, action.count);

        tracing::debug!(
            current = snapshot.desired_capacity,
            direction = %direction,
            reason = action.reason.as_deref().unwrap_or(""),
            "Calculated scaling direction"
        );

        let result = match direction {
            ScaleDirection::In(amount) => scale_in::scale_in(
                self.provider.as_ref(),
                self.drainer.as_ref(),
                &snapshot,
                amount,
                &resolved.drain,
            )
            .await
            .map(|removed| ScaleOutcome::ScaledIn {
                from: snapshot.desired_capacity,
                removed,
            }),
            ScaleDirection::Out(target) => scale_out::scale_out(
                self.provider.as_ref(),
                &snapshot,
                target,
                resolved.convergence,
                &self.cancel,
            )
            .await
            .map(|()| ScaleOutcome::ScaledOut {
                from: snapshot.desired_capacity,
                to: target,
            }),
            ScaleDirection::NoOp => {
                let outcome = ScaleOutcome::NoopNeeded {
                    current: snapshot.desired_capacity,
                    desired: action.count,
                };
                tracing::info!("{}", outcome);
                metrics::counter!("asg_target_scale_actions_total",
                    "direction" => "none",
                    "result" => "noop"
                )
                .increment(1);
                return Ok(outcome);
            }
        };

        let result_label = if result.is_ok() { "success" } else { "error" };
        metrics::counter!("asg_target_scale_actions_total",
            "direction" => direction.tag(),
            "result" => result_label
        )
        .increment(1);
        metrics::histogram!("asg_target_scale_duration_seconds",
            "direction" => direction.tag()
        )
        .record(start.elapsed().as_secs_f64());

        match result {
            Ok(outcome) => {
                tracing::info!(outcome = %outcome, "Scaling action completed");
                Ok(outcome)
            }
            Err(e) => Err(TargetError::ScalingAction(Box::new(e))),
        }
    }

    /// Readiness and current count of the group named in `config`.
    pub async fn status(
        &self,
        config: &HashMap<String, String>,
    ) -> Result<StatusVerdict, TargetError> {
        let name = settings::require_group_name(config)?;
        let span = tracing::info_span!(
            "status",
            asg_name = name,
            action_id = %uuid::Uuid::new_v4(),
        );

        async {
            let snapshot = reader::describe_group(self.provider.as_ref(), name).await?;
            let activities =
                reader::describe_activities(self.provider.as_ref(), name, ActivityFilter::all())
                    .await?;

            let verdict = reconcile_status(&snapshot, &activities);
            tracing::debug!(
                ready = verdict.ready,
                count = verdict.count,
                activities = activities.len(),
                "Reconciled group status"
            );
            Ok(verdict)
        }
        .instrument(span)
        .await
    }
}
