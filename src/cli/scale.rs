//! Scale command implementation

use crate::cli::output::{format_outcome, format_outcome_json, OutcomeView};
use crate::cli::{call_config, cancel_on_signal, load_config_with_overrides, ScaleArgs};
use crate::config::settings;
use crate::target::{AsgTarget, ScaleAction};
use tokio_util::sync::CancellationToken;

/// Handle `asg-target scale`
///
/// A group that already matches the count is reported, not treated as a failure.
pub async fn run_scale(args: &ScaleArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.target)?;
    crate::logging::init_tracing(&config.logging)?;

    let per_call = call_config(&config, &args.target)?;
    let cancel = CancellationToken::new();
    cancel_on_signal(cancel.clone());

    let target = AsgTarget::from_app_config(&config)?.with_cancellation(cancel);
    let action = ScaleAction {
        count: args.count,
        reason: args.reason.clone(),
    };

    let outcome = target.scale(&action, &per_call).await?;

    let asg_name = settings::require_group_name(&per_call)?;
    let view = OutcomeView::new(asg_name, &outcome);
    if args.json {
        Ok(format_outcome_json(&view)?)
    } else {
        Ok(format_outcome(&view))
    }
}
