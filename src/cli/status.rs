//! Status command implementation

use crate::cli::output::{format_status_json, format_status_table, StatusView};
use crate::cli::{call_config, load_config_with_overrides, StatusArgs};
use crate::config::settings;
use crate::target::AsgTarget;

/// Handle `asg-target status`
pub async fn run_status(args: &StatusArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.target)?;
    crate::logging::init_tracing(&config.logging)?;

    let per_call = call_config(&config, &args.target)?;
    let target = AsgTarget::from_app_config(&config)?;
    let verdict = target.status(&per_call).await?;

    let view = StatusView::new(settings::require_group_name(&per_call)?, &verdict);
    if args.json {
        Ok(format_status_json(&view)?)
    } else {
        Ok(format_status_table(&view, verdict.last_event))
    }
}
