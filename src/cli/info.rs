//! Info command implementation

use crate::cli::output::format_info;
use crate::cli::InfoArgs;
use crate::target::AsgTarget;

/// Handle `asg-target info`
pub fn handle_info(args: &InfoArgs) -> Result<String, Box<dyn std::error::Error>> {
    Ok(format_info(&AsgTarget::plugin_info(), args.json)?)
}
