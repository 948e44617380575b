//! Config command handlers

use crate::cli::ConfigInitArgs;
use crate::config::settings::{KEY_ASG_NAME, KEY_REGION};
use crate::config::{AppConfig, ConfigError};
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../asg-target.example.toml");

/// Render the example config with the group and region from `args` filled in.
///
/// The result is parsed and validated before it is returned, so a name that
/// would produce a broken file never reaches disk.
pub fn render_config(args: &ConfigInitArgs) -> Result<String, ConfigError> {
    let rendered = EXAMPLE_CONFIG
        .lines()
        .map(|line| {
            let key = line.split('=').next().unwrap_or_default().trim();
            let value = match key {
                KEY_ASG_NAME => args.asg_name.as_deref(),
                KEY_REGION => args.region.as_deref(),
                _ => None,
            };
            match value {
                Some(v) => format!("{} = {}", key, toml::Value::String(v.to_string())),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n";

    let config: AppConfig =
        toml::from_str(&rendered).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    if config.target.get(KEY_ASG_NAME).map_or(true, |n| n.trim().is_empty()) {
        return Err(ConfigError::Validation {
            field: format!("target.{}", KEY_ASG_NAME),
            message: "group name cannot be empty".to_string(),
        });
    }

    Ok(rendered)
}

/// Handle `asg-target config init`
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    let content = render_config(args)?;
    fs::write(&args.output, content)?;

    println!("✓ Configuration file created: {}", args.output.display());
    if args.asg_name.is_none() {
        println!("  Set asg_name under [target] and point [provider] at your gateway.");
    }

    Ok(())
}
