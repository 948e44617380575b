//! CLI module for asg-target
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `scale` - Move a group toward a desired count
//! - `status` - Show group readiness and current count
//! - `info` - Show plugin identity
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Scale the group named in asg-target.toml to 5 instances
//! asg-target scale 5
//!
//! # Check another group, output as JSON
//! asg-target status --set asg_name=batch-workers --json
//!
//! # Generate shell completions
//! asg-target completions bash > ~/.bash_completion.d/asg-target
//! ```

pub mod completions;
pub mod config;
pub mod info;
pub mod output;
pub mod scale;
pub mod status;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{settings, AppConfig};
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// asg-target - Autoscaling target for cloud-managed instance groups
#[derive(Parser, Debug)]
#[command(
    name = "asg-target",
    version,
    about = "Autoscaling target for cloud-managed instance groups"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scale a group to the given count
    Scale(ScaleArgs),
    /// Show group readiness and current count
    Status(StatusArgs),
    /// Show plugin identity
    Info(InfoArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that talk to a group.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "asg-target.toml")]
    pub config: PathBuf,

    /// Per-call config entry, e.g. `--set asg_name=workers` (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ASG_TARGET_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScaleArgs {
    /// Desired instance count
    pub count: u32,

    /// Reason recorded with the action
    #[arg(short, long)]
    pub reason: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "asg-target.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,

    /// Autoscaling group name written under [target]
    #[arg(long)]
    pub asg_name: Option<String>,

    /// Provider region written under [target]
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &TargetArgs,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        AppConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        AppConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Parse `KEY=VALUE` entries from `--set`.
pub fn parse_set_entries(entries: &[String]) -> Result<HashMap<String, String>, String> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(format!("invalid --set entry '{}', expected KEY=VALUE", entry)),
        })
        .collect()
}

/// Per-call map: the file's `[target]` table with `--set` entries on top.
pub fn call_config(
    config: &AppConfig,
    args: &TargetArgs,
) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let overrides = parse_set_entries(&args.set)?;
    Ok(settings::merge(&config.target, &overrides))
}

/// Cancel `token` on SIGINT or SIGTERM.
pub(crate) fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received SIGINT, cancelling..."),
            _ = terminate => tracing::info!("Received SIGTERM, cancelling..."),
        }

        token.cancel();
    });
}
