//! Output formatting helpers for CLI commands

use crate::target::{PluginInfo, ScaleOutcome, StatusVerdict};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// View model for a finished scale call
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeView {
    pub asg_name: String,
    pub action: &'static str,
    pub from: u32,
    pub to: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
    pub message: String,
}

impl OutcomeView {
    pub fn new(asg_name: &str, outcome: &ScaleOutcome) -> Self {
        let (action, from, to, removed) = match outcome {
            ScaleOutcome::ScaledOut { from, to } => ("scale_out", *from, *to, Vec::new()),
            ScaleOutcome::ScaledIn { from, removed } => (
                "scale_in",
                *from,
                from.saturating_sub(removed.len() as u32),
                removed.clone(),
            ),
            ScaleOutcome::NoopNeeded { current, desired } => {
                ("none", *current, *desired, Vec::new())
            }
        };

        Self {
            asg_name: asg_name.to_string(),
            action,
            from,
            to,
            removed,
            message: outcome.to_string(),
        }
    }
}

/// View model for a status verdict
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub asg_name: String,
    pub ready: bool,
    pub count: u32,
    pub meta: HashMap<String, String>,
}

impl StatusView {
    pub fn new(asg_name: &str, verdict: &StatusVerdict) -> Self {
        Self {
            asg_name: asg_name.to_string(),
            ready: verdict.ready,
            count: verdict.count,
            meta: verdict.meta(),
        }
    }
}

/// Format a scale outcome as a single line
pub fn format_outcome(view: &OutcomeView) -> String {
    let icon = match view.action {
        "none" => "=".yellow(),
        _ => "✓".green(),
    };
    format!("{} {}: {}", icon, view.asg_name.bold(), view.message)
}

/// Format a scale outcome as JSON
pub fn format_outcome_json(view: &OutcomeView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}

/// Render a nanosecond timestamp as RFC 3339
pub fn format_event_time(nanos: i64) -> String {
    DateTime::<Utc>::from_timestamp_nanos(nanos).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a status verdict as a table
pub fn format_status_table(view: &StatusView, last_event: Option<i64>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Group", "Ready", "Count", "Last Event"]);

    let ready = if view.ready {
        "Ready".green().to_string()
    } else {
        "Not Ready".yellow().to_string()
    };
    let last_event = last_event
        .map(format_event_time)
        .unwrap_or_else(|| "-".to_string());

    table.add_row(vec![
        Cell::new(&view.asg_name),
        Cell::new(ready),
        Cell::new(view.count),
        Cell::new(last_event),
    ]);

    table.to_string()
}

/// Format a status verdict as JSON
pub fn format_status_json(view: &StatusView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}

/// Format plugin identity
pub fn format_info(info: &PluginInfo, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(&json!({
            "name": info.name,
            "type": info.plugin_type,
            "version": env!("CARGO_PKG_VERSION"),
        }));
    }

    Ok(format!(
        "Name: {}\nType: {}\nVersion: {}",
        info.name,
        info.plugin_type,
        env!("CARGO_PKG_VERSION")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{AsgTarget, META_KEY_LAST_EVENT};

    #[test]
    fn test_outcome_view_scale_in() {
        let outcome = ScaleOutcome::ScaledIn {
            from: 5,
            removed: vec!["i-1".to_string(), "i-2".to_string()],
        };
        let view = OutcomeView::new("workers", &outcome);

        assert_eq!(view.action, "scale_in");
        assert_eq!(view.from, 5);
        assert_eq!(view.to, 3);
        assert_eq!(view.removed.len(), 2);
    }

    #[test]
    fn test_outcome_noop_message() {
        let outcome = ScaleOutcome::NoopNeeded {
            current: 4,
            desired: 4,
        };
        let view = OutcomeView::new("workers", &outcome);
        let output = format_outcome(&view);

        assert!(output.contains("scaling not required"));
        assert!(output.contains("workers"));
    }

    #[test]
    fn test_outcome_json_omits_empty_removed() {
        let view = OutcomeView::new("workers", &ScaleOutcome::ScaledOut { from: 3, to: 7 });
        let parsed: serde_json::Value =
            serde_json::from_str(&format_outcome_json(&view).unwrap()).unwrap();

        assert_eq!(parsed["action"], "scale_out");
        assert_eq!(parsed["to"], 7);
        assert!(parsed.get("removed").is_none());
    }

    #[test]
    fn test_status_table_with_data() {
        let verdict = StatusVerdict {
            ready: false,
            count: 3,
            last_event: None,
        };
        let view = StatusView::new("workers", &verdict);
        let output = format_status_table(&view, verdict.last_event);

        assert!(output.contains("Group"));
        assert!(output.contains("workers"));
        assert!(output.contains("Not Ready"));
    }

    #[test]
    fn test_status_json_carries_meta() {
        let verdict = StatusVerdict {
            ready: true,
            count: 2,
            last_event: Some(1_700_000_000_000_000_000),
        };
        let output = format_status_json(&StatusView::new("workers", &verdict)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["ready"], true);
        assert_eq!(
            parsed["meta"][META_KEY_LAST_EVENT],
            "1700000000000000000"
        );
    }

    #[test]
    fn test_format_event_time() {
        assert_eq!(
            format_event_time(1_700_000_000_000_000_000),
            "2023-11-14T22:13:20Z"
        );
    }

    #[test]
    fn test_format_info() {
        let info = AsgTarget::plugin_info();
        assert!(format_info(&info, false).unwrap().contains("aws-asg"));

        let parsed: serde_json::Value =
            serde_json::from_str(&format_info(&info, true).unwrap()).unwrap();
        assert_eq!(parsed["type"], "target");
    }
}
