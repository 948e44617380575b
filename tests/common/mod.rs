//! Shared test utilities for asg-target integration tests.
//!
//! Builders for the gateway's JSON shapes and for configs pointed at
//! wiremock servers.

#![allow(dead_code)]

use asg_target::config::AppConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Gateway Payloads
// =============================================================================

/// A healthy in-service instance.
pub fn instance_json(id: &str) -> Value {
    json!({
        "instance_id": id,
        "lifecycle_state": "InService",
        "health_status": "Healthy"
    })
}

/// Describe-groups response holding one group with `ids` as its instances.
pub fn groups_json(name: &str, desired: u32, ids: &[&str]) -> Value {
    json!({
        "groups": [{
            "name": name,
            "desired_capacity": desired,
            "min_size": 0,
            "max_size": 10,
            "instances": ids.iter().map(|id| instance_json(id)).collect::<Vec<_>>()
        }]
    })
}

/// Activities response with a single record.
pub fn activity_json(progress: u8, end_time: Option<&str>) -> Value {
    json!({
        "activities": [{
            "activity_id": "a-1",
            "progress": progress,
            "status_code": if progress == 100 { "Successful" } else { "InProgress" },
            "end_time": end_time
        }]
    })
}

// =============================================================================
// Mock Mounting
// =============================================================================

/// Answer describe-groups for `name` with `body`.
pub async fn mount_describe(server: &MockServer, name: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer describe-groups for `name` with `body`, `times` times only.
pub async fn mount_describe_times(server: &MockServer, name: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

// =============================================================================
// Config Builders
// =============================================================================

/// Per-call map naming `group` with fast convergence polling.
pub fn call_config(group: &str) -> HashMap<String, String> {
    HashMap::from([
        ("asg_name".to_string(), group.to_string()),
        ("convergence_poll_interval".to_string(), "20ms".to_string()),
        ("convergence_timeout".to_string(), "5s".to_string()),
    ])
}

/// App config pointed at the given provider and drain servers.
pub fn app_config(provider: &MockServer, drain: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.provider.endpoint = provider.uri();
    config.provider.request_timeout_seconds = 5;
    config.drain.endpoint = drain.uri();
    config.drain.request_timeout_seconds = 5;
    config
        .target
        .insert("region".to_string(), "eu-west-1".to_string());
    config
}
