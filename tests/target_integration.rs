//! End-to-end tests for the target wired to its HTTP adapters.

mod common;

use asg_target::target::{
    AsgTarget, ScaleAction, ScaleOutcome, TargetError, META_KEY_LAST_EVENT,
};
use common::{
    activity_json, app_config, call_config, groups_json, mount_describe, mount_describe_times,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_scale_out_sets_capacity_and_waits_for_instances() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    // First read drives the decision; later polls see the new instances.
    mount_describe_times(&provider, "workers", groups_json("workers", 2, &["i-1", "i-2"]), 1)
        .await;
    mount_describe(
        &provider,
        "workers",
        groups_json("workers", 4, &["i-1", "i-2", "i-3", "i-4"]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/v1/groups/desired-capacity"))
        .and(header("x-region", "eu-west-1"))
        .and(body_json(json!({
            "group_name": "workers",
            "desired_capacity": 4,
            "honor_cooldown": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let outcome = target
        .scale(&ScaleAction::new(4), &call_config("workers"))
        .await
        .unwrap();

    assert_eq!(outcome, ScaleOutcome::ScaledOut { from: 2, to: 4 });
}

#[tokio::test]
async fn test_scale_in_drains_then_terminates() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "workers", groups_json("workers", 3, &["i-1", "i-2", "i-3"])).await;

    Mock::given(method("POST"))
        .and(path("/v1/drain"))
        .and(body_partial_json(json!({
            "group": "workers",
            "count": 1,
            "eligible_instance_ids": ["i-1", "i-2", "i-3"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes": [{"node_id": "node-b", "instance_id": "i-2"}]
        })))
        .expect(1)
        .mount(&drain)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/instances/terminate"))
        .and(body_json(json!({
            "instance_id": "i-2",
            "should_decrement_desired_capacity": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&provider)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/groups/desired-capacity"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let outcome = target
        .scale(&ScaleAction::new(2), &call_config("workers"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ScaleOutcome::ScaledIn {
            from: 3,
            removed: vec!["i-2".to_string()]
        }
    );
}

#[tokio::test]
async fn test_scale_in_with_purge() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "workers", groups_json("workers", 2, &["i-1", "i-2"])).await;

    Mock::given(method("POST"))
        .and(path("/v1/drain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes": [{"node_id": "node-a", "instance_id": "i-1"}]
        })))
        .mount(&drain)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/instances/terminate"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&provider)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/purge"))
        .and(body_json(json!({"node_ids": ["node-a"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&drain)
        .await;

    let mut app = app_config(&provider, &drain);
    app.target
        .insert("node_purge".to_string(), "true".to_string());

    let target = AsgTarget::from_app_config(&app).unwrap();
    target
        .scale(&ScaleAction::new(1), &call_config("workers"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_drain_rejection_leaves_group_untouched() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "workers", groups_json("workers", 3, &["i-1", "i-2", "i-3"])).await;

    Mock::given(method("POST"))
        .and(path("/v1/drain"))
        .respond_with(ResponseTemplate::new(409).set_body_string("only 1 eligible node"))
        .mount(&drain)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/instances/terminate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let err = target
        .scale(&ScaleAction::new(1), &call_config("workers"))
        .await
        .unwrap_err();

    assert!(matches!(err.root(), TargetError::Drain(_)));
    assert!(err.to_string().contains("only 1 eligible node"));
}

#[tokio::test]
async fn test_noop_issues_no_writes() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "workers", groups_json("workers", 2, &["i-1", "i-2"])).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&drain)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let outcome = target
        .scale(&ScaleAction::new(2), &call_config("workers"))
        .await
        .unwrap();

    assert!(outcome.is_noop());
}

#[tokio::test]
async fn test_status_reports_last_event() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "workers", groups_json("workers", 3, &["i-1", "i-2", "i-3"])).await;

    Mock::given(method("GET"))
        .and(path("/v1/activities"))
        .and(query_param("group", "workers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(activity_json(100, Some("2024-01-01T00:00:00Z"))),
        )
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let verdict = target.status(&call_config("workers")).await.unwrap();

    assert!(verdict.ready);
    assert_eq!(verdict.count, 3);
    assert_eq!(
        verdict.meta().get(META_KEY_LAST_EVENT).map(String::as_str),
        Some("1704067200000000000")
    );
}

#[tokio::test]
async fn test_status_describe_failure_has_context() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let err = target.status(&call_config("workers")).await.unwrap_err();

    assert!(err
        .to_string()
        .starts_with("failed to describe AWS Autoscaling Group"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_status_activities_failure_has_context() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "workers", groups_json("workers", 3, &["i-1", "i-2", "i-3"])).await;

    Mock::given(method("GET"))
        .and(path("/v1/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("throttled"))
        .expect(1)
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let err = target.status(&call_config("workers")).await.unwrap_err();

    assert!(err
        .to_string()
        .starts_with("failed to describe AWS Autoscaling Group activities"));
    assert!(err.to_string().contains("throttled"));
    assert!(matches!(err.root(), TargetError::Provider { .. }));
}

#[tokio::test]
async fn test_scale_out_rejected_by_provider() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe_times(&provider, "workers", groups_json("workers", 2, &["i-1", "i-2"]), 1)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/groups/desired-capacity"))
        .respond_with(ResponseTemplate::new(400).set_body_string("above max size"))
        .expect(1)
        .mount(&provider)
        .await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let err = target
        .scale(&ScaleAction::new(9), &call_config("workers"))
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("failed to perform scaling action: failed to set desired capacity"));
    assert!(matches!(err.root(), TargetError::Provider { .. }));
}

#[tokio::test]
async fn test_unknown_group_is_lookup_error() {
    let provider = MockServer::start().await;
    let drain = MockServer::start().await;

    mount_describe(&provider, "missing", json!({"groups": []})).await;

    let target = AsgTarget::from_app_config(&app_config(&provider, &drain)).unwrap();
    let err = target
        .scale(&ScaleAction::new(3), &call_config("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, TargetError::GroupLookup { matches: 0, .. }));
}
