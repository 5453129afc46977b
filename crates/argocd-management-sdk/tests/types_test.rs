// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Option builder and serialization tests for argocd-management-sdk.

use argocd_management_sdk::{
    DEFAULT_TAIL_LINES, DeleteApplicationOptions, ListApplicationsOptions, LogEntry, LogResponse,
    MAX_BUFFERED_ENTRIES, PodLogsOptions, RefreshKind, ResourceEventsOptions,
    RollbackApplicationOptions, SyncApplicationOptions,
};

#[test]
fn test_refresh_kind() {
    assert_eq!(RefreshKind::default(), RefreshKind::Normal);
    assert_eq!(RefreshKind::Normal.as_str(), "normal");
    assert_eq!(RefreshKind::Hard.as_str(), "hard");
    assert_eq!(serde_json::to_string(&RefreshKind::Hard).unwrap(), "\"hard\"");
}

#[test]
fn test_list_applications_options_builder() {
    let options = ListApplicationsOptions::new()
        .with_project("default")
        .with_project("platform")
        .with_selector("team=payments")
        .with_repo("https://github.com/argoproj/argocd-example-apps.git");

    assert_eq!(options.projects, vec!["default", "platform"]);
    assert_eq!(options.selector.as_deref(), Some("team=payments"));
    assert!(options.app_namespace.is_none());
}

#[test]
fn test_delete_options_cascade_by_default() {
    let options = DeleteApplicationOptions::new("guestbook");
    assert!(options.cascade);
    assert!(options.propagation_policy.is_none());

    let options = options
        .with_cascade(false)
        .with_propagation_policy("background");
    assert!(!options.cascade);
    assert_eq!(options.propagation_policy.as_deref(), Some("background"));
}

#[test]
fn test_sync_options_builder() {
    let options = SyncApplicationOptions::new("guestbook")
        .with_revision("v1.2.0")
        .with_prune(true)
        .with_resource("apps", "Deployment", "guestbook-ui");

    assert_eq!(options.name, "guestbook");
    assert_eq!(options.revision.as_deref(), Some("v1.2.0"));
    assert!(options.prune);
    assert!(!options.dry_run);
    assert_eq!(options.resources.len(), 1);
    assert_eq!(options.resources[0].kind, "Deployment");
    assert_eq!(options.resources[0].name, "guestbook-ui");
}

#[test]
fn test_rollback_options_builder() {
    let options = RollbackApplicationOptions::new("guestbook", 3).with_dry_run(true);
    assert_eq!(options.id, 3);
    assert!(options.dry_run);
    assert!(!options.prune);
}

#[test]
fn test_resource_events_options_builder() {
    let options = ResourceEventsOptions::new("guestbook").with_resource(
        "default",
        "guestbook-ui",
        "5f0c7e3a-1d2b-4c9e-8a55-6c1f0e9b2d11",
    );
    assert_eq!(options.resource_namespace.as_deref(), Some("default"));
    assert_eq!(options.resource_name.as_deref(), Some("guestbook-ui"));
}

#[test]
fn test_pod_logs_options_defaults() {
    let options = PodLogsOptions::new("guestbook");
    assert_eq!(options.application, "guestbook");
    assert_eq!(options.tail_lines, DEFAULT_TAIL_LINES);
    assert_eq!(options.max_entries, MAX_BUFFERED_ENTRIES);
    assert!(!options.follow);
    assert!(!options.previous);
    assert!(options.pod_name.is_none());
}

#[test]
fn test_pod_logs_options_builder() {
    let options = PodLogsOptions::new("guestbook")
        .with_namespace("default")
        .with_resource("apps", "Deployment", "guestbook-ui")
        .with_container("ui")
        .with_tail_lines(10)
        .with_since_seconds(300)
        .with_filter("ERROR")
        .with_max_entries(50);

    assert_eq!(options.kind.as_deref(), Some("Deployment"));
    assert_eq!(options.group.as_deref(), Some("apps"));
    assert_eq!(options.resource_name.as_deref(), Some("guestbook-ui"));
    assert_eq!(options.container.as_deref(), Some("ui"));
    assert_eq!(options.tail_lines, 10);
    assert_eq!(options.since_seconds, Some(300));
    assert_eq!(options.max_entries, 50);
}

#[test]
fn test_log_response_omits_missing_fields() {
    let response = LogResponse {
        application: "guestbook".to_string(),
        pod_name: None,
        container: None,
        total_lines: 1,
        logs: vec![LogEntry {
            timestamp: None,
            pod_name: None,
            content: "listening on :8080".to_string(),
        }],
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["application"], "guestbook");
    assert_eq!(json["total_lines"], 1);
    assert!(json.get("pod_name").is_none());
    assert!(json.get("container").is_none());
    assert!(json["logs"][0].get("timestamp").is_none());
    assert_eq!(json["logs"][0]["content"], "listening on :8080");
}

#[test]
fn test_log_entry_serialization_with_metadata() {
    let entry = LogEntry {
        timestamp: Some("2024-05-01T10:00:00Z".to_string()),
        pod_name: Some("guestbook-ui-7d5f".to_string()),
        content: "ready".to_string(),
    };
    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains("\"timestamp\":\"2024-05-01T10:00:00Z\""));
    assert!(json.contains("\"pod_name\":\"guestbook-ui-7d5f\""));
}
