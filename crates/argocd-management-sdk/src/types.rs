// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! High-level types for the management SDK.

use argocd_protocol::proto::v1alpha1::SyncOperationResource;
use serde::{Deserialize, Serialize};

/// Lines requested from the server when the caller does not say.
pub const DEFAULT_TAIL_LINES: i64 = 100;

/// Upper bound on entries buffered from one log stream.
pub const MAX_BUFFERED_ENTRIES: usize = 10_000;

/// How hard the controller should re-read an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshKind {
    /// Re-compare live state against the cached manifests.
    #[default]
    Normal,
    /// Regenerate manifests, bypassing the repo-server cache.
    Hard,
}

impl RefreshKind {
    /// Value expected by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

/// Identity of the caller as seen by the API server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub logged_in: bool,
    pub username: String,
    pub issuer: String,
    pub groups: Vec<String>,
}

/// Options for listing applications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListApplicationsOptions {
    /// Only applications in these projects.
    pub projects: Vec<String>,
    /// Label selector (`key=value,...`).
    pub selector: Option<String>,
    /// Only applications sourced from this repository URL.
    pub repo: Option<String>,
    pub app_namespace: Option<String>,
}

impl ListApplicationsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.projects.push(project.into());
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = Some(namespace.into());
        self
    }
}

/// Options for deleting an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteApplicationOptions {
    pub name: String,
    /// Also delete the application's resources (default: true).
    pub cascade: bool,
    /// `foreground`, `background` or `orphan`.
    pub propagation_policy: Option<String>,
    pub app_namespace: Option<String>,
}

impl DeleteApplicationOptions {
    /// Create new options with required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cascade: true,
            propagation_policy: None,
            app_namespace: None,
        }
    }

    pub fn with_cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn with_propagation_policy(mut self, policy: impl Into<String>) -> Self {
        self.propagation_policy = Some(policy.into());
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = Some(namespace.into());
        self
    }
}

/// Options for syncing an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncApplicationOptions {
    pub name: String,
    /// Revision to sync to; the target revision when unset.
    pub revision: Option<String>,
    pub prune: bool,
    pub dry_run: bool,
    /// Sync only these resources. Empty means the whole application.
    pub resources: Vec<SyncOperationResource>,
    pub app_namespace: Option<String>,
}

impl SyncApplicationOptions {
    /// Create new options with required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Restrict the sync to one resource (`group`, `kind`, `name`).
    pub fn with_resource(
        mut self,
        group: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.resources.push(SyncOperationResource {
            group: group.into(),
            kind: kind.into(),
            name: name.into(),
            namespace: String::new(),
        });
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = Some(namespace.into());
        self
    }
}

/// Options for rolling an application back to a deployment history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollbackApplicationOptions {
    pub name: String,
    /// History entry id.
    pub id: i64,
    pub prune: bool,
    pub dry_run: bool,
    pub app_namespace: Option<String>,
}

impl RollbackApplicationOptions {
    /// Create new options with required fields.
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
            ..Default::default()
        }
    }

    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = Some(namespace.into());
        self
    }
}

/// Options for listing Kubernetes events of an application or one of its
/// resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceEventsOptions {
    pub name: String,
    pub resource_namespace: Option<String>,
    pub resource_name: Option<String>,
    pub resource_uid: Option<String>,
    pub app_namespace: Option<String>,
}

impl ResourceEventsOptions {
    /// Create new options with required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Narrow to a single resource.
    pub fn with_resource(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        self.resource_namespace = Some(namespace.into());
        self.resource_name = Some(name.into());
        self.resource_uid = Some(uid.into());
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = Some(namespace.into());
        self
    }
}

/// Options for fetching container logs of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodLogsOptions {
    /// Application name.
    pub application: String,
    pub namespace: Option<String>,
    pub pod_name: Option<String>,
    pub container: Option<String>,
    /// Resource selection when no pod name is given (e.g. `Deployment`).
    pub kind: Option<String>,
    pub group: Option<String>,
    pub resource_name: Option<String>,
    pub since_seconds: Option<i64>,
    /// Lines from the end of each log (default: 100).
    pub tail_lines: i64,
    pub follow: bool,
    /// Logs of the previous container instance.
    pub previous: bool,
    /// Only lines containing this string.
    pub filter: Option<String>,
    pub app_namespace: Option<String>,
    pub project: Option<String>,
    /// Stop reading after this many entries (default: 10 000).
    pub max_entries: usize,
}

impl PodLogsOptions {
    /// Create new options with required fields.
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            namespace: None,
            pod_name: None,
            container: None,
            kind: None,
            group: None,
            resource_name: None,
            since_seconds: None,
            tail_lines: DEFAULT_TAIL_LINES,
            follow: false,
            previous: false,
            filter: None,
            app_namespace: None,
            project: None,
            max_entries: MAX_BUFFERED_ENTRIES,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_pod(mut self, pod_name: impl Into<String>) -> Self {
        self.pod_name = Some(pod_name.into());
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Select pods through an owning resource instead of a pod name.
    pub fn with_resource(
        mut self,
        group: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.group = Some(group.into());
        self.kind = Some(kind.into());
        self.resource_name = Some(name.into());
        self
    }

    pub fn with_since_seconds(mut self, seconds: i64) -> Self {
        self.since_seconds = Some(seconds);
        self
    }

    pub fn with_tail_lines(mut self, lines: i64) -> Self {
        self.tail_lines = lines;
        self
    }

    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub fn with_previous(mut self, previous: bool) -> Self {
        self.previous = previous;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = Some(namespace.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    /// Line content without the trailing newline.
    pub content: String,
}

/// Logs collected from one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub application: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Lines received from the server. The warning entry appended to `logs`
    /// after a broken stream is not counted.
    pub total_lines: usize,
    pub logs: Vec<LogEntry>,
}
