// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request/response messages of `application.ApplicationService`.

use serde::{Deserialize, Serialize};

use super::meta::Time;
use super::v1alpha1::{Application, SyncOperationResource};

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationQuery {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// `normal` or `hard`; forces the controller to re-read the application.
    #[prost(string, optional, tag = "2")]
    pub refresh: Option<String>,
    #[prost(string, repeated, tag = "3")]
    pub projects: Vec<String>,
    #[prost(string, optional, tag = "4")]
    pub resource_version: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub selector: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub repo: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub app_namespace: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationCreateRequest {
    #[prost(message, optional, tag = "1")]
    pub application: Option<Application>,
    #[prost(bool, optional, tag = "2")]
    pub upsert: Option<bool>,
    #[prost(bool, optional, tag = "3")]
    pub validate: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationUpdateRequest {
    #[prost(message, optional, tag = "1")]
    pub application: Option<Application>,
    #[prost(bool, optional, tag = "2")]
    pub validate: Option<bool>,
    #[prost(string, optional, tag = "3")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationDeleteRequest {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(bool, optional, tag = "2")]
    pub cascade: Option<bool>,
    #[prost(string, optional, tag = "3")]
    pub propagation_policy: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationSyncRequest {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub revision: Option<String>,
    #[prost(bool, optional, tag = "3")]
    pub dry_run: Option<bool>,
    #[prost(bool, optional, tag = "4")]
    pub prune: Option<bool>,
    #[prost(message, repeated, tag = "7")]
    pub resources: Vec<SyncOperationResource>,
    #[prost(string, optional, tag = "12")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "13")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationRollbackRequest {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    /// Deployment history entry to roll back to.
    #[prost(int64, optional, tag = "2")]
    pub id: Option<i64>,
    #[prost(bool, optional, tag = "3")]
    pub dry_run: Option<bool>,
    #[prost(bool, optional, tag = "4")]
    pub prune: Option<bool>,
    #[prost(string, optional, tag = "6")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationManifestQuery {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub revision: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestResponse {
    /// Rendered manifests, one JSON document per entry.
    #[prost(string, repeated, tag = "1")]
    pub manifests: Vec<String>,
    #[prost(string, tag = "2")]
    pub namespace: String,
    #[prost(string, tag = "3")]
    pub server: String,
    #[prost(string, tag = "4")]
    pub revision: String,
    #[prost(string, tag = "5")]
    pub source_type: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationResourceEventsQuery {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub resource_namespace: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub resource_name: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub resource_uid: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourcesQuery {
    #[prost(string, optional, tag = "1")]
    pub application_name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub namespace: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub version: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub group: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub kind: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationPodLogsQuery {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub namespace: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub pod_name: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub container: Option<String>,
    #[prost(int64, optional, tag = "5")]
    pub since_seconds: Option<i64>,
    #[prost(int64, optional, tag = "7")]
    pub tail_lines: Option<i64>,
    #[prost(bool, optional, tag = "8")]
    pub follow: Option<bool>,
    #[prost(string, optional, tag = "10")]
    pub filter: Option<String>,
    #[prost(string, optional, tag = "11")]
    pub kind: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub group: Option<String>,
    #[prost(string, optional, tag = "13")]
    pub resource_name: Option<String>,
    #[prost(bool, optional, tag = "14")]
    pub previous: Option<bool>,
    #[prost(string, optional, tag = "15")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "16")]
    pub project: Option<String>,
    #[prost(bool, optional, tag = "17")]
    pub match_case: Option<bool>,
}

/// One frame of the `PodLogs` server stream.
///
/// `last` is the in-band terminal marker: the server sends it once the
/// requested lines have been delivered and no further entries follow.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogEntry {
    #[prost(string, optional, tag = "1")]
    pub content: Option<String>,
    #[prost(message, optional, tag = "2")]
    pub time_stamp: Option<Time>,
    #[prost(bool, optional, tag = "3")]
    pub last: Option<bool>,
    #[prost(string, optional, tag = "4")]
    pub time_stamp_str: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub pod_name: Option<String>,
}

impl LogEntry {
    /// Whether this frame is the terminal marker.
    pub fn is_last(&self) -> bool {
        self.last.unwrap_or(false)
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationTerminateRequest {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub app_namespace: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub project: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationTerminateResponse {}
