// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Argo CD Management SDK
//!
//! High-level client for the Argo CD API server.
//!
//! This crate turns a [`ConnectionConfig`] into a ready [`ArgoCdClient`] and
//! exposes every supported operation through the [`ArgoCdApi`] trait:
//!
//! - Applications (list, get, create, update, delete, sync, rollback,
//!   manifests, events, logs, resource tree, refresh, terminate)
//! - Clusters, projects and repositories (list, get, create, update, delete)
//! - Session (who am I)
//!
//! Code that handles requests should depend on [`ArgoCdApi`] rather than the
//! concrete client, so tests can substitute `MockArgoCdApi` (enable the
//! `mock` feature).
//!
//! # Example
//!
//! ```no_run
//! use argocd_management_sdk::{ArgoCdApi, ArgoCdClient, ConnectionConfig, PodLogsOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::new("argocd.example.com:443", "my-token");
//!
//! let logs = ArgoCdClient::scoped(config, async |client| {
//!     client
//!         .get_application_logs(PodLogsOptions::new("guestbook").with_tail_lines(20))
//!         .await
//! })
//! .await?;
//!
//! for entry in logs.logs {
//!     println!("{}", entry.content);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod facade;
pub mod logs;
mod types;

pub use client::ArgoCdClient;
pub use config::{ConnectionConfig, DEFAULT_TIMEOUT};
pub use error::{ConfigError, Result, SdkError};
pub use facade::ArgoCdApi;
#[cfg(any(test, feature = "mock"))]
pub use facade::MockArgoCdApi;
pub use types::{
    DEFAULT_TAIL_LINES, DeleteApplicationOptions, ListApplicationsOptions, LogEntry, LogResponse,
    MAX_BUFFERED_ENTRIES, PodLogsOptions, RefreshKind, ResourceEventsOptions,
    RollbackApplicationOptions, SyncApplicationOptions, UserInfo,
};

// Re-export the wire types that appear in the facade's signatures
pub use argocd_protocol::proto::application::ManifestResponse;
pub use argocd_protocol::proto::meta::{Event, EventList, ObjectMeta};
pub use argocd_protocol::proto::v1alpha1::{
    AppProject, AppProjectList, Application, ApplicationList, ApplicationTree, Cluster,
    ClusterList, Repository, RepositoryList, SyncOperationResource,
};
pub use argocd_protocol::{Code, TransportMode, TransportPlan};
