// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The management facade.
//!
//! [`ArgoCdApi`] is the single surface callers program against. Each method
//! maps to exactly one remote call. Implementations do not cache, retry or
//! stitch pages together.

use argocd_protocol::proto::application::ManifestResponse;
use argocd_protocol::proto::meta::EventList;
use argocd_protocol::proto::v1alpha1::{
    AppProject, AppProjectList, Application, ApplicationList, ApplicationTree, Cluster,
    ClusterList, Repository, RepositoryList,
};
use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    DeleteApplicationOptions, ListApplicationsOptions, LogResponse, PodLogsOptions, RefreshKind,
    ResourceEventsOptions, RollbackApplicationOptions, SyncApplicationOptions, UserInfo,
};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ArgoCdApi: Send + Sync {
    // =========================================================================
    // Applications
    // =========================================================================

    async fn list_applications(&self, options: ListApplicationsOptions)
    -> Result<ApplicationList>;

    async fn get_application(&self, name: &str, app_namespace: Option<String>)
    -> Result<Application>;

    /// Create an application. With `upsert`, an existing application with
    /// the same name is updated instead of rejected.
    async fn create_application(&self, application: Application, upsert: bool)
    -> Result<Application>;

    async fn update_application(&self, application: Application) -> Result<Application>;

    async fn delete_application(&self, options: DeleteApplicationOptions) -> Result<()>;

    async fn sync_application(&self, options: SyncApplicationOptions) -> Result<Application>;

    async fn rollback_application(&self, options: RollbackApplicationOptions)
    -> Result<Application>;

    /// Rendered manifests at `revision` (the target revision when `None`).
    async fn get_application_manifests(
        &self,
        name: &str,
        revision: Option<String>,
        app_namespace: Option<String>,
    ) -> Result<ManifestResponse>;

    async fn get_application_events(&self, options: ResourceEventsOptions) -> Result<EventList>;

    /// Tail container logs. Partial results are returned when the stream
    /// breaks after at least one line.
    async fn get_application_logs(&self, options: PodLogsOptions) -> Result<LogResponse>;

    async fn get_resource_tree(
        &self,
        name: &str,
        app_namespace: Option<String>,
    ) -> Result<ApplicationTree>;

    /// Ask the controller to re-read the application, returning it afterwards.
    async fn refresh_application(
        &self,
        name: &str,
        kind: RefreshKind,
        app_namespace: Option<String>,
    ) -> Result<Application>;

    /// Stop the running sync operation, if any.
    async fn terminate_operation(&self, name: &str, app_namespace: Option<String>) -> Result<()>;

    // =========================================================================
    // Clusters
    // =========================================================================

    async fn list_clusters(&self) -> Result<ClusterList>;

    /// Look a cluster up by server URL.
    async fn get_cluster(&self, server: &str) -> Result<Cluster>;

    async fn create_cluster(&self, cluster: Cluster, upsert: bool) -> Result<Cluster>;

    /// Update the fields named in `updated_fields`, or the whole object when
    /// the mask is empty.
    async fn update_cluster(&self, cluster: Cluster, updated_fields: Vec<String>)
    -> Result<Cluster>;

    async fn delete_cluster(&self, server: &str) -> Result<()>;

    // =========================================================================
    // Projects
    // =========================================================================

    async fn list_projects(&self) -> Result<AppProjectList>;

    async fn get_project(&self, name: &str) -> Result<AppProject>;

    async fn create_project(&self, project: AppProject, upsert: bool) -> Result<AppProject>;

    async fn update_project(&self, project: AppProject) -> Result<AppProject>;

    async fn delete_project(&self, name: &str) -> Result<()>;

    // =========================================================================
    // Repositories
    // =========================================================================

    async fn list_repositories(&self) -> Result<RepositoryList>;

    async fn get_repository(&self, repo: &str) -> Result<Repository>;

    /// Register a repository. `creds_only` stores the credentials as a
    /// template without adding the repository itself.
    async fn create_repository(
        &self,
        repository: Repository,
        upsert: bool,
        creds_only: bool,
    ) -> Result<Repository>;

    async fn update_repository(&self, repository: Repository) -> Result<Repository>;

    async fn delete_repository(&self, repo: &str) -> Result<()>;

    // =========================================================================
    // Session
    // =========================================================================

    async fn get_user_info(&self) -> Result<UserInfo>;

    /// Release the connection. Idempotent.
    async fn close(&self);
}
