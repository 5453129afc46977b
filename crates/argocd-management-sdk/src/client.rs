// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ArgoCdClient for interacting with an Argo CD API server.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use argocd_protocol::proto::application::{
    ApplicationCreateRequest, ApplicationDeleteRequest, ApplicationManifestQuery,
    ApplicationPodLogsQuery, ApplicationQuery, ApplicationResourceEventsQuery,
    ApplicationRollbackRequest, ApplicationSyncRequest, ApplicationUpdateRequest,
    ManifestResponse, OperationTerminateRequest, ResourcesQuery,
};
use argocd_protocol::proto::cluster::{ClusterCreateRequest, ClusterQuery, ClusterUpdateRequest};
use argocd_protocol::proto::meta::EventList;
use argocd_protocol::proto::project::{ProjectCreateRequest, ProjectQuery, ProjectUpdateRequest};
use argocd_protocol::proto::repository::{RepoCreateRequest, RepoQuery, RepoUpdateRequest};
use argocd_protocol::proto::session::GetUserInfoRequest;
use argocd_protocol::proto::v1alpha1::{
    AppProject, AppProjectList, Application, ApplicationList, ApplicationTree, Cluster,
    ClusterList, Repository, RepositoryList,
};
use argocd_protocol::{
    ApplicationServiceClient, AuthedChannel, BearerToken, ClusterServiceClient,
    ProjectServiceClient, RepositoryServiceClient, SessionServiceClient, Status,
    TransportBuilder, TransportPlan,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::config::ConnectionConfig;
use crate::error::{Result, SdkError};
use crate::facade::ArgoCdApi;
use crate::logs::LogConsumer;
use crate::types::{
    DeleteApplicationOptions, ListApplicationsOptions, LogResponse, PodLogsOptions, RefreshKind,
    ResourceEventsOptions, RollbackApplicationOptions, SyncApplicationOptions, UserInfo,
};

/// Sub-service handles sharing one channel.
struct ServiceClients {
    applications: ApplicationServiceClient<AuthedChannel>,
    clusters: ClusterServiceClient<AuthedChannel>,
    projects: ProjectServiceClient<AuthedChannel>,
    repositories: RepositoryServiceClient<AuthedChannel>,
    session: SessionServiceClient<AuthedChannel>,
}

/// [`ArgoCdApi`] over a live connection.
///
/// One client serves one logical request: build it, run the operations the
/// request needs, close it. The connection is established lazily on the
/// first call, so construction never blocks on the network.
pub struct ArgoCdClient {
    services: ServiceClients,
    closed: AtomicBool,
    server_addr: String,
    timeout: Duration,
    plan: TransportPlan,
}

impl ArgoCdClient {
    /// Validate `config` and build the client.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let options = config.transport_options()?;
        let connection =
            TransportBuilder::new(options, BearerToken::new(config.auth_token.clone())).build()?;

        let channel = connection.channel();
        let origin = connection.origin().clone();
        let services = ServiceClients {
            applications: ApplicationServiceClient::with_origin(channel.clone(), origin.clone()),
            clusters: ClusterServiceClient::with_origin(channel.clone(), origin.clone()),
            projects: ProjectServiceClient::with_origin(channel.clone(), origin.clone()),
            repositories: RepositoryServiceClient::with_origin(channel.clone(), origin.clone()),
            session: SessionServiceClient::with_origin(channel, origin),
        };

        info!(
            server = %config.server_addr,
            transport = %connection.plan().mode,
            "Argo CD client ready"
        );

        Ok(Self {
            services,
            closed: AtomicBool::new(false),
            server_addr: config.server_addr.clone(),
            timeout: config.effective_timeout(),
            plan: connection.plan().clone(),
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ConnectionConfig::from_env()?)
    }

    /// Build a client, run `f` with it and close it, whatever `f` returns.
    pub async fn scoped<T, F>(config: ConnectionConfig, f: F) -> Result<T>
    where
        F: AsyncFnOnce(&ArgoCdClient) -> Result<T>,
    {
        let client = Self::new(config)?;
        let result = f(&client).await;
        client.close().await;
        result
    }

    /// Per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Transport chosen for this client.
    pub fn plan(&self) -> &TransportPlan {
        &self.plan
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// The handles, unless the client was closed.
    fn services(&self) -> Result<&ServiceClients> {
        if self.is_closed() {
            return Err(SdkError::Closed);
        }
        Ok(&self.services)
    }

    fn applications(&self) -> Result<ApplicationServiceClient<AuthedChannel>> {
        Ok(self.services()?.applications.clone())
    }

    fn clusters(&self) -> Result<ClusterServiceClient<AuthedChannel>> {
        Ok(self.services()?.clusters.clone())
    }

    fn projects(&self) -> Result<ProjectServiceClient<AuthedChannel>> {
        Ok(self.services()?.projects.clone())
    }

    fn repositories(&self) -> Result<RepositoryServiceClient<AuthedChannel>> {
        Ok(self.services()?.repositories.clone())
    }

    fn session(&self) -> Result<SessionServiceClient<AuthedChannel>> {
        Ok(self.services()?.session.clone())
    }

    /// Wrap a message, advertising the deadline to the server.
    fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(self.timeout);
        request
    }

    /// Await one remote call under the deadline.
    async fn call<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<tonic::Response<T>, Status>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => Ok(response.into_inner()),
            Ok(Err(status)) => Err(status.into()),
            Err(_) => Err(SdkError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SdkError::InvalidInput(format!("{what} is required")));
    }
    Ok(())
}

#[async_trait]
impl ArgoCdApi for ArgoCdClient {
    // =========================================================================
    // Applications
    // =========================================================================

    #[instrument(skip(self))]
    async fn list_applications(&self, options: ListApplicationsOptions) -> Result<ApplicationList> {
        debug!("Listing applications");

        let mut client = self.applications()?;
        let request = self.request(ApplicationQuery {
            projects: options.projects,
            selector: options.selector,
            repo: options.repo,
            app_namespace: options.app_namespace,
            ..Default::default()
        });
        self.call(client.list(request)).await
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn get_application(
        &self,
        name: &str,
        app_namespace: Option<String>,
    ) -> Result<Application> {
        require(name, "application name")?;
        debug!("Getting application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationQuery {
            name: Some(name.to_string()),
            app_namespace,
            ..Default::default()
        });
        self.call(client.get(request)).await
    }

    #[instrument(skip(self, application), fields(name = %application.name()))]
    async fn create_application(
        &self,
        application: Application,
        upsert: bool,
    ) -> Result<Application> {
        require(application.name(), "application name")?;
        debug!(upsert, "Creating application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationCreateRequest {
            application: Some(application),
            upsert: Some(upsert),
            validate: None,
        });
        self.call(client.create(request)).await
    }

    #[instrument(skip(self, application), fields(name = %application.name()))]
    async fn update_application(&self, application: Application) -> Result<Application> {
        require(application.name(), "application name")?;
        debug!("Updating application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationUpdateRequest {
            application: Some(application),
            ..Default::default()
        });
        self.call(client.update(request)).await
    }

    #[instrument(skip(self, options), fields(name = %options.name, cascade = options.cascade))]
    async fn delete_application(&self, options: DeleteApplicationOptions) -> Result<()> {
        require(&options.name, "application name")?;
        debug!("Deleting application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationDeleteRequest {
            name: Some(options.name),
            cascade: Some(options.cascade),
            propagation_policy: options.propagation_policy,
            app_namespace: options.app_namespace,
            project: None,
        });
        self.call(client.delete(request)).await.map(|_| ())
    }

    #[instrument(skip(self, options), fields(name = %options.name, prune = options.prune, dry_run = options.dry_run))]
    async fn sync_application(&self, options: SyncApplicationOptions) -> Result<Application> {
        require(&options.name, "application name")?;
        debug!(revision = ?options.revision, "Syncing application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationSyncRequest {
            name: Some(options.name),
            revision: options.revision,
            dry_run: Some(options.dry_run),
            prune: Some(options.prune),
            resources: options.resources,
            app_namespace: options.app_namespace,
            project: None,
        });
        self.call(client.sync(request)).await
    }

    #[instrument(skip(self, options), fields(name = %options.name, id = options.id))]
    async fn rollback_application(
        &self,
        options: RollbackApplicationOptions,
    ) -> Result<Application> {
        require(&options.name, "application name")?;
        debug!("Rolling back application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationRollbackRequest {
            name: Some(options.name),
            id: Some(options.id),
            dry_run: Some(options.dry_run),
            prune: Some(options.prune),
            app_namespace: options.app_namespace,
            project: None,
        });
        self.call(client.rollback(request)).await
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn get_application_manifests(
        &self,
        name: &str,
        revision: Option<String>,
        app_namespace: Option<String>,
    ) -> Result<ManifestResponse> {
        require(name, "application name")?;
        debug!("Getting application manifests");

        let mut client = self.applications()?;
        let request = self.request(ApplicationManifestQuery {
            name: Some(name.to_string()),
            revision,
            app_namespace,
            project: None,
        });
        self.call(client.get_manifests(request)).await
    }

    #[instrument(skip(self, options), fields(name = %options.name))]
    async fn get_application_events(&self, options: ResourceEventsOptions) -> Result<EventList> {
        require(&options.name, "application name")?;
        debug!("Listing application events");

        let mut client = self.applications()?;
        let request = self.request(ApplicationResourceEventsQuery {
            name: Some(options.name),
            resource_namespace: options.resource_namespace,
            resource_name: options.resource_name,
            resource_uid: options.resource_uid,
            app_namespace: options.app_namespace,
            project: None,
        });
        self.call(client.list_resource_events(request)).await
    }

    #[instrument(skip(self, options), fields(application = %options.application, pod = ?options.pod_name))]
    async fn get_application_logs(&self, options: PodLogsOptions) -> Result<LogResponse> {
        require(&options.application, "application name")?;
        debug!(tail_lines = options.tail_lines, "Streaming application logs");

        let started = tokio::time::Instant::now();
        let mut client = self.applications()?;
        let request = self.request(ApplicationPodLogsQuery {
            name: Some(options.application.clone()),
            namespace: options.namespace.clone(),
            pod_name: options.pod_name.clone(),
            container: options.container.clone(),
            since_seconds: options.since_seconds,
            tail_lines: (options.tail_lines > 0).then_some(options.tail_lines),
            follow: Some(options.follow),
            filter: options.filter.clone(),
            kind: options.kind.clone(),
            group: options.group.clone(),
            resource_name: options.resource_name.clone(),
            previous: Some(options.previous),
            app_namespace: options.app_namespace.clone(),
            project: options.project.clone(),
            match_case: None,
        });
        let mut stream = self.call(client.pod_logs(request)).await?;

        let mut consumer = LogConsumer::new(options.max_entries);
        consumer
            .drain(&mut stream, self.timeout.saturating_sub(started.elapsed()))
            .await;
        let total_lines = consumer.received();
        let logs = consumer.finish()?;

        debug!(lines = total_lines, "Log stream drained");
        Ok(LogResponse {
            application: options.application,
            pod_name: options.pod_name,
            container: options.container,
            total_lines,
            logs,
        })
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn get_resource_tree(
        &self,
        name: &str,
        app_namespace: Option<String>,
    ) -> Result<ApplicationTree> {
        require(name, "application name")?;
        debug!("Getting resource tree");

        let mut client = self.applications()?;
        let request = self.request(ResourcesQuery {
            application_name: Some(name.to_string()),
            app_namespace,
            ..Default::default()
        });
        self.call(client.resource_tree(request)).await
    }

    #[instrument(skip(self), fields(name = %name, kind = kind.as_str()))]
    async fn refresh_application(
        &self,
        name: &str,
        kind: RefreshKind,
        app_namespace: Option<String>,
    ) -> Result<Application> {
        require(name, "application name")?;
        debug!("Refreshing application");

        let mut client = self.applications()?;
        let request = self.request(ApplicationQuery {
            name: Some(name.to_string()),
            refresh: Some(kind.as_str().to_string()),
            app_namespace,
            ..Default::default()
        });
        self.call(client.get(request)).await
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn terminate_operation(&self, name: &str, app_namespace: Option<String>) -> Result<()> {
        require(name, "application name")?;
        debug!("Terminating operation");

        let mut client = self.applications()?;
        let request = self.request(OperationTerminateRequest {
            name: Some(name.to_string()),
            app_namespace,
            project: None,
        });
        self.call(client.terminate_operation(request))
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Clusters
    // =========================================================================

    #[instrument(skip(self))]
    async fn list_clusters(&self) -> Result<ClusterList> {
        debug!("Listing clusters");

        let mut client = self.clusters()?;
        let request = self.request(ClusterQuery::default());
        self.call(client.list(request)).await
    }

    #[instrument(skip(self), fields(server = %server))]
    async fn get_cluster(&self, server: &str) -> Result<Cluster> {
        require(server, "cluster server")?;
        debug!("Getting cluster");

        let mut client = self.clusters()?;
        let request = self.request(ClusterQuery {
            server: server.to_string(),
            ..Default::default()
        });
        self.call(client.get(request)).await
    }

    #[instrument(skip(self, cluster), fields(server = %cluster.server))]
    async fn create_cluster(&self, cluster: Cluster, upsert: bool) -> Result<Cluster> {
        require(&cluster.server, "cluster server")?;
        debug!(upsert, "Creating cluster");

        let mut client = self.clusters()?;
        let request = self.request(ClusterCreateRequest {
            cluster: Some(cluster),
            upsert,
        });
        self.call(client.create(request)).await
    }

    #[instrument(skip(self, cluster), fields(server = %cluster.server, fields = ?updated_fields))]
    async fn update_cluster(&self, cluster: Cluster, updated_fields: Vec<String>) -> Result<Cluster> {
        require(&cluster.server, "cluster server")?;
        debug!("Updating cluster");

        let mut client = self.clusters()?;
        let request = self.request(ClusterUpdateRequest {
            cluster: Some(cluster),
            updated_fields,
            id: None,
        });
        self.call(client.update(request)).await
    }

    #[instrument(skip(self), fields(server = %server))]
    async fn delete_cluster(&self, server: &str) -> Result<()> {
        require(server, "cluster server")?;
        debug!("Deleting cluster");

        let mut client = self.clusters()?;
        let request = self.request(ClusterQuery {
            server: server.to_string(),
            ..Default::default()
        });
        self.call(client.delete(request)).await.map(|_| ())
    }

    // =========================================================================
    // Projects
    // =========================================================================

    #[instrument(skip(self))]
    async fn list_projects(&self) -> Result<AppProjectList> {
        debug!("Listing projects");

        let mut client = self.projects()?;
        let request = self.request(ProjectQuery::default());
        self.call(client.list(request)).await
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn get_project(&self, name: &str) -> Result<AppProject> {
        require(name, "project name")?;
        debug!("Getting project");

        let mut client = self.projects()?;
        let request = self.request(ProjectQuery {
            name: name.to_string(),
        });
        self.call(client.get(request)).await
    }

    #[instrument(skip(self, project), fields(name = %project.name()))]
    async fn create_project(&self, project: AppProject, upsert: bool) -> Result<AppProject> {
        require(project.name(), "project name")?;
        debug!(upsert, "Creating project");

        let mut client = self.projects()?;
        let request = self.request(ProjectCreateRequest {
            project: Some(project),
            upsert,
        });
        self.call(client.create(request)).await
    }

    #[instrument(skip(self, project), fields(name = %project.name()))]
    async fn update_project(&self, project: AppProject) -> Result<AppProject> {
        require(project.name(), "project name")?;
        debug!("Updating project");

        let mut client = self.projects()?;
        let request = self.request(ProjectUpdateRequest {
            project: Some(project),
        });
        self.call(client.update(request)).await
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn delete_project(&self, name: &str) -> Result<()> {
        require(name, "project name")?;
        debug!("Deleting project");

        let mut client = self.projects()?;
        let request = self.request(ProjectQuery {
            name: name.to_string(),
        });
        self.call(client.delete(request)).await.map(|_| ())
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    #[instrument(skip(self))]
    async fn list_repositories(&self) -> Result<RepositoryList> {
        debug!("Listing repositories");

        let mut client = self.repositories()?;
        let request = self.request(RepoQuery::default());
        self.call(client.list(request)).await
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn get_repository(&self, repo: &str) -> Result<Repository> {
        require(repo, "repository URL")?;
        debug!("Getting repository");

        let mut client = self.repositories()?;
        let request = self.request(RepoQuery {
            repo: repo.to_string(),
            ..Default::default()
        });
        self.call(client.get(request)).await
    }

    #[instrument(skip(self, repository), fields(repo = %repository.repo))]
    async fn create_repository(
        &self,
        repository: Repository,
        upsert: bool,
        creds_only: bool,
    ) -> Result<Repository> {
        require(&repository.repo, "repository URL")?;
        debug!(upsert, creds_only, "Creating repository");

        let mut client = self.repositories()?;
        let request = self.request(RepoCreateRequest {
            repo: Some(repository),
            upsert,
            creds_only,
        });
        self.call(client.create_repository(request)).await
    }

    #[instrument(skip(self, repository), fields(repo = %repository.repo))]
    async fn update_repository(&self, repository: Repository) -> Result<Repository> {
        require(&repository.repo, "repository URL")?;
        debug!("Updating repository");

        let mut client = self.repositories()?;
        let request = self.request(RepoUpdateRequest {
            repo: Some(repository),
        });
        self.call(client.update_repository(request)).await
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn delete_repository(&self, repo: &str) -> Result<()> {
        require(repo, "repository URL")?;
        debug!("Deleting repository");

        let mut client = self.repositories()?;
        let request = self.request(RepoQuery {
            repo: repo.to_string(),
            ..Default::default()
        });
        self.call(client.delete_repository(request))
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Session
    // =========================================================================

    #[instrument(skip(self))]
    async fn get_user_info(&self) -> Result<UserInfo> {
        debug!("Getting user info");

        let mut client = self.session()?;
        let request = self.request(GetUserInfoRequest {});
        let info = self.call(client.get_user_info(request)).await?;

        Ok(UserInfo {
            logged_in: info.logged_in,
            username: info.username,
            issuer: info.iss,
            groups: info.groups,
        })
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(server = %self.server_addr, "Argo CD client closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("guestbook", "application name").is_ok());
        let err = require("  ", "application name").unwrap_err();
        assert!(matches!(err, SdkError::InvalidInput(ref m) if m == "application name is required"));
    }

    #[tokio::test]
    async fn test_new_uses_effective_timeout() {
        let client = ArgoCdClient::new(
            ConnectionConfig::new("127.0.0.1:59980", "token").with_plaintext(true),
        )
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert!(!client.plan().is_encrypted());
    }

    #[tokio::test]
    async fn test_invalid_input_checked_before_call() {
        let client = ArgoCdClient::new(
            ConnectionConfig::new("127.0.0.1:59981", "token").with_plaintext(true),
        )
        .unwrap();
        let err = client.get_application("", None).await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidInput(_)));
    }
}
