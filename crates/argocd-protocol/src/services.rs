// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed gRPC clients for the Argo CD API services.
//!
//! Each client wraps a [`tonic::client::Grpc`] over any HTTP service, so the
//! same client type works for native HTTP/2 and the grpc-web tunnel.

use bytes::Bytes;
use http::Uri;
use http::uri::PathAndQuery;
use http_body::Body as HttpBody;
use tonic::client::{Grpc, GrpcService};
use tonic::codec::Streaming;
use tonic::{GrpcMethod, IntoRequest, Request, Response, Status};

use crate::proto::{application, cluster, meta, project, repository, session, v1alpha1};
use crate::transport::BoxError;

/// Fully-qualified RPC method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcMethod {
    pub service: &'static str,
    pub method: &'static str,
    /// `/package.Service/Method`
    pub path: &'static str,
}

macro_rules! rpc_method {
    ($service:literal, $method:literal) => {
        RpcMethod {
            service: $service,
            method: $method,
            path: concat!("/", $service, "/", $method),
        }
    };
}

pub mod methods {
    use super::RpcMethod;

    pub const APPLICATION_LIST: RpcMethod = rpc_method!("application.ApplicationService", "List");
    pub const APPLICATION_GET: RpcMethod = rpc_method!("application.ApplicationService", "Get");
    pub const APPLICATION_CREATE: RpcMethod =
        rpc_method!("application.ApplicationService", "Create");
    pub const APPLICATION_UPDATE: RpcMethod =
        rpc_method!("application.ApplicationService", "Update");
    pub const APPLICATION_DELETE: RpcMethod =
        rpc_method!("application.ApplicationService", "Delete");
    pub const APPLICATION_SYNC: RpcMethod = rpc_method!("application.ApplicationService", "Sync");
    pub const APPLICATION_ROLLBACK: RpcMethod =
        rpc_method!("application.ApplicationService", "Rollback");
    pub const APPLICATION_MANIFESTS: RpcMethod =
        rpc_method!("application.ApplicationService", "GetManifests");
    pub const APPLICATION_EVENTS: RpcMethod =
        rpc_method!("application.ApplicationService", "ListResourceEvents");
    pub const APPLICATION_POD_LOGS: RpcMethod =
        rpc_method!("application.ApplicationService", "PodLogs");
    pub const APPLICATION_RESOURCE_TREE: RpcMethod =
        rpc_method!("application.ApplicationService", "ResourceTree");
    pub const APPLICATION_TERMINATE_OPERATION: RpcMethod =
        rpc_method!("application.ApplicationService", "TerminateOperation");

    pub const CLUSTER_LIST: RpcMethod = rpc_method!("cluster.ClusterService", "List");
    pub const CLUSTER_GET: RpcMethod = rpc_method!("cluster.ClusterService", "Get");
    pub const CLUSTER_CREATE: RpcMethod = rpc_method!("cluster.ClusterService", "Create");
    pub const CLUSTER_UPDATE: RpcMethod = rpc_method!("cluster.ClusterService", "Update");
    pub const CLUSTER_DELETE: RpcMethod = rpc_method!("cluster.ClusterService", "Delete");

    pub const PROJECT_LIST: RpcMethod = rpc_method!("project.ProjectService", "List");
    pub const PROJECT_GET: RpcMethod = rpc_method!("project.ProjectService", "Get");
    pub const PROJECT_CREATE: RpcMethod = rpc_method!("project.ProjectService", "Create");
    pub const PROJECT_UPDATE: RpcMethod = rpc_method!("project.ProjectService", "Update");
    pub const PROJECT_DELETE: RpcMethod = rpc_method!("project.ProjectService", "Delete");

    pub const REPOSITORY_LIST: RpcMethod = rpc_method!("repository.RepositoryService", "List");
    pub const REPOSITORY_GET: RpcMethod = rpc_method!("repository.RepositoryService", "Get");
    pub const REPOSITORY_CREATE: RpcMethod =
        rpc_method!("repository.RepositoryService", "CreateRepository");
    pub const REPOSITORY_UPDATE: RpcMethod =
        rpc_method!("repository.RepositoryService", "UpdateRepository");
    pub const REPOSITORY_DELETE: RpcMethod =
        rpc_method!("repository.RepositoryService", "DeleteRepository");

    pub const SESSION_GET_USER_INFO: RpcMethod =
        rpc_method!("session.SessionService", "GetUserInfo");
}

fn prepare<M>(rpc: RpcMethod, request: impl IntoRequest<M>) -> (Request<M>, PathAndQuery) {
    let mut request = request.into_request();
    request
        .extensions_mut()
        .insert(GrpcMethod::new(rpc.service, rpc.method));
    (request, PathAndQuery::from_static(rpc.path))
}

async fn unary<T, Req, Resp>(
    grpc: &mut Grpc<T>,
    rpc: RpcMethod,
    request: impl IntoRequest<Req>,
) -> Result<Response<Resp>, Status>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    grpc.ready().await.map_err(|e| {
        let e: BoxError = e.into();
        Status::unknown(format!("Service was not ready: {e}"))
    })?;
    let (request, path) = prepare(rpc, request);
    grpc.unary(request, path, tonic_prost::ProstCodec::default())
        .await
}

async fn server_streaming<T, Req, Resp>(
    grpc: &mut Grpc<T>,
    rpc: RpcMethod,
    request: impl IntoRequest<Req>,
) -> Result<Response<Streaming<Resp>>, Status>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    grpc.ready().await.map_err(|e| {
        let e: BoxError = e.into();
        Status::unknown(format!("Service was not ready: {e}"))
    })?;
    let (request, path) = prepare(rpc, request);
    grpc.server_streaming(request, path, tonic_prost::ProstCodec::default())
        .await
}

macro_rules! service_client {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<T> {
            inner: Grpc<T>,
        }

        impl<T> $name<T> {
            pub fn new(inner: T) -> Self {
                Self {
                    inner: Grpc::new(inner),
                }
            }

            /// Send requests to `origin` (`scheme://authority`) instead of
            /// leaving the URI relative.
            pub fn with_origin(inner: T, origin: Uri) -> Self {
                Self {
                    inner: Grpc::with_origin(inner, origin),
                }
            }
        }
    };
}

service_client!(
    /// Client for `application.ApplicationService`.
    ApplicationServiceClient
);
service_client!(
    /// Client for `cluster.ClusterService`.
    ClusterServiceClient
);
service_client!(
    /// Client for `project.ProjectService`.
    ProjectServiceClient
);
service_client!(
    /// Client for `repository.RepositoryService`.
    RepositoryServiceClient
);
service_client!(
    /// Client for `session.SessionService`.
    SessionServiceClient
);

impl<T> ApplicationServiceClient<T>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub async fn list(
        &mut self,
        request: impl IntoRequest<application::ApplicationQuery>,
    ) -> Result<Response<v1alpha1::ApplicationList>, Status> {
        unary(&mut self.inner, methods::APPLICATION_LIST, request).await
    }

    pub async fn get(
        &mut self,
        request: impl IntoRequest<application::ApplicationQuery>,
    ) -> Result<Response<v1alpha1::Application>, Status> {
        unary(&mut self.inner, methods::APPLICATION_GET, request).await
    }

    pub async fn create(
        &mut self,
        request: impl IntoRequest<application::ApplicationCreateRequest>,
    ) -> Result<Response<v1alpha1::Application>, Status> {
        unary(&mut self.inner, methods::APPLICATION_CREATE, request).await
    }

    pub async fn update(
        &mut self,
        request: impl IntoRequest<application::ApplicationUpdateRequest>,
    ) -> Result<Response<v1alpha1::Application>, Status> {
        unary(&mut self.inner, methods::APPLICATION_UPDATE, request).await
    }

    pub async fn delete(
        &mut self,
        request: impl IntoRequest<application::ApplicationDeleteRequest>,
    ) -> Result<Response<application::ApplicationResponse>, Status> {
        unary(&mut self.inner, methods::APPLICATION_DELETE, request).await
    }

    pub async fn sync(
        &mut self,
        request: impl IntoRequest<application::ApplicationSyncRequest>,
    ) -> Result<Response<v1alpha1::Application>, Status> {
        unary(&mut self.inner, methods::APPLICATION_SYNC, request).await
    }

    pub async fn rollback(
        &mut self,
        request: impl IntoRequest<application::ApplicationRollbackRequest>,
    ) -> Result<Response<v1alpha1::Application>, Status> {
        unary(&mut self.inner, methods::APPLICATION_ROLLBACK, request).await
    }

    pub async fn get_manifests(
        &mut self,
        request: impl IntoRequest<application::ApplicationManifestQuery>,
    ) -> Result<Response<application::ManifestResponse>, Status> {
        unary(&mut self.inner, methods::APPLICATION_MANIFESTS, request).await
    }

    pub async fn list_resource_events(
        &mut self,
        request: impl IntoRequest<application::ApplicationResourceEventsQuery>,
    ) -> Result<Response<meta::EventList>, Status> {
        unary(&mut self.inner, methods::APPLICATION_EVENTS, request).await
    }

    /// Server-streaming log tail. The stream ends with an entry whose
    /// `last` flag is set, or when the server closes it.
    pub async fn pod_logs(
        &mut self,
        request: impl IntoRequest<application::ApplicationPodLogsQuery>,
    ) -> Result<Response<Streaming<application::LogEntry>>, Status> {
        server_streaming(&mut self.inner, methods::APPLICATION_POD_LOGS, request).await
    }

    pub async fn resource_tree(
        &mut self,
        request: impl IntoRequest<application::ResourcesQuery>,
    ) -> Result<Response<v1alpha1::ApplicationTree>, Status> {
        unary(&mut self.inner, methods::APPLICATION_RESOURCE_TREE, request).await
    }

    pub async fn terminate_operation(
        &mut self,
        request: impl IntoRequest<application::OperationTerminateRequest>,
    ) -> Result<Response<application::OperationTerminateResponse>, Status> {
        unary(
            &mut self.inner,
            methods::APPLICATION_TERMINATE_OPERATION,
            request,
        )
        .await
    }
}

impl<T> ClusterServiceClient<T>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub async fn list(
        &mut self,
        request: impl IntoRequest<cluster::ClusterQuery>,
    ) -> Result<Response<v1alpha1::ClusterList>, Status> {
        unary(&mut self.inner, methods::CLUSTER_LIST, request).await
    }

    pub async fn get(
        &mut self,
        request: impl IntoRequest<cluster::ClusterQuery>,
    ) -> Result<Response<v1alpha1::Cluster>, Status> {
        unary(&mut self.inner, methods::CLUSTER_GET, request).await
    }

    pub async fn create(
        &mut self,
        request: impl IntoRequest<cluster::ClusterCreateRequest>,
    ) -> Result<Response<v1alpha1::Cluster>, Status> {
        unary(&mut self.inner, methods::CLUSTER_CREATE, request).await
    }

    pub async fn update(
        &mut self,
        request: impl IntoRequest<cluster::ClusterUpdateRequest>,
    ) -> Result<Response<v1alpha1::Cluster>, Status> {
        unary(&mut self.inner, methods::CLUSTER_UPDATE, request).await
    }

    pub async fn delete(
        &mut self,
        request: impl IntoRequest<cluster::ClusterQuery>,
    ) -> Result<Response<cluster::ClusterResponse>, Status> {
        unary(&mut self.inner, methods::CLUSTER_DELETE, request).await
    }
}

impl<T> ProjectServiceClient<T>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub async fn list(
        &mut self,
        request: impl IntoRequest<project::ProjectQuery>,
    ) -> Result<Response<v1alpha1::AppProjectList>, Status> {
        unary(&mut self.inner, methods::PROJECT_LIST, request).await
    }

    pub async fn get(
        &mut self,
        request: impl IntoRequest<project::ProjectQuery>,
    ) -> Result<Response<v1alpha1::AppProject>, Status> {
        unary(&mut self.inner, methods::PROJECT_GET, request).await
    }

    pub async fn create(
        &mut self,
        request: impl IntoRequest<project::ProjectCreateRequest>,
    ) -> Result<Response<v1alpha1::AppProject>, Status> {
        unary(&mut self.inner, methods::PROJECT_CREATE, request).await
    }

    pub async fn update(
        &mut self,
        request: impl IntoRequest<project::ProjectUpdateRequest>,
    ) -> Result<Response<v1alpha1::AppProject>, Status> {
        unary(&mut self.inner, methods::PROJECT_UPDATE, request).await
    }

    pub async fn delete(
        &mut self,
        request: impl IntoRequest<project::ProjectQuery>,
    ) -> Result<Response<project::EmptyResponse>, Status> {
        unary(&mut self.inner, methods::PROJECT_DELETE, request).await
    }
}

impl<T> RepositoryServiceClient<T>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub async fn list(
        &mut self,
        request: impl IntoRequest<repository::RepoQuery>,
    ) -> Result<Response<v1alpha1::RepositoryList>, Status> {
        unary(&mut self.inner, methods::REPOSITORY_LIST, request).await
    }

    pub async fn get(
        &mut self,
        request: impl IntoRequest<repository::RepoQuery>,
    ) -> Result<Response<v1alpha1::Repository>, Status> {
        unary(&mut self.inner, methods::REPOSITORY_GET, request).await
    }

    pub async fn create_repository(
        &mut self,
        request: impl IntoRequest<repository::RepoCreateRequest>,
    ) -> Result<Response<v1alpha1::Repository>, Status> {
        unary(&mut self.inner, methods::REPOSITORY_CREATE, request).await
    }

    pub async fn update_repository(
        &mut self,
        request: impl IntoRequest<repository::RepoUpdateRequest>,
    ) -> Result<Response<v1alpha1::Repository>, Status> {
        unary(&mut self.inner, methods::REPOSITORY_UPDATE, request).await
    }

    pub async fn delete_repository(
        &mut self,
        request: impl IntoRequest<repository::RepoQuery>,
    ) -> Result<Response<repository::RepoResponse>, Status> {
        unary(&mut self.inner, methods::REPOSITORY_DELETE, request).await
    }
}

impl<T> SessionServiceClient<T>
where
    T: GrpcService<tonic::body::Body>,
    T::Error: Into<BoxError>,
    T::ResponseBody: HttpBody<Data = Bytes> + Send + 'static,
    <T::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub async fn get_user_info(
        &mut self,
        request: impl IntoRequest<session::GetUserInfoRequest>,
    ) -> Result<Response<session::GetUserInfoResponse>, Status> {
        unary(&mut self.inner, methods::SESSION_GET_USER_INFO, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::methods::*;

    #[test]
    fn test_method_paths() {
        assert_eq!(APPLICATION_LIST.path, "/application.ApplicationService/List");
        assert_eq!(
            APPLICATION_POD_LOGS.path,
            "/application.ApplicationService/PodLogs"
        );
        assert_eq!(
            REPOSITORY_CREATE.path,
            "/repository.RepositoryService/CreateRepository"
        );
        assert_eq!(
            SESSION_GET_USER_INFO.path,
            "/session.SessionService/GetUserInfo"
        );
        assert_eq!(CLUSTER_DELETE.service, "cluster.ClusterService");
        assert_eq!(PROJECT_UPDATE.method, "Update");
    }
}
