// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Argo CD Protocol - gRPC / grpc-web + Protobuf communication layer
//!
//! This crate provides the wire layer for talking to an Argo CD API server:
//! - Protobuf messages for the application, cluster, project, repository
//!   and session services
//! - Typed service clients over a shared channel
//! - Transport selection (plaintext, TLS, mutual TLS, grpc-web tunnel)
//! - Per-call credentials
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    argocd-protocol                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Service clients: unary + server streaming (tonic)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Credentials: per-call metadata interceptor                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Serialization: Protobuf (prost)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Transport: HTTP/2 (h2c or rustls) | grpc-web over HTTP/1.1 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use argocd_protocol::{BearerToken, TransportBuilder, TransportOptions};
//! use argocd_protocol::proto::session::GetUserInfoRequest;
//! use argocd_protocol::services::SessionServiceClient;
//!
//! let options = TransportOptions {
//!     address: "argocd.example.com:443".to_string(),
//!     ..Default::default()
//! };
//! let connection = TransportBuilder::new(options, BearerToken::new(token)).build()?;
//!
//! let mut session =
//!     SessionServiceClient::with_origin(connection.channel(), connection.origin().clone());
//! let info = session.get_user_info(GetUserInfoRequest {}).await?.into_inner();
//! ```

pub mod connector;
pub mod credentials;
pub mod proto;
pub mod services;
pub mod tls;
pub mod transport;

// Re-export main types
pub use credentials::{AuthInterceptor, BearerToken, CallCredentials};
pub use services::{
    ApplicationServiceClient, ClusterServiceClient, ProjectServiceClient, RepositoryServiceClient,
    RpcMethod, SessionServiceClient,
};
pub use tls::{ClientIdentity, TlsError};
pub use transport::{
    AuthedChannel, BoxError, Connection, Transport, TransportBuilder, TransportError,
    TransportFailure, TransportMode, TransportOptions, TransportPlan,
};

// Re-export tonic types that appear in public signatures
pub use tonic::{Code, Status, Streaming};
