// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request/response messages of `cluster.ClusterService`.

use serde::{Deserialize, Serialize};

use super::v1alpha1::Cluster;

/// Selects a cluster by server URL, by name, or by an explicit id.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterQuery {
    #[prost(string, tag = "1")]
    pub server: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, optional, tag = "3")]
    pub id: Option<ClusterId>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterId {
    /// `url` or `name`.
    #[prost(string, tag = "1")]
    #[serde(rename = "type")]
    pub r#type: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterCreateRequest {
    #[prost(message, optional, tag = "1")]
    pub cluster: Option<Cluster>,
    #[prost(bool, tag = "2")]
    pub upsert: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterUpdateRequest {
    #[prost(message, optional, tag = "1")]
    pub cluster: Option<Cluster>,
    /// Field mask; empty means the whole object is replaced.
    #[prost(string, repeated, tag = "2")]
    pub updated_fields: Vec<String>,
    #[prost(message, optional, tag = "3")]
    pub id: Option<ClusterId>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterResponse {}
