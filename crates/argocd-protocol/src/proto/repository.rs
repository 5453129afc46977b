// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request/response messages of `repository.RepositoryService`.

use serde::{Deserialize, Serialize};

use super::v1alpha1::Repository;

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepoQuery {
    #[prost(string, tag = "1")]
    pub repo: String,
    #[prost(bool, tag = "2")]
    pub force_refresh: bool,
    #[prost(string, tag = "3")]
    pub app_project: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepoCreateRequest {
    #[prost(message, optional, tag = "1")]
    pub repo: Option<Repository>,
    #[prost(bool, tag = "2")]
    pub upsert: bool,
    #[prost(bool, tag = "3")]
    pub creds_only: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoUpdateRequest {
    #[prost(message, optional, tag = "1")]
    pub repo: Option<Repository>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoResponse {}
