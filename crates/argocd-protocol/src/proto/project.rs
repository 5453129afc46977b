// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request/response messages of `project.ProjectService`.

use serde::{Deserialize, Serialize};

use super::v1alpha1::AppProject;

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectQuery {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectCreateRequest {
    #[prost(message, optional, tag = "1")]
    pub project: Option<AppProject>,
    #[prost(bool, tag = "2")]
    pub upsert: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectUpdateRequest {
    #[prost(message, optional, tag = "1")]
    pub project: Option<AppProject>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyResponse {}
