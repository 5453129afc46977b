// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Protobuf messages for the Argo CD management API.
//!
//! These are maintained by hand instead of being generated at build time so the
//! workspace builds without `protoc`. Field tags follow the upstream `.proto`
//! definitions; only the fields the management client reads or writes are
//! declared; unknown fields are skipped by prost on decode.
//!
//! Every message also derives serde so results can be rendered as JSON
//! without a second set of mirror types.

pub mod application;
pub mod cluster;
pub mod meta;
pub mod project;
pub mod repository;
pub mod session;
pub mod v1alpha1;
