// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Client lifecycle tests for argocd-management-sdk.
//!
//! These never reach a real server: construction is lazy, and calls against
//! an unused loopback port fail fast.

use std::time::Duration;

use argocd_management_sdk::{
    ArgoCdApi, ArgoCdClient, ConfigError, ConnectionConfig, PodLogsOptions, SdkError,
    TransportMode,
};

fn plaintext_config() -> ConnectionConfig {
    ConnectionConfig::new("127.0.0.1:1", "token").with_plaintext(true)
}

#[tokio::test]
async fn test_new_rejects_missing_address() {
    let err = ArgoCdClient::new(ConnectionConfig::new("", "token"))
        .err()
        .expect("config error");
    assert!(matches!(
        err,
        SdkError::Config(ConfigError::ServerAddressRequired)
    ));
}

#[tokio::test]
async fn test_new_rejects_missing_token() {
    let err = ArgoCdClient::new(ConnectionConfig::new("argocd.example.com:443", ""))
        .err()
        .expect("config error");
    assert!(matches!(err, SdkError::Config(ConfigError::AuthTokenRequired)));
}

#[tokio::test]
async fn test_new_rejects_malformed_address() {
    let err = ArgoCdClient::new(ConnectionConfig::new("argo cd/example", "token"))
        .err()
        .expect("config error");
    assert!(err.is_config_error());
}

#[tokio::test]
async fn test_default_timeout_applied() {
    let client = ArgoCdClient::new(plaintext_config()).unwrap();
    assert_eq!(client.timeout(), Duration::from_secs(30));
    assert_eq!(client.server_addr(), "127.0.0.1:1");
}

#[tokio::test]
async fn test_explicit_timeout_applied() {
    let client =
        ArgoCdClient::new(plaintext_config().with_timeout(Duration::from_secs(60))).unwrap();
    assert_eq!(client.timeout(), Duration::from_secs(60));
}

#[tokio::test]
async fn test_transport_selection() {
    let client = ArgoCdClient::new(plaintext_config()).unwrap();
    assert_eq!(client.plan().mode, TransportMode::Plaintext);

    let client = ArgoCdClient::new(
        ConnectionConfig::new("argocd.example.com:443", "token").with_grpc_web(None),
    )
    .unwrap();
    assert!(matches!(client.plan().mode, TransportMode::WebTunnel { .. }));
    assert!(client.plan().verifies_server());

    let client =
        ArgoCdClient::new(ConnectionConfig::new("argocd.example.com:443", "token").with_insecure(true))
            .unwrap();
    assert_eq!(client.plan().mode, TransportMode::Tls);
    assert!(!client.plan().verifies_server());
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let client = ArgoCdClient::new(plaintext_config()).unwrap();
    assert!(!client.is_closed());

    client.close().await;
    client.close().await;
    assert!(client.is_closed());
}

#[tokio::test]
async fn test_calls_after_close_fail() {
    let client = ArgoCdClient::new(plaintext_config()).unwrap();
    client.close().await;

    assert!(matches!(
        client.get_application("guestbook", None).await,
        Err(SdkError::Closed)
    ));
    assert!(matches!(client.list_clusters().await, Err(SdkError::Closed)));
    assert!(matches!(
        client
            .get_application_logs(PodLogsOptions::new("guestbook"))
            .await,
        Err(SdkError::Closed)
    ));
}

#[tokio::test]
async fn test_invalid_input_rejected_locally() {
    let client = ArgoCdClient::new(plaintext_config()).unwrap();
    assert!(matches!(
        client.delete_project("").await,
        Err(SdkError::InvalidInput(_))
    ));
    assert!(matches!(
        client.get_repository(" ").await,
        Err(SdkError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_remote_error() {
    let client = ArgoCdClient::new(plaintext_config().with_timeout(Duration::from_secs(5))).unwrap();
    let err = client.get_user_info().await.unwrap_err();
    assert!(!err.is_config_error());
    assert!(err.status_code().is_some());
}

#[tokio::test]
async fn test_scoped_closes_client() {
    let result = ArgoCdClient::scoped(plaintext_config(), async |client| {
        assert!(!client.is_closed());
        Ok(client.timeout())
    })
    .await
    .unwrap();
    assert_eq!(result, Duration::from_secs(30));
}

#[tokio::test]
async fn test_scoped_propagates_error() {
    let err = ArgoCdClient::scoped(plaintext_config(), async |_client| {
        Err::<(), _>(SdkError::InvalidInput("bad".to_string()))
    })
    .await
    .unwrap_err();
    assert!(matches!(err, SdkError::InvalidInput(_)));
}

#[tokio::test]
async fn test_scoped_rejects_invalid_config() {
    let err = ArgoCdClient::scoped(ConnectionConfig::default(), async |_client| Ok(()))
        .await
        .unwrap_err();
    assert!(err.is_config_error());
}
