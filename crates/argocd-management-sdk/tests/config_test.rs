// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Connection configuration tests for argocd-management-sdk.

use std::io::Write;
use std::time::Duration;

use argocd_management_sdk::{ConfigError, ConnectionConfig, DEFAULT_TIMEOUT};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn self_signed() -> (String, String) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    (certified.cert.pem(), certified.key_pair.serialize_pem())
}

#[test]
fn test_missing_address_reported_first() {
    let err = ConnectionConfig::new("", "").validate().unwrap_err();
    assert!(matches!(err, ConfigError::ServerAddressRequired));
}

#[test]
fn test_blank_address_rejected() {
    let err = ConnectionConfig::new("   ", "token").validate().unwrap_err();
    assert!(matches!(err, ConfigError::ServerAddressRequired));
}

#[test]
fn test_missing_token_rejected() {
    let err = ConnectionConfig::new("argocd.example.com:443", "")
        .validate()
        .unwrap_err();
    assert!(matches!(err, ConfigError::AuthTokenRequired));
}

#[test]
fn test_valid_config() {
    assert!(
        ConnectionConfig::new("argocd.example.com:443", "token")
            .validate()
            .is_ok()
    );
}

#[test]
fn test_default_timeout() {
    let config = ConnectionConfig::new("argocd.example.com:443", "token");
    assert_eq!(config.effective_timeout(), Duration::from_secs(30));
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));

    let options = config.transport_options().unwrap();
    assert_eq!(options.timeout, Some(Duration::from_secs(30)));
}

#[test]
fn test_explicit_timeout() {
    let config = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_timeout(Duration::from_secs(60));
    assert_eq!(config.effective_timeout(), Duration::from_secs(60));
}

#[test]
fn test_transport_options_carry_settings() {
    let options = ConnectionConfig::new(" argocd.example.com:443 ", "token")
        .with_insecure(true)
        .with_grpc_web(Some("argocd".to_string()))
        .with_header("X-Tenant: blue")
        .transport_options()
        .unwrap();

    assert_eq!(options.address, "argocd.example.com:443");
    assert!(options.insecure);
    assert!(options.grpc_web);
    assert_eq!(options.grpc_web_root_path.as_deref(), Some("argocd"));
    assert_eq!(options.headers["x-tenant"], "blue");
    assert!(options.client_identity.is_none());
    assert!(options.ca_certificates.is_empty());
}

#[test]
fn test_default_user_agent() {
    let options = ConnectionConfig::new("argocd.example.com:443", "token")
        .transport_options()
        .unwrap();
    let user_agent = options.user_agent.unwrap();
    assert!(user_agent.starts_with("argocd-management-sdk/"));
}

#[test]
fn test_custom_user_agent() {
    let options = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_user_agent("ops-bot/2.1")
        .transport_options()
        .unwrap();
    assert_eq!(options.user_agent.as_deref(), Some("ops-bot/2.1"));
}

#[test]
fn test_invalid_header_rejected() {
    let err = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_header("no separator")
        .transport_options()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeader(ref h) if h == "no separator"));
}

#[test]
fn test_client_certificate_loaded() {
    let (cert, key) = self_signed();
    let cert_file = write_temp(&cert);
    let key_file = write_temp(&key);

    let options = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_client_cert(cert_file.path(), key_file.path())
        .transport_options()
        .unwrap();

    let identity = options.client_identity.expect("client identity");
    assert_eq!(identity.cert_chain().len(), 1);
}

#[test]
fn test_unreadable_client_certificate_is_skipped() {
    let options = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_client_cert("/nonexistent/client.crt", "/nonexistent/client.key")
        .transport_options()
        .unwrap();
    assert!(options.client_identity.is_none());
}

#[test]
fn test_unreadable_client_certificate_strict() {
    let err = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_client_cert("/nonexistent/client.crt", "/nonexistent/client.key")
        .with_strict_client_cert(true)
        .transport_options()
        .unwrap_err();
    assert!(matches!(err, ConfigError::ClientCertificate(_)));
}

#[test]
fn test_lone_client_certificate_is_skipped() {
    let (cert, _) = self_signed();
    let cert_file = write_temp(&cert);

    let mut config = ConnectionConfig::new("argocd.example.com:443", "token");
    config.client_cert_file = Some(cert_file.path().to_path_buf());

    let options = config.clone().transport_options().unwrap();
    assert!(options.client_identity.is_none());

    let err = config
        .with_strict_client_cert(true)
        .transport_options()
        .unwrap_err();
    assert!(matches!(err, ConfigError::ClientCertificate(_)));
}

#[test]
fn test_server_ca_loaded() {
    let (cert, _) = self_signed();
    let ca_file = write_temp(&cert);

    let options = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_server_cert(ca_file.path())
        .transport_options()
        .unwrap();
    assert_eq!(options.ca_certificates.len(), 1);
}

#[test]
fn test_unreadable_server_ca_fails() {
    let err = ConnectionConfig::new("argocd.example.com:443", "token")
        .with_server_cert("/nonexistent/ca.crt")
        .transport_options()
        .unwrap_err();
    assert!(matches!(err, ConfigError::CaCertificate(_)));
}

#[test]
fn test_validation_runs_before_file_access() {
    let err = ConnectionConfig::new("", "token")
        .with_server_cert("/nonexistent/ca.crt")
        .transport_options()
        .unwrap_err();
    assert!(matches!(err, ConfigError::ServerAddressRequired));
}
