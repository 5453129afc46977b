// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Connection configuration for the management SDK.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use argocd_protocol::TransportOptions;
use argocd_protocol::tls::{load_certificates, load_client_identity};
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::error::ConfigError;

/// Per-call deadline used when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to reach one Argo CD API server.
///
/// A config describes a single logical request's connection; it is built,
/// validated, used once and dropped.
#[derive(Clone, Default)]
pub struct ConnectionConfig {
    /// `host:port` of the API server.
    pub server_addr: String,
    /// Opaque bearer token.
    pub auth_token: String,
    /// Skip server certificate verification.
    pub insecure: bool,
    /// Disable TLS entirely.
    pub plaintext: bool,
    /// Tunnel gRPC through grpc-web over HTTP/1.1.
    pub grpc_web: bool,
    /// Path prefix when the API server sits behind a reverse proxy.
    pub grpc_web_root_path: Option<String>,
    /// Client certificate for mutual TLS. Must be set together with the key.
    pub client_cert_file: Option<PathBuf>,
    pub client_cert_key_file: Option<PathBuf>,
    /// Extra CA certificate(s) trusted for the server.
    pub server_cert_file: Option<PathBuf>,
    /// Extra headers, each `Name: value`.
    pub headers: Vec<String>,
    pub user_agent: Option<String>,
    /// Per-call deadline. `None` or zero falls back to [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
    /// Fail instead of falling back to no client certificate.
    pub strict_client_cert: bool,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("server_addr", &self.server_addr)
            .field("auth_token", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("plaintext", &self.plaintext)
            .field("grpc_web", &self.grpc_web)
            .field("grpc_web_root_path", &self.grpc_web_root_path)
            .field("client_cert_file", &self.client_cert_file)
            .field("client_cert_key_file", &self.client_cert_key_file)
            .field("server_cert_file", &self.server_cert_file)
            .field("headers", &self.headers)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("strict_client_cert", &self.strict_client_cert)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a configuration with the two required fields.
    pub fn new(server_addr: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            auth_token: auth_token.into(),
            ..Default::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARGOCD_SERVER`: API server address (required)
    /// - `ARGOCD_AUTH_TOKEN`: Bearer token (required)
    /// - `ARGOCD_INSECURE`: Skip TLS verification (default: "false")
    /// - `ARGOCD_PLAINTEXT`: Disable TLS (default: "false")
    /// - `ARGOCD_GRPC_WEB`: Use the grpc-web tunnel (default: "false")
    /// - `ARGOCD_GRPC_WEB_ROOT_PATH`: Root path of the API behind a proxy
    /// - `ARGOCD_CLIENT_CERT` / `ARGOCD_CLIENT_CERT_KEY`: Client certificate and key
    /// - `ARGOCD_SERVER_CRT`: Extra CA certificate for the server
    /// - `ARGOCD_HEADERS`: Comma-separated `Name: value` pairs
    /// - `ARGOCD_USER_AGENT`: User agent override
    /// - `ARGOCD_TIMEOUT_SECS`: Per-call deadline in seconds (default: 30)
    /// - `ARGOCD_STRICT_CLIENT_CERT`: Fail on unusable client certificates (default: "false")
    ///
    /// Required values are not checked here; see [`ConnectionConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConnectionConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let timeout = match lookup("ARGOCD_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidEnv {
                    name: "ARGOCD_TIMEOUT_SECS".to_string(),
                    reason: format!("{e}"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let headers = lookup("ARGOCD_HEADERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server_addr: lookup("ARGOCD_SERVER").unwrap_or_default(),
            auth_token: lookup("ARGOCD_AUTH_TOKEN").unwrap_or_default(),
            insecure: flag("ARGOCD_INSECURE"),
            plaintext: flag("ARGOCD_PLAINTEXT"),
            grpc_web: flag("ARGOCD_GRPC_WEB"),
            grpc_web_root_path: lookup("ARGOCD_GRPC_WEB_ROOT_PATH").filter(|v| !v.is_empty()),
            client_cert_file: path("ARGOCD_CLIENT_CERT"),
            client_cert_key_file: path("ARGOCD_CLIENT_CERT_KEY"),
            server_cert_file: path("ARGOCD_SERVER_CRT"),
            headers,
            user_agent: lookup("ARGOCD_USER_AGENT").filter(|v| !v.is_empty()),
            timeout,
            strict_client_cert: flag("ARGOCD_STRICT_CLIENT_CERT"),
        })
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_plaintext(mut self, plaintext: bool) -> Self {
        self.plaintext = plaintext;
        self
    }

    /// Enable the grpc-web tunnel, optionally under a root path.
    pub fn with_grpc_web(mut self, root_path: Option<String>) -> Self {
        self.grpc_web = true;
        self.grpc_web_root_path = root_path;
        self
    }

    /// Set the client certificate and key for mutual TLS.
    pub fn with_client_cert(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.client_cert_file = Some(cert.into());
        self.client_cert_key_file = Some(key.into());
        self
    }

    /// Trust an extra CA certificate for the server.
    pub fn with_server_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.server_cert_file = Some(path.into());
        self
    }

    /// Add an extra header (`Name: value`).
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_strict_client_cert(mut self, strict: bool) -> Self {
        self.strict_client_cert = strict;
        self
    }

    /// Check the required fields. The address is checked first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_addr.trim().is_empty() {
            return Err(ConfigError::ServerAddressRequired);
        }
        if self.auth_token.is_empty() {
            return Err(ConfigError::AuthTokenRequired);
        }
        Ok(())
    }

    /// Configured timeout, or [`DEFAULT_TIMEOUT`] when unset or zero.
    pub fn effective_timeout(&self) -> Duration {
        match self.timeout {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => DEFAULT_TIMEOUT,
        }
    }

    /// Validate and derive the transport options.
    ///
    /// Reads the certificate files when configured; has no other side effects.
    pub fn transport_options(&self) -> Result<TransportOptions, ConfigError> {
        self.validate()?;

        let ca_certificates = match &self.server_cert_file {
            Some(path) => load_certificates(path)
                .map_err(|e| ConfigError::CaCertificate(e.to_string()))?,
            None => Vec::new(),
        };

        Ok(TransportOptions {
            address: self.server_addr.trim().to_string(),
            plaintext: self.plaintext,
            insecure: self.insecure,
            grpc_web: self.grpc_web,
            grpc_web_root_path: self.grpc_web_root_path.clone(),
            client_identity: self.client_identity()?,
            ca_certificates,
            headers: parse_headers(&self.headers)?,
            user_agent: Some(self.user_agent.clone().unwrap_or_else(default_user_agent)),
            timeout: Some(self.effective_timeout()),
        })
    }

    /// Load the client certificate pair. Without strict mode, a lone file or
    /// an unloadable pair means "no client certificate".
    fn client_identity(&self) -> Result<Option<argocd_protocol::ClientIdentity>, ConfigError> {
        let (cert, key) = match (&self.client_cert_file, &self.client_cert_key_file) {
            (None, None) => return Ok(None),
            (Some(cert), Some(key)) => (cert, key),
            _ => {
                let reason = "client certificate and key must be set together";
                if self.strict_client_cert {
                    return Err(ConfigError::ClientCertificate(reason.to_string()));
                }
                warn!(reason, "continuing without client certificate");
                return Ok(None);
            }
        };

        match load_client_identity(cert, key) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) if self.strict_client_cert => Err(ConfigError::ClientCertificate(e.to_string())),
            Err(e) => {
                warn!(error = %e, "continuing without client certificate");
                Ok(None)
            }
        }
    }
}

fn default_user_agent() -> String {
    format!("argocd-management-sdk/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_headers(headers: &[String]) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for raw in headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidHeader(raw.clone()))?;
        let name = HeaderName::try_from(name.trim())
            .map_err(|_| ConfigError::InvalidHeader(raw.clone()))?;
        let value = HeaderValue::try_from(value.trim())
            .map_err(|_| ConfigError::InvalidHeader(raw.clone()))?;
        map.append(name, value);
    }
    Ok(map)
}
