// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for argocd-management-sdk.

use argocd_protocol::{Code, Status, TransportError};
use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Invalid or unusable connection configuration. Raised before any network
/// activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("server address is required")]
    ServerAddressRequired,

    #[error("auth token is required")]
    AuthTokenRequired,

    #[error("invalid header '{0}', expected 'Name: value'")]
    InvalidHeader(String),

    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    #[error("client certificate: {0}")]
    ClientCertificate(String),

    #[error("server CA certificate: {0}")]
    CaCertificate(String),

    #[error("invalid environment variable {name}: {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}

/// Errors that can occur when using the management SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request exceeded its deadline.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The server rejected the credentials.
    #[error("unauthenticated [{code:?}]: {message}")]
    Unauthenticated { code: Code, message: String },

    /// The requested object does not exist.
    #[error("not found [{code:?}]: {message}")]
    NotFound { code: Code, message: String },

    /// Server returned any other error status.
    #[error("server error [{code:?}]: {message}")]
    Server { code: Code, message: String },

    /// Unexpected response from server.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The client was closed.
    #[error("client is closed")]
    Closed,
}

impl SdkError {
    /// Whether the error was raised by configuration checks, before any I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(self, SdkError::Config(_))
    }

    /// gRPC status code carried by remote errors.
    pub fn status_code(&self) -> Option<Code> {
        match self {
            SdkError::Unauthenticated { code, .. }
            | SdkError::NotFound { code, .. }
            | SdkError::Server { code, .. } => Some(*code),
            SdkError::Timeout(_) => Some(Code::DeadlineExceeded),
            SdkError::Connection(_) => Some(Code::Unavailable),
            _ => None,
        }
    }
}

impl From<Status> for SdkError {
    fn from(status: Status) -> Self {
        let code = status.code();
        let message = status.message().to_string();
        match code {
            Code::Unauthenticated | Code::PermissionDenied => {
                SdkError::Unauthenticated { code, message }
            }
            Code::NotFound => SdkError::NotFound { code, message },
            Code::Unavailable => SdkError::Connection(message),
            _ => SdkError::Server { code, message },
        }
    }
}

impl From<TransportError> for SdkError {
    fn from(err: TransportError) -> Self {
        let config = match err {
            TransportError::InvalidAddress { address, reason } => {
                ConfigError::InvalidAddress(format!("{address}: {reason}"))
            }
            TransportError::InvalidHeader(header) => ConfigError::InvalidHeader(header),
            other => ConfigError::Transport(other),
        };
        SdkError::Config(config)
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
