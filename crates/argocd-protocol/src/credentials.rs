// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-call credentials.
//!
//! Credentials are consulted once per RPC and contribute request metadata.
//! They are attached to the channel through [`AuthInterceptor`], so every
//! sub-service client built on the same channel carries the same identity.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};
use tonic::service::Interceptor;
use tonic::{GrpcMethod, Request, Status};

/// Metadata key carrying the bearer token.
pub const AUTHORIZATION_METADATA_KEY: &str = "authorization";

/// Source of per-call request metadata.
pub trait CallCredentials: Send + Sync + fmt::Debug {
    /// Metadata to attach to a call of `method` (`/package.Service/Method`).
    fn metadata_for(&self, method: &str) -> BTreeMap<String, String>;

    /// Whether these credentials may only travel over an encrypted transport.
    fn requires_secure_transport(&self) -> bool;
}

/// Static bearer token sent as `authorization: Bearer <token>`.
///
/// The token does not require transport security, so it is also sent over
/// plaintext and web-tunnel connections. Whoever configures a plaintext
/// connection accepts that exposure.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl CallCredentials for BearerToken {
    fn metadata_for(&self, _method: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(
            AUTHORIZATION_METADATA_KEY.to_string(),
            format!("Bearer {}", self.token),
        )])
    }

    fn requires_secure_transport(&self) -> bool {
        false
    }
}

/// Interceptor copying [`CallCredentials`] metadata onto every outgoing call.
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    credentials: Arc<dyn CallCredentials>,
}

impl AuthInterceptor {
    pub fn new(credentials: Arc<dyn CallCredentials>) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Arc<dyn CallCredentials> {
        &self.credentials
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let method = request
            .extensions()
            .get::<GrpcMethod<'static>>()
            .map(|m| format!("/{}/{}", m.service(), m.method()))
            .unwrap_or_default();

        for (key, value) in self.credentials.metadata_for(&method) {
            let key = AsciiMetadataKey::from_bytes(key.as_bytes())
                .map_err(|_| Status::unauthenticated(format!("invalid metadata key: {key}")))?;
            let value = AsciiMetadataValue::try_from(value.as_str())
                .map_err(|_| Status::unauthenticated("credential value is not valid ASCII"))?;
            request.metadata_mut().insert(key, value);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MethodEcho;

    impl CallCredentials for MethodEcho {
        fn metadata_for(&self, method: &str) -> BTreeMap<String, String> {
            BTreeMap::from([("x-method".to_string(), method.to_string())])
        }

        fn requires_secure_transport(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_bearer_token_metadata() {
        let creds = BearerToken::new("abc123");
        let metadata = creds.metadata_for("/session.SessionService/GetUserInfo");

        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["authorization"], "Bearer abc123");
    }

    #[test]
    fn test_bearer_token_is_transport_agnostic() {
        assert!(!BearerToken::new("t").requires_secure_transport());
    }

    #[test]
    fn test_bearer_token_debug_redacts() {
        let debug = format!("{:?}", BearerToken::new("super-secret"));
        assert!(debug.contains("BearerToken"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_interceptor_inserts_authorization() {
        let mut interceptor = AuthInterceptor::new(Arc::new(BearerToken::new("abc123")));
        let request = interceptor.call(Request::new(())).unwrap();

        assert_eq!(
            request.metadata().get("authorization").unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_interceptor_passes_method_path() {
        let mut interceptor = AuthInterceptor::new(Arc::new(MethodEcho));
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(GrpcMethod::new("application.ApplicationService", "Get"));

        let request = interceptor.call(request).unwrap();
        assert_eq!(
            request.metadata().get("x-method").unwrap(),
            "/application.ApplicationService/Get"
        );
    }

    #[test]
    fn test_interceptor_rejects_non_ascii_token() {
        let mut interceptor = AuthInterceptor::new(Arc::new(BearerToken::new("tok\u{e9}n")));
        let status = interceptor.call(Request::new(())).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }
}
