// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport selection and channel construction.
//!
//! [`TransportPlan::resolve`] decides the transport from the connection flags
//! without touching the network. [`TransportBuilder::build`] turns the plan
//! into a lazily-connecting channel; nothing is dialed until the first RPC.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::header::USER_AGENT;
use http::uri::{Authority, PathAndQuery};
use http::{HeaderMap, HeaderValue, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rustls::pki_types::CertificateDer;
use thiserror::Error;
use tonic::body::Body;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Endpoint;
use tonic_web::GrpcWebClientLayer;
use tower::ServiceBuilder;
use tower::util::BoxCloneSyncService;
use tracing::{debug, info, warn};

use crate::connector::TlsConnector;
use crate::credentials::{AuthInterceptor, CallCredentials};
use crate::tls::{self, ALPN_H2, ALPN_HTTP1, ClientIdentity, TlsError, TlsSettings};

/// Boxed error type used by the transport stack.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type-erased HTTP service carrying gRPC (or grpc-web) requests.
pub type Transport =
    BoxCloneSyncService<http::Request<Body>, http::Response<Body>, TransportFailure>;

/// Error returned by a [`Transport`] when a request cannot be delivered.
///
/// The underlying error stays reachable through `source()`, so tonic can
/// still recognise connect failures and report them as `Unavailable`.
#[derive(Debug)]
pub struct TransportFailure(BoxError);

impl TransportFailure {
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self(error.into())
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure: {}", self.0)
    }
}

impl std::error::Error for TransportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Transport with per-call credentials applied.
pub type AuthedChannel = InterceptedService<Transport, AuthInterceptor>;

/// Errors raised while planning or building a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("credentials require transport security but plaintext was requested")]
    InsecureCredentials,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid grpc-web root path: {0}")]
    InvalidRootPath(String),
}

/// Everything needed to open a channel to an Argo CD API server.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// `host:port`; an `http://` or `https://` prefix is tolerated and stripped.
    pub address: String,
    pub plaintext: bool,
    /// Skip server certificate verification.
    pub insecure: bool,
    pub grpc_web: bool,
    pub grpc_web_root_path: Option<String>,
    pub client_identity: Option<ClientIdentity>,
    pub ca_certificates: Vec<CertificateDer<'static>>,
    /// Extra headers sent with every request.
    pub headers: HeaderMap,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

/// Wire transport chosen for a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// HTTP/2 over cleartext TCP.
    Plaintext,
    /// grpc-web framing over HTTP/1.1 + TLS, for proxies that cannot pass HTTP/2.
    WebTunnel { root_path: Option<String> },
    /// HTTP/2 over TLS presenting a client certificate.
    MutualTls,
    /// HTTP/2 over TLS.
    Tls,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Plaintext => write!(f, "plaintext"),
            TransportMode::WebTunnel { root_path: None } => write!(f, "grpc-web"),
            TransportMode::WebTunnel {
                root_path: Some(root),
            } => write!(f, "grpc-web (/{root})"),
            TransportMode::MutualTls => write!(f, "mtls"),
            TransportMode::Tls => write!(f, "tls"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPlan {
    pub mode: TransportMode,
    /// Whether the server certificate is verified. Always false for plaintext.
    pub verify_server: bool,
}

impl TransportPlan {
    /// Pick the transport for `options`.
    ///
    /// Precedence: plaintext, then the web tunnel, then mutual TLS when a
    /// client identity is present, otherwise TLS. `insecure` only toggles
    /// server verification of the encrypted modes.
    pub fn resolve(options: &TransportOptions) -> Self {
        if options.plaintext {
            return Self {
                mode: TransportMode::Plaintext,
                verify_server: false,
            };
        }

        let mode = if options.grpc_web {
            TransportMode::WebTunnel {
                root_path: normalize_root_path(options.grpc_web_root_path.as_deref()),
            }
        } else if options.client_identity.is_some() {
            TransportMode::MutualTls
        } else {
            TransportMode::Tls
        };

        Self {
            mode,
            verify_server: !options.insecure,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.mode != TransportMode::Plaintext
    }

    pub fn verifies_server(&self) -> bool {
        self.is_encrypted() && self.verify_server
    }
}

/// Strip surrounding slashes; empty paths mean "no prefix".
fn normalize_root_path(root: Option<&str>) -> Option<String> {
    let trimmed = root?.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Prefix the path of `uri` with `root`, keeping scheme, authority and query.
pub fn prefix_path(uri: &Uri, root: &str) -> Uri {
    let root = root.trim_matches('/');
    if root.is_empty() {
        return uri.clone();
    }

    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let path = format!("/{}/{}", root, path.trim_start_matches('/'));

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = match PathAndQuery::try_from(path) {
        Ok(p) => Some(p),
        Err(_) => return uri.clone(),
    };
    Uri::from_parts(parts).unwrap_or_else(|_| uri.clone())
}

/// Applied to every outgoing request regardless of transport.
#[derive(Debug)]
struct RequestDecorator {
    headers: HeaderMap,
    user_agent: HeaderValue,
    root_path: Option<String>,
}

impl RequestDecorator {
    fn apply(&self, mut request: http::Request<Body>) -> http::Request<Body> {
        for (name, value) in &self.headers {
            request.headers_mut().append(name.clone(), value.clone());
        }
        request
            .headers_mut()
            .insert(USER_AGENT, self.user_agent.clone());

        if let Some(root) = &self.root_path {
            *request.uri_mut() = prefix_path(request.uri(), root);
        }
        request
    }
}

/// A built, lazily-connecting channel plus what it was built from.
#[derive(Debug, Clone)]
pub struct Connection {
    channel: AuthedChannel,
    origin: Uri,
    plan: TransportPlan,
    timeout: Option<Duration>,
}

impl Connection {
    /// Channel shared by every sub-service client.
    pub fn channel(&self) -> AuthedChannel {
        self.channel.clone()
    }

    /// `scheme://address` used as the request origin.
    pub fn origin(&self) -> &Uri {
        &self.origin
    }

    pub fn plan(&self) -> &TransportPlan {
        &self.plan
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builds a [`Connection`] from [`TransportOptions`] and call credentials.
#[derive(Debug)]
pub struct TransportBuilder {
    options: TransportOptions,
    credentials: Arc<dyn CallCredentials>,
}

impl TransportBuilder {
    pub fn new(options: TransportOptions, credentials: impl CallCredentials + 'static) -> Self {
        Self {
            options,
            credentials: Arc::new(credentials),
        }
    }

    pub fn plan(&self) -> TransportPlan {
        TransportPlan::resolve(&self.options)
    }

    /// Build the channel.
    ///
    /// Must run inside a Tokio runtime: the HTTP/2 channel spawns its
    /// background worker on construction.
    pub fn build(self) -> Result<Connection, TransportError> {
        let plan = self.plan();
        let address = strip_scheme(&self.options.address);
        let authority = address
            .parse::<Authority>()
            .map_err(|e| TransportError::InvalidAddress {
                address: self.options.address.clone(),
                reason: e.to_string(),
            })?;

        if !plan.is_encrypted() && self.credentials.requires_secure_transport() {
            return Err(TransportError::InsecureCredentials);
        }

        let root_path = match &plan.mode {
            TransportMode::WebTunnel { root_path } => {
                if let Some(root) = root_path {
                    PathAndQuery::try_from(format!("/{root}"))
                        .ok()
                        .filter(|p| p.query().is_none())
                        .ok_or_else(|| TransportError::InvalidRootPath(root.clone()))?;
                }
                root_path.clone()
            }
            _ => None,
        };

        let scheme = if plan.is_encrypted() { "https" } else { "http" };
        let origin = format!("{scheme}://{authority}")
            .parse::<Uri>()
            .map_err(|e| TransportError::InvalidAddress {
                address: self.options.address.clone(),
                reason: e.to_string(),
            })?;

        let user_agent = self.options.user_agent.clone().unwrap_or_else(|| {
            format!("argocd-protocol/{}", env!("CARGO_PKG_VERSION"))
        });
        let user_agent = HeaderValue::try_from(user_agent.as_str())
            .map_err(|_| TransportError::InvalidHeader(format!("user-agent: {user_agent}")))?;

        if plan.is_encrypted() && !plan.verify_server {
            warn!(address = %authority, "server certificate verification is disabled");
        }
        info!(address = %authority, mode = %plan.mode, "building transport");

        let inner = match &plan.mode {
            TransportMode::Plaintext => {
                self.http2_transport(&authority, &user_agent, None)?
            }
            TransportMode::Tls | TransportMode::MutualTls => {
                let tls = self.tls_config(&plan, ALPN_H2)?;
                self.http2_transport(&authority, &user_agent, Some(tls))?
            }
            TransportMode::WebTunnel { .. } => {
                let tls = self.tls_config(&plan, ALPN_HTTP1)?;
                web_transport(tls)
            }
        };

        let decorator = Arc::new(RequestDecorator {
            headers: self.options.headers.clone(),
            user_agent,
            root_path,
        });
        let transport = BoxCloneSyncService::new(
            ServiceBuilder::new()
                .map_request(move |request| decorator.apply(request))
                .service(inner),
        );

        debug!(origin = %origin, "transport ready");
        Ok(Connection {
            channel: InterceptedService::new(transport, AuthInterceptor::new(self.credentials)),
            origin,
            plan,
            timeout: self.options.timeout,
        })
    }

    fn tls_config(
        &self,
        plan: &TransportPlan,
        alpn: &[u8],
    ) -> Result<rustls::ClientConfig, TransportError> {
        let settings = TlsSettings {
            verify_server: plan.verify_server,
            ca_certificates: self.options.ca_certificates.clone(),
            client_identity: self.options.client_identity.clone(),
        };
        Ok(tls::client_config(&settings, alpn)?)
    }

    /// Native gRPC over HTTP/2. TLS, when present, is done by our own
    /// connector, so the endpoint itself is always dialed as `http`.
    fn http2_transport(
        &self,
        authority: &Authority,
        user_agent: &HeaderValue,
        tls: Option<rustls::ClientConfig>,
    ) -> Result<Transport, TransportError> {
        let invalid = |e: tonic::transport::Error| TransportError::InvalidAddress {
            address: self.options.address.clone(),
            reason: e.to_string(),
        };

        let mut endpoint = Endpoint::from_shared(format!("http://{authority}"))
            .map_err(invalid)?
            .user_agent(user_agent.clone())
            .map_err(invalid)?;
        if let Some(timeout) = self.options.timeout {
            endpoint = endpoint.timeout(timeout);
        }

        let channel = match tls {
            None => endpoint.connect_lazy(),
            Some(config) => {
                let origin = format!("https://{authority}")
                    .parse::<Uri>()
                    .map_err(|e| TransportError::InvalidAddress {
                        address: self.options.address.clone(),
                        reason: e.to_string(),
                    })?;
                endpoint
                    .origin(origin)
                    .connect_with_connector_lazy(TlsConnector::new(config))
            }
        };

        Ok(BoxCloneSyncService::new(
            ServiceBuilder::new()
                .map_err(TransportFailure::new)
                .service(channel),
        ))
    }
}

/// grpc-web over HTTP/1.1 + TLS.
fn web_transport(tls: rustls::ClientConfig) -> Transport {
    let client = Client::builder(TokioExecutor::new()).build(TlsConnector::new(tls));

    BoxCloneSyncService::new(
        ServiceBuilder::new()
            .map_err(TransportFailure::new)
            .map_response(into_tonic_body)
            .layer(GrpcWebClientLayer::new())
            .service(client),
    )
}

fn into_tonic_body<B>(response: http::Response<B>) -> http::Response<Body>
where
    B: http_body::Body<Data = bytes::Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    response.map(Body::new)
}

fn strip_scheme(address: &str) -> &str {
    let address = address.trim();
    address
        .strip_prefix("https://")
        .or_else(|| address.strip_prefix("http://"))
        .unwrap_or(address)
        .trim_end_matches('/')
}
