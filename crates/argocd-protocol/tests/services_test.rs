// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Service client tests against an in-process fake transport.

use std::sync::{Arc, Mutex};

use argocd_protocol::proto::application::{ApplicationPodLogsQuery, ApplicationQuery, LogEntry};
use argocd_protocol::proto::meta::ObjectMeta;
use argocd_protocol::proto::session::{GetUserInfoRequest, GetUserInfoResponse};
use argocd_protocol::proto::v1alpha1::Application;
use argocd_protocol::{
    ApplicationServiceClient, AuthInterceptor, AuthedChannel, BearerToken, SessionServiceClient,
    Transport, TransportFailure,
};
use bytes::Bytes;
use http_body_util::Full;
use prost::Message;
use tonic::body::Body;
use tonic::service::interceptor::InterceptedService;
use tower::service_fn;
use tower::util::BoxCloneSyncService;

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    authorization: Option<String>,
}

/// Length-prefixed gRPC frame.
fn frame<M: Message>(message: &M) -> Vec<u8> {
    let payload = message.encode_to_vec();
    let mut buf = Vec::with_capacity(payload.len() + 5);
    buf.push(0);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    buf
}

/// Fake server answering every call with `body` and recording the request.
fn fake_channel(body: Vec<u8>, seen: Arc<Mutex<Vec<Seen>>>) -> AuthedChannel {
    let transport: Transport = BoxCloneSyncService::new(service_fn(
        move |request: http::Request<Body>| {
            let body = body.clone();
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(Seen {
                    path: request.uri().path().to_string(),
                    authorization: request
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });
                let response = http::Response::builder()
                    .header("content-type", "application/grpc")
                    .header("grpc-status", "0")
                    .body(Body::new(Full::new(Bytes::from(body))))
                    .unwrap();
                Ok::<_, TransportFailure>(response)
            }
        },
    ));
    InterceptedService::new(
        transport,
        AuthInterceptor::new(Arc::new(BearerToken::new("abc123"))),
    )
}

#[tokio::test]
async fn test_unary_call_sends_path_and_credentials() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reply = GetUserInfoResponse {
        logged_in: true,
        username: "admin".to_string(),
        iss: "argocd".to_string(),
        groups: vec!["ops".to_string()],
    };
    let mut client = SessionServiceClient::new(fake_channel(frame(&reply), seen.clone()));

    let response = client
        .get_user_info(GetUserInfoRequest {})
        .await
        .unwrap()
        .into_inner();
    assert_eq!(response, reply);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/session.SessionService/GetUserInfo");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn test_application_get_decodes_message() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Application {
        metadata: Some(ObjectMeta::named("guestbook")),
        ..Default::default()
    };
    let mut client = ApplicationServiceClient::new(fake_channel(frame(&app), seen.clone()));

    let response = client
        .get(ApplicationQuery {
            name: Some("guestbook".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.name(), "guestbook");
    assert_eq!(
        seen.lock().unwrap()[0].path,
        "/application.ApplicationService/Get"
    );
}

#[tokio::test]
async fn test_pod_logs_streams_entries() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let entries = [
        LogEntry {
            content: Some("line one".to_string()),
            pod_name: Some("guestbook-ui-1".to_string()),
            ..Default::default()
        },
        LogEntry {
            content: Some("line two".to_string()),
            pod_name: Some("guestbook-ui-1".to_string()),
            ..Default::default()
        },
        LogEntry {
            last: Some(true),
            ..Default::default()
        },
    ];
    let body: Vec<u8> = entries.iter().flat_map(frame).collect();
    let mut client = ApplicationServiceClient::new(fake_channel(body, seen.clone()));

    let mut stream = client
        .pod_logs(ApplicationPodLogsQuery {
            name: Some("guestbook".to_string()),
            tail_lines: Some(100),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();

    let mut received = Vec::new();
    while let Some(entry) = stream.message().await.unwrap() {
        received.push(entry);
    }

    assert_eq!(received.len(), 3);
    assert_eq!(received[0].content.as_deref(), Some("line one"));
    assert!(received[2].is_last());
    assert_eq!(
        seen.lock().unwrap()[0].path,
        "/application.ApplicationService/PodLogs"
    );
}
