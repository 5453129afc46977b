// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Log stream consumption tests for argocd-management-sdk.

use std::collections::VecDeque;
use std::time::Duration;

use argocd_management_sdk::SdkError;
use argocd_management_sdk::logs::{ConsumerState, LogConsumer, LogStream};
use argocd_protocol::Status;
use argocd_protocol::proto::application::LogEntry as WireLogEntry;
use async_trait::async_trait;

/// Replays a fixed script of frames, then reports a clean close.
struct ScriptedStream {
    frames: VecDeque<Result<WireLogEntry, Status>>,
    reads: usize,
}

impl ScriptedStream {
    fn new(frames: Vec<Result<WireLogEntry, Status>>) -> Self {
        Self {
            frames: frames.into(),
            reads: 0,
        }
    }
}

#[async_trait]
impl LogStream for ScriptedStream {
    async fn next_entry(&mut self) -> Result<Option<WireLogEntry>, Status> {
        self.reads += 1;
        match self.frames.pop_front() {
            Some(Ok(entry)) => Ok(Some(entry)),
            Some(Err(status)) => Err(status),
            None => Ok(None),
        }
    }
}

/// Yields its frames, then never answers again.
struct StalledStream {
    frames: VecDeque<WireLogEntry>,
}

#[async_trait]
impl LogStream for StalledStream {
    async fn next_entry(&mut self) -> Result<Option<WireLogEntry>, Status> {
        match self.frames.pop_front() {
            Some(entry) => Ok(Some(entry)),
            None => std::future::pending().await,
        }
    }
}

fn line(content: &str) -> Result<WireLogEntry, Status> {
    Ok(WireLogEntry {
        content: Some(format!("{content}\n")),
        pod_name: Some("guestbook-ui-7d5f".to_string()),
        time_stamp_str: Some("2024-05-01T10:00:00Z".to_string()),
        ..Default::default()
    })
}

fn last() -> Result<WireLogEntry, Status> {
    Ok(WireLogEntry {
        last: Some(true),
        ..Default::default()
    })
}

const TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::test]
async fn test_stream_ends_on_terminal_marker() {
    let mut stream = ScriptedStream::new(vec![
        line("one"),
        line("two"),
        line("three"),
        last(),
        line("after"),
    ]);
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, TIMEOUT).await;

    assert_eq!(consumer.state(), ConsumerState::Done);
    assert_eq!(stream.reads, 4);

    let entries = consumer.finish().unwrap();
    let contents: Vec<_> = entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
    assert_eq!(entries[0].pod_name.as_deref(), Some("guestbook-ui-7d5f"));
    assert_eq!(entries[0].timestamp.as_deref(), Some("2024-05-01T10:00:00Z"));
}

#[tokio::test]
async fn test_stream_ends_on_close() {
    let mut stream = ScriptedStream::new(vec![line("one"), line("two")]);
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, TIMEOUT).await;

    assert_eq!(consumer.finish().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_stream_is_empty_result() {
    let mut stream = ScriptedStream::new(vec![last()]);
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, TIMEOUT).await;

    assert!(consumer.finish().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_after_entries_returns_partial_result() {
    let mut stream = ScriptedStream::new(vec![
        line("one"),
        line("two"),
        Err(Status::internal("stream reset by peer")),
        line("never read"),
    ]);
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, TIMEOUT).await;
    assert_eq!(consumer.received(), 2);

    let entries = consumer.finish().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].content, "two");

    let warning = &entries[2];
    assert!(warning.content.starts_with("[warning]"));
    assert!(warning.content.contains("stream reset by peer"));
    assert!(warning.timestamp.is_none());
    assert!(warning.pod_name.is_none());
}

#[tokio::test]
async fn test_error_before_entries_fails() {
    let mut stream = ScriptedStream::new(vec![Err(Status::not_found("pods \"ghost\" not found"))]);
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, TIMEOUT).await;

    assert_eq!(consumer.state(), ConsumerState::Failed);
    match consumer.finish() {
        Err(SdkError::NotFound { message, .. }) => assert!(message.contains("ghost")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_buffer_limit_stops_reading() {
    let mut stream = ScriptedStream::new((0..10).map(|i| line(&format!("line {i}"))).collect());
    let mut consumer = LogConsumer::new(4);
    consumer.drain(&mut stream, TIMEOUT).await;

    assert_eq!(stream.reads, 4);
    let entries = consumer.finish().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[3].content, "line 3");
}

#[tokio::test(start_paused = true)]
async fn test_stalled_stream_keeps_partial_result() {
    let mut stream = StalledStream {
        frames: VecDeque::from([WireLogEntry {
            content: Some("booting".to_string()),
            ..Default::default()
        }]),
    };
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, Duration::from_secs(5)).await;

    let entries = consumer.finish().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].content, "booting");
    assert!(entries[1].content.contains("timed out"));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_empty_stream_times_out() {
    let mut stream = StalledStream {
        frames: VecDeque::new(),
    };
    let mut consumer = LogConsumer::new(100);
    consumer.drain(&mut stream, Duration::from_secs(5)).await;

    assert!(matches!(consumer.finish(), Err(SdkError::Timeout(5000))));
}
