// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Log stream consumption.
//!
//! A [`LogConsumer`] drains one server stream into a bounded buffer. The
//! stream ends on the server's terminal marker, on a clean close, or on a
//! read error. A read error after at least one entry is downgraded: the
//! entries collected so far are kept and a warning entry is appended. A read
//! error before any entry fails the whole call.

use std::time::Duration;

use argocd_protocol::Streaming;
use argocd_protocol::proto::application::LogEntry as WireLogEntry;
use argocd_protocol::Status;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Result, SdkError};
use crate::types::LogEntry;

/// Forward-only source of log frames.
#[async_trait]
pub trait LogStream: Send {
    /// Next frame, `None` once the stream is closed.
    async fn next_entry(&mut self) -> std::result::Result<Option<WireLogEntry>, Status>;
}

#[async_trait]
impl LogStream for Streaming<WireLogEntry> {
    async fn next_entry(&mut self) -> std::result::Result<Option<WireLogEntry>, Status> {
        self.message().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Receiving,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct LogConsumer {
    state: ConsumerState,
    entries: Vec<LogEntry>,
    received: usize,
    limit: usize,
    error: Option<SdkError>,
}

impl LogConsumer {
    /// Consumer that stops after `limit` entries. A zero limit is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            state: ConsumerState::Receiving,
            entries: Vec::new(),
            received: 0,
            limit: limit.max(1),
            error: None,
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries taken from the stream, not counting the warning appended
    /// after a broken stream.
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn on_entry(&mut self, entry: WireLogEntry) {
        if self.state != ConsumerState::Receiving {
            return;
        }
        if entry.is_last() {
            self.state = ConsumerState::Done;
            return;
        }

        self.entries.push(convert(entry));
        self.received += 1;
        if self.received >= self.limit {
            debug!(limit = self.limit, "log buffer full, stopping");
            self.state = ConsumerState::Done;
        }
    }

    pub fn on_end(&mut self) {
        if self.state == ConsumerState::Receiving {
            self.state = ConsumerState::Done;
        }
    }

    pub fn on_error(&mut self, error: SdkError) {
        if self.state != ConsumerState::Receiving {
            return;
        }
        if self.entries.is_empty() {
            self.error = Some(error);
            self.state = ConsumerState::Failed;
            return;
        }

        warn!(
            entries = self.entries.len(),
            error = %error,
            "log stream ended early, returning partial result"
        );
        self.entries.push(LogEntry {
            timestamp: None,
            pod_name: None,
            content: format!("[warning] log stream ended early: {error}"),
        });
        self.state = ConsumerState::Done;
    }

    /// Read `stream` until it completes, fails or `timeout` elapses. A
    /// timed-out read counts as a read error.
    pub async fn drain<S: LogStream + ?Sized>(&mut self, stream: &mut S, timeout: Duration) {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.state == ConsumerState::Receiving {
            match tokio::time::timeout_at(deadline, stream.next_entry()).await {
                Ok(Ok(Some(entry))) => self.on_entry(entry),
                Ok(Ok(None)) => self.on_end(),
                Ok(Err(status)) => self.on_error(status.into()),
                Err(_) => self.on_error(SdkError::Timeout(timeout.as_millis() as u64)),
            }
        }
    }

    /// Collected entries, or the error when nothing was received.
    pub fn finish(self) -> Result<Vec<LogEntry>> {
        match (self.state, self.error) {
            (ConsumerState::Failed, Some(error)) => Err(error),
            (ConsumerState::Failed, None) => Err(SdkError::UnexpectedResponse(
                "log stream failed".to_string(),
            )),
            _ => Ok(self.entries),
        }
    }
}

fn convert(entry: WireLogEntry) -> LogEntry {
    let timestamp = entry
        .time_stamp_str
        .filter(|s| !s.is_empty())
        .or_else(|| entry.time_stamp.and_then(|t| t.to_rfc3339()));
    let content = entry
        .content
        .unwrap_or_default()
        .trim_end_matches(['\n', '\r'])
        .to_string();

    LogEntry {
        timestamp,
        pod_name: entry.pod_name.filter(|p| !p.is_empty()),
        content,
    }
}
