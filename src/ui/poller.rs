//! Timer-driven snapshot refresh for pages backed by an envelope endpoint.
//!
//! A poller fetches once when started and then on every interval tick until
//! its [`PollerHandle`] is dropped. Results travel to the UI task over an
//! mpsc channel and land in a [`SnapshotSlot`], which keeps the previous
//! snapshot whenever a fetch fails.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::ClientError;
use crate::web::models::ApiEnvelope;

/// Something that can fetch an envelope for an endpoint path
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, endpoint: &str) -> Result<ApiEnvelope<Value>, ClientError>;
}

/// Monotonic fetch counter shared by every poller
#[derive(Debug, Clone, Default)]
pub struct SequenceGen(Arc<AtomicU64>);

impl SequenceGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// One completed fetch
#[derive(Debug)]
pub struct PollUpdate {
    /// Route of the page that asked for the data
    pub route: String,
    pub seq: u64,
    pub result: Result<ApiEnvelope<Value>, ClientError>,
}

/// Parameters for one poller
#[derive(Debug, Clone)]
pub struct PollSpec {
    pub route: String,
    pub endpoint: String,
    /// `None` fetches once
    pub interval: Option<Duration>,
}

/// Running poller; dropping it stops the loop
#[derive(Debug)]
pub struct PollerHandle {
    route: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
        tracing::debug!(route = %self.route, "Poller stopped");
    }
}

/// Start polling `spec.endpoint`. Must be called inside a tokio runtime.
pub fn spawn_poller(
    source: Arc<dyn SnapshotSource>,
    spec: PollSpec,
    sequence: SequenceGen,
    tx: mpsc::UnboundedSender<PollUpdate>,
) -> PollerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let route = spec.route.clone();

    let task = tokio::spawn(async move {
        let mut ticker = spec.interval.map(|period| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            // The first tick completes immediately, so the first fetch is eager
            if let Some(ticker) = ticker.as_mut() {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
            }

            let seq = sequence.next();
            let result = tokio::select! {
                _ = token.cancelled() => break,
                result = source.fetch(&spec.endpoint) => result,
            };

            let update = PollUpdate {
                route: spec.route.clone(),
                seq,
                result,
            };
            if tx.send(update).is_err() {
                tracing::debug!(route = %spec.route, "Poll receiver closed");
                break;
            }

            if ticker.is_none() {
                break;
            }
        }
    });

    tracing::debug!(route = %route, "Poller started");
    PollerHandle {
        route,
        cancel,
        task,
    }
}

/// Latest successfully fetched data for one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSlot {
    data: Option<Value>,
    count: Option<usize>,
    applied_seq: Option<u64>,
    updated_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Message from the most recent failed fetch, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply a fetch result. Returns whether the snapshot changed.
    ///
    /// Results older than the newest applied one are dropped. Failures
    /// (`success == false` or any client error) keep the current data.
    pub fn apply(&mut self, seq: u64, result: Result<ApiEnvelope<Value>, ClientError>) -> bool {
        if self.applied_seq.is_some_and(|applied| seq <= applied) {
            tracing::debug!(seq, applied = ?self.applied_seq, "Dropping stale poll result");
            return false;
        }

        match result {
            Ok(envelope) if envelope.success => {
                self.data = envelope.data;
                self.count = envelope.count;
                self.applied_seq = Some(seq);
                self.updated_at = Some(Utc::now());
                self.last_error = None;
                true
            }
            Ok(envelope) => {
                let message = envelope
                    .error
                    .unwrap_or_else(|| "request unsuccessful".to_string());
                tracing::warn!(seq, error = %message, "Poll returned unsuccessful envelope");
                self.last_error = Some(message);
                false
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "Poll failed");
                self.last_error = Some(err.to_string());
                false
            }
        }
    }
}
