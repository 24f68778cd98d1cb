// # Published State
//
// The most recent draw, shared read-only with every consumer.
//
// ## Hand-off
//
// A [`Snapshot`] is replaced wholesale through a `tokio::sync::watch`
// channel. Consumers either read the current value or subscribe to changes;
// they never observe a half-updated record.
//
// ## Failure Behavior
//
// - A failed cycle keeps the previous record and marks it unavailable
// - Nothing is persisted; state is lost on shutdown

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::draw::DrawResult;
use crate::error::Result;
use crate::field::{DrawField, FieldReading};

/// Consumer view of the pipeline state
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Last successfully produced record
    pub record: Option<Arc<DrawResult>>,
    /// Whether the most recent cycle succeeded
    pub available: bool,
    /// When `record` was published
    pub last_update: Option<DateTime<Utc>>,
    /// Error message of the most recent failed cycle
    pub last_error: Option<String>,
    /// Short label of the results provider
    pub source: String,
}

impl Snapshot {
    /// State before the first cycle completes
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            record: None,
            available: false,
            last_update: None,
            last_error: None,
            source: source.into(),
        }
    }

    /// Read one field as a consumer sees it
    pub fn read(&self, field: DrawField) -> FieldReading {
        FieldReading {
            field,
            value: self.record.as_deref().map(|draw| field.value(draw)),
            available: self.available,
        }
    }

    /// Pretty-printed JSON rendering of the snapshot
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Single-producer handle to the published [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SharedState {
    tx: Arc<watch::Sender<Snapshot>>,
}

impl SharedState {
    pub fn new(source: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::empty(source));
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every future publication
    pub fn receiver(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Stream of snapshots, starting with the current one
    pub fn subscribe(&self) -> WatchStream<Snapshot> {
        WatchStream::new(self.tx.subscribe())
    }

    /// Replace the record and mark it available
    pub fn publish(&self, record: DrawResult) {
        let record = Arc::new(record);
        self.tx.send_modify(|snapshot| {
            snapshot.record = Some(record);
            snapshot.available = true;
            snapshot.last_update = Some(Utc::now());
            snapshot.last_error = None;
        });
    }

    /// Keep the previous record and mark it unavailable
    pub fn mark_failed(&self, error: impl Into<String>) {
        let error = error.into();
        self.tx.send_modify(|snapshot| {
            snapshot.available = false;
            snapshot.last_error = Some(error);
        });
    }
}
