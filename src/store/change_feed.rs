//! Realtime change notifications.
//!
//! Views never apply deltas from the feed. Every event means "something in this
//! collection changed, list it again".

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// Notifications were dropped; the listener must re-list.
    Resync,
}

/// A change notification for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub kind: ChangeKind,
    /// Row id, when known.
    pub id: Option<String>,
}

impl ChangeEvent {
    pub fn new(collection: impl Into<String>, kind: ChangeKind, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            kind,
            id: Some(id.into()),
        }
    }

    fn resync(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            kind: ChangeKind::Resync,
            id: None,
        }
    }
}

/// Source of realtime change notifications.
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to changes of a single collection.
    fn subscribe(&self, collection: &str) -> ChangeStream;
}

/// A subscription to one collection's changes.
///
/// Dropping the stream unsubscribes.
pub struct ChangeStream {
    collection: String,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl ChangeStream {
    pub fn new(collection: impl Into<String>, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            collection: collection.into(),
            receiver,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Wait for the next change to this collection.
    ///
    /// Returns `None` once the feed has shut down. A lagged subscriber gets a
    /// single [`ChangeKind::Resync`] instead of the events it missed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(collection = %self.collection, skipped, "change feed lagged");
                    return Some(ChangeEvent::resync(&self.collection));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
