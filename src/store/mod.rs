//! Record Store - the hosted row store behind every collection.
//!
//! The store is an injected collaborator: collections never reach for a global
//! client, they are handed an `Arc<S: RecordStore>`. Rows travel as JSON objects
//! so one store serves every record type.
//!
//! ## Example
//!
//! ```ignore
//! use menu_admin::{InMemoryRecordStore, OrderBy, RecordStore};
//!
//! let store = InMemoryRecordStore::new();
//! let row = store.insert("menu_items", to_row(&draft)?).await?;
//! let rows = store.list_ordered("menu_items", &OrderBy::asc("sort_order")).await?;
//! ```

mod change_feed;
mod in_memory;
mod record_store;
#[cfg(feature = "http")]
mod rest;

use serde_json::Value;

/// A single stored row: a JSON object keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Column ordering for [`RecordStore::list_ordered`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Network, auth or server failure. Retryable.
    #[error("store transport error: {0}")]
    Transport(String),
    /// The store rejected the write (constraint, immutable column, bad payload).
    #[error("store constraint violated: {0}")]
    Constraint(String),
    /// No row with this id.
    #[error("row not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    /// Serialization/deserialization error.
    #[error("row serialization error: {0}")]
    Serde(String),
    /// An internal lock was poisoned.
    #[error("store lock poisoned during {0}")]
    Poisoned(&'static str),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

pub use change_feed::{ChangeEvent, ChangeFeed, ChangeKind, ChangeStream};
pub use in_memory::InMemoryRecordStore;
pub use record_store::RecordStore;
#[cfg(feature = "http")]
pub use rest::RestRecordStore;
