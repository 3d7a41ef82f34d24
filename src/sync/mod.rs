//! Persistence Synchronizer - optimistic local state over a remote ordered collection.
//!
//! [`OrderedCollection`] owns the displayed listing of one collection. Reorders
//! are applied locally before any suspension, then persisted as concurrent
//! per-record position writes. A failed write discards the optimistic state and
//! re-lists from the store, so the displayed order is never silently wrong for
//! longer than one round trip.

mod collection;
mod error;

pub use collection::OrderedCollection;
pub(crate) use error::failure_message;
pub use error::{Operation, SyncError};
