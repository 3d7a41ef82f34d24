use std::fmt;

use crate::record::Record;
use crate::store::StoreError;
use crate::validate::ValidationError;

/// The collection operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
    Reorder,
    Toggle,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Reorder => "reorder",
            Operation::Toggle => "toggle",
        };
        f.write_str(name)
    }
}

/// Error type for collection operations.
///
/// Nothing here is fatal: validation errors are fixed by the user, store errors
/// by retrying once local state has been reconciled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Rejected before any store call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The id is not in the local listing.
    #[error("no record with id {id}")]
    NotFound { id: String },
    /// One or more store calls failed. `source` is the first failure.
    #[error("{operation} failed on {failed} store call(s): {source}")]
    Store {
        operation: Operation,
        failed: usize,
        /// Local state was replaced by a fresh listing from the store.
        resynced: bool,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    pub(crate) fn store(operation: Operation, source: StoreError) -> Self {
        SyncError::Store {
            operation,
            failed: 1,
            resynced: false,
            source,
        }
    }

    /// Whether retrying the same request can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Store { .. })
    }
}

/// The single failure notice shown for a failed `operation` on `R`.
pub(crate) fn failure_message<R: Record>(operation: Operation) -> String {
    let label = R::LABEL.to_lowercase();
    match operation {
        Operation::Load if label.ends_with('s') => format!("Failed to load {label}"),
        Operation::Load => format!("Failed to load {label}s"),
        Operation::Create => format!("Failed to add {label}"),
        Operation::Update | Operation::Toggle => format!("Failed to update {label}"),
        Operation::Delete => format!("Failed to delete {label}"),
        Operation::Reorder => "Failed to save order".to_string(),
    }
}
