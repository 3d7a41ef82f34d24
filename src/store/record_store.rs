//! RecordStore - Abstract async CRUD over named collections.

use std::sync::Arc;

use async_trait::async_trait;

use super::{OrderBy, Row, StoreError};

/// Asynchronous row store addressed by collection name.
///
/// Each call is atomic for the single row it touches; nothing spans rows.
/// In-memory stores back tests, [`RestRecordStore`](super::RestRecordStore)
/// talks to the hosted backend.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List every row of `collection`, sorted by `order`.
    async fn list_ordered(&self, collection: &str, order: &OrderBy)
        -> Result<Vec<Row>, StoreError>;

    /// Insert a row. The store assigns `id` and returns the stored row.
    async fn insert(&self, collection: &str, row: Row) -> Result<Row, StoreError>;

    /// Overwrite the given columns of one row, leaving the rest untouched.
    async fn update_fields(&self, collection: &str, id: &str, fields: Row)
        -> Result<(), StoreError>;

    /// Delete one row by id.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn list_ordered(
        &self,
        collection: &str,
        order: &OrderBy,
    ) -> Result<Vec<Row>, StoreError> {
        (**self).list_ordered(collection, order).await
    }

    async fn insert(&self, collection: &str, row: Row) -> Result<Row, StoreError> {
        (**self).insert(collection, row).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Row,
    ) -> Result<(), StoreError> {
        (**self).update_fields(collection, id, fields).await
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete_by_id(collection, id).await
    }
}
