//! Records - Typed accessor for record CRUD against any RecordStore.

use std::marker::PhantomData;

use serde::Serialize;

use super::{from_row, to_row, Record};
use crate::store::{OrderBy, RecordStore, StoreError};
use crate::sync::{Operation, SyncError};
use crate::validate::Validate;

/// Typed wrapper for reading and writing records of one type.
///
/// Plain pass-through with validation in front; no local state, no ordering.
/// Ordered collections go through [`OrderedCollection`](crate::OrderedCollection).
pub struct Records<'a, S: ?Sized, R> {
    store: &'a S,
    _marker: PhantomData<R>,
}

impl<'a, S: RecordStore + ?Sized, R: Record> Records<'a, S, R> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// List every record, sorted by `order`.
    pub async fn list(&self, order: &OrderBy) -> Result<Vec<R>, StoreError> {
        self.store
            .list_ordered(R::COLLECTION, order)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    /// The first record by `order`, for single-row collections such as site settings.
    pub async fn first(&self, order: &OrderBy) -> Result<Option<R>, StoreError> {
        Ok(self.list(order).await?.into_iter().next())
    }

    /// Validate and insert a draft, returning the stored record.
    pub async fn create<D>(&self, draft: &D) -> Result<R, SyncError>
    where
        D: Serialize + Validate + ?Sized,
    {
        draft.validate()?;
        let fail = |source| SyncError::store(Operation::Create, source);
        let mut row = to_row(draft).map_err(fail)?;
        row.remove("id");
        let stored = self.store.insert(R::COLLECTION, row).await.map_err(fail)?;
        from_row(stored).map_err(fail)
    }

    /// Validate and apply a partial update. `id` is never sent.
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<(), SyncError>
    where
        P: Serialize + Validate + ?Sized,
    {
        patch.validate()?;
        let fail = |source| SyncError::store(Operation::Update, source);
        let mut fields = to_row(patch).map_err(fail)?;
        fields.remove("id");
        if fields.is_empty() {
            return Ok(());
        }
        self.store
            .update_fields(R::COLLECTION, id, fields)
            .await
            .map_err(fail)
    }

    /// Delete by id.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_by_id(R::COLLECTION, id).await
    }
}

/// Extension trait for typed record access on any RecordStore.
pub trait RecordsExt: RecordStore {
    /// Get a typed record accessor.
    fn records<R: Record>(&self) -> Records<'_, Self, R> {
        Records::new(self)
    }
}

impl<S: RecordStore + ?Sized> RecordsExt for S {}
