//! LiveCollection - a listing that follows the store's change feed.
//!
//! Used for views that other people write to while they are open, like the
//! contact inbox and the announcement banner. Notifications are never applied
//! as deltas; each one triggers a full re-list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::notify::{LogNotifier, Notice, Notifier};
use crate::record::{Record, RecordsExt};
use crate::store::{ChangeFeed, ChangeKind, ChangeStream, OrderBy, RecordStore, StoreError};
use crate::sync::{failure_message, Operation, SyncError};
use crate::validate::Validate;

/// The latest listing of one collection, re-listed on every change notification.
///
/// Writes go straight to the store; the listing catches up when the feed
/// reports them. Each operation reports one success or failure notice.
pub struct LiveCollection<S: ?Sized, R, N = LogNotifier> {
    store: Arc<S>,
    notifier: N,
    order: OrderBy,
    items: Mutex<Vec<R>>,
    changes: tokio::sync::Mutex<ChangeStream>,
}

impl<S, R> LiveCollection<S, R>
where
    S: RecordStore + ChangeFeed + ?Sized,
    R: Record,
{
    /// Subscribe to `R::COLLECTION`. The listing starts empty; call `refresh`.
    pub fn new(store: Arc<S>, order: OrderBy) -> Self {
        let changes = store.subscribe(R::COLLECTION);
        Self {
            store,
            notifier: LogNotifier::new(),
            order,
            items: Mutex::new(Vec::new()),
            changes: tokio::sync::Mutex::new(changes),
        }
    }
}

impl<S, R, N> LiveCollection<S, R, N>
where
    S: RecordStore + ChangeFeed + ?Sized,
    R: Record,
    N: Notifier,
{
    /// Report notices through `notifier` instead of the log.
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> LiveCollection<S, R, M> {
        LiveCollection {
            store: self.store,
            notifier,
            order: self.order,
            items: self.items,
            changes: self.changes,
        }
    }

    pub fn items(&self) -> Vec<R> {
        self.view().clone()
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    /// Re-list from the store.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let items = self
            .store
            .records::<R>()
            .list(&self.order)
            .await
            .map_err(|source| self.fail(Operation::Load, source))?;

        *self.view() = items;
        Ok(())
    }

    /// Wait for the next change to the collection, then re-list.
    ///
    /// Returns `Ok(None)` once the feed has closed.
    pub async fn next_change(&self) -> Result<Option<ChangeKind>, SyncError> {
        let event = self.changes.lock().await.next().await;
        match event {
            Some(event) => {
                tracing::debug!(collection = R::COLLECTION, kind = ?event.kind, "change received");
                self.refresh().await?;
                Ok(Some(event.kind))
            }
            None => Ok(None),
        }
    }

    /// Follow the feed until it closes. A failed re-list is logged and the
    /// next notification tries again.
    pub async fn follow(&self) {
        loop {
            match self.next_change().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(collection = R::COLLECTION, error = %err, "live refresh failed");
                }
            }
        }
        tracing::debug!(collection = R::COLLECTION, "change feed closed");
    }

    /// Insert a record from a validated draft. The feed triggers the re-list.
    pub async fn create<D>(&self, draft: &D) -> Result<R, SyncError>
    where
        D: Serialize + Validate + ?Sized,
    {
        let record = self
            .store
            .records::<R>()
            .create(draft)
            .await
            .map_err(|err| self.report(Operation::Create, err))?;
        self.notifier
            .notify(Notice::success(format!("{} added", R::LABEL)));
        Ok(record)
    }

    /// Send a partial update, e.g. marking a message read.
    pub async fn set_fields<P>(&self, id: &str, patch: &P) -> Result<(), SyncError>
    where
        P: Serialize + Validate + ?Sized,
    {
        self.store
            .records::<R>()
            .update(id, patch)
            .await
            .map_err(|err| self.report(Operation::Update, err))?;
        self.notifier
            .notify(Notice::success(format!("{} updated", R::LABEL)));
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), SyncError> {
        self.store
            .records::<R>()
            .delete(id)
            .await
            .map_err(|source| self.fail(Operation::Delete, source))?;
        self.notifier
            .notify(Notice::success(format!("{} deleted", R::LABEL)));
        Ok(())
    }

    fn fail(&self, operation: Operation, source: StoreError) -> SyncError {
        self.report(operation, SyncError::store(operation, source))
    }

    /// Emit the one failure notice for `err`.
    fn report(&self, operation: Operation, err: SyncError) -> SyncError {
        let message = match &err {
            SyncError::Validation(invalid) => invalid.to_string(),
            _ => {
                tracing::warn!(collection = R::COLLECTION, %operation, error = %err, "store call failed");
                failure_message::<R>(operation)
            }
        };
        self.notifier.notify(Notice::failure(message));
        err
    }

    fn view(&self) -> MutexGuard<'_, Vec<R>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
