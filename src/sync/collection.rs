use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{failure_message, Operation, SyncError};
use crate::notify::{LogNotifier, Notice, Notifier};
use crate::ordering::{self, Direction, MoveOutcome, PositionUpdate, Reorder};
use crate::record::{from_row, to_row, OrderedRecord};
use crate::store::{OrderBy, RecordStore, Row, StoreError};
use crate::validate::Validate;

/// A manually ordered collection kept in step with a [`RecordStore`].
///
/// Lifecycle:
/// - `load` / `refresh` replace the listing with the store's
/// - `move_item` / `swap` / `toggle_active` apply optimistically, reconcile on failure
/// - `create` / `update` / `delete` wait for the store before touching local state
///
/// Reorders, creates, deletes and toggles share a single-flight lock: a request
/// arriving while another is persisting waits its turn (FIFO) and is then
/// planned against the settled listing. Position writes are spawned on the
/// tokio runtime, so a batch already dispatched completes even if the caller
/// goes away.
pub struct OrderedCollection<S: ?Sized, R, N = LogNotifier> {
    store: Arc<S>,
    notifier: N,
    order: OrderBy,
    items: Mutex<Vec<R>>,
    flight: tokio::sync::Mutex<()>,
}

impl<S, R> OrderedCollection<S, R>
where
    S: RecordStore + ?Sized + 'static,
    R: OrderedRecord,
{
    /// Create an empty collection. Call [`load`](Self::load) to fill it.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            notifier: LogNotifier::new(),
            order: OrderBy::asc(R::POSITION_FIELD),
            items: Mutex::new(Vec::new()),
            flight: tokio::sync::Mutex::new(()),
        }
    }
}

impl<S, R, N> OrderedCollection<S, R, N>
where
    S: RecordStore + ?Sized + 'static,
    R: OrderedRecord,
    N: Notifier,
{
    /// Report notices through `notifier` instead of the log.
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> OrderedCollection<S, R, M> {
        OrderedCollection {
            store: self.store,
            notifier,
            order: self.order,
            items: self.items,
            flight: self.flight,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Snapshot of the displayed listing.
    pub fn items(&self) -> Vec<R> {
        self.view().clone()
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.view().iter().find(|r| r.id() == id).cloned()
    }

    /// Initial fetch.
    pub async fn load(&self) -> Result<(), SyncError> {
        self.refresh().await
    }

    /// Manual refresh trigger: replace the listing with the store's.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let _flight = self.flight.lock().await;
        let items = self
            .fetch()
            .await
            .map_err(|source| self.fail(Operation::Load, source))?;
        self.replace(items);
        Ok(())
    }

    /// Drag-and-drop: move the record at `from` to `to`.
    pub async fn move_item(&self, from: usize, to: usize) -> Result<MoveOutcome, SyncError> {
        let _flight = self.flight.lock().await;
        let confirmed = self.items();
        let plan = ordering::move_by_index(&confirmed, from, to);
        self.apply_reorder(confirmed, plan).await
    }

    /// Button-driven: swap the record at `index` with its neighbour.
    pub async fn swap(&self, index: usize, direction: Direction) -> Result<MoveOutcome, SyncError> {
        let _flight = self.flight.lock().await;
        let confirmed = self.items();
        let plan = ordering::swap_adjacent(&confirmed, index, direction);
        self.apply_reorder(confirmed, plan).await
    }

    /// Persist dense positions for the current listing, e.g. after loading rows
    /// written by another client. Returns how many positions were rewritten.
    pub async fn repair(&self) -> Result<usize, SyncError> {
        let _flight = self.flight.lock().await;
        let confirmed = self.items();
        let compacted = ordering::compact(&confirmed);
        let diff = ordering::diff_positions(&confirmed, &compacted);
        let writes = diff.len();

        self.replace(compacted);
        self.persist(Operation::Reorder, confirmed, diff).await?;
        Ok(writes)
    }

    /// Validate and insert `draft` at the end of the collection.
    ///
    /// The record is appended locally only after the store confirms it.
    pub async fn create<D>(&self, draft: &D) -> Result<R, SyncError>
    where
        D: Serialize + Validate + ?Sized,
    {
        self.validate(draft)?;

        let _flight = self.flight.lock().await;
        let mut row = to_row(draft).map_err(|source| self.fail(Operation::Create, source))?;
        row.remove("id");
        row.insert(
            R::POSITION_FIELD.to_string(),
            Value::from(position_of(self.len())),
        );

        let record = match self.store.insert(R::COLLECTION, row).await {
            Ok(stored) => from_row::<R>(stored),
            Err(source) => Err(source),
        }
        .map_err(|source| self.fail(Operation::Create, source))?;

        self.view().push(record.clone());
        info!(collection = R::COLLECTION, id = record.id(), "created");
        self.notifier
            .notify(Notice::success(format!("{} added", R::LABEL)));
        Ok(record)
    }

    /// Validate and send the fields of `patch`.
    ///
    /// `id` and the position field are never sent; positions only change
    /// through reordering. The store call does not wait for an in-flight
    /// reorder, but the local merge does, so a reorder that falls back to its
    /// confirmed snapshot cannot drop the edit from the listing.
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<R, SyncError>
    where
        P: Serialize + Validate + ?Sized,
    {
        self.validate(patch)?;

        let current = self.get(id).ok_or_else(|| self.missing(Operation::Update, id))?;
        let mut fields = to_row(patch).map_err(|source| self.fail(Operation::Update, source))?;
        fields.remove("id");
        fields.remove(R::POSITION_FIELD);
        if fields.is_empty() {
            return Ok(current);
        }

        // Reject patches that would not decode before bothering the store.
        merge_fields(&current, &fields).map_err(|source| self.fail(Operation::Update, source))?;

        self.store
            .update_fields(R::COLLECTION, id, fields.clone())
            .await
            .map_err(|source| self.fail(Operation::Update, source))?;

        let _flight = self.flight.lock().await;
        let merged = {
            let mut items = self.view();
            items
                .iter_mut()
                .find(|r| r.id() == id)
                .and_then(|record| {
                    let merged = merge_fields(record, &fields).ok()?;
                    *record = merged.clone();
                    Some(merged)
                })
        };

        let merged = match merged {
            Some(merged) => merged,
            // Deleted or reshaped meanwhile; take the store's word for it.
            None => {
                let items = self
                    .fetch()
                    .await
                    .map_err(|source| self.fail(Operation::Load, source))?;
                self.replace(items);
                self.get(id).ok_or_else(|| self.missing(Operation::Update, id))?
            }
        };

        self.notifier
            .notify(Notice::success(format!("{} updated", R::LABEL)));
        Ok(merged)
    }

    /// Delete a record, then close the gap it leaves in the positions.
    ///
    /// Once the store has removed the row the delete stands. A failed
    /// compaction write is reported as a [`Operation::Reorder`] failure, and
    /// [`repair`](Self::repair) is the way to retry it.
    pub async fn delete(&self, id: &str) -> Result<(), SyncError> {
        let _flight = self.flight.lock().await;
        if self.get(id).is_none() {
            return Err(self.missing(Operation::Delete, id));
        }

        self.store
            .delete_by_id(R::COLLECTION, id)
            .await
            .map_err(|source| self.fail(Operation::Delete, source))?;

        let confirmed: Vec<R> = self
            .items()
            .into_iter()
            .filter(|r| r.id() != id)
            .collect();
        let compacted = ordering::compact(&confirmed);
        let diff = ordering::diff_positions(&confirmed, &compacted);

        self.replace(compacted);
        self.persist(Operation::Reorder, confirmed, diff).await?;

        info!(collection = R::COLLECTION, id, "deleted");
        self.notifier
            .notify(Notice::success(format!("{} deleted", R::LABEL)));
        Ok(())
    }

    /// Flip the active flag. Returns the new value.
    pub async fn toggle_active(&self, id: &str) -> Result<bool, SyncError> {
        let _flight = self.flight.lock().await;
        let confirmed = self.items();
        let active = match confirmed.iter().find(|r| r.id() == id) {
            Some(record) => !record.is_active(),
            None => return Err(self.missing(Operation::Toggle, id)),
        };

        if let Some(record) = self.view().iter_mut().find(|r| r.id() == id) {
            record.set_active(active);
        }

        let mut fields = Row::new();
        fields.insert(R::ACTIVE_FIELD.to_string(), Value::Bool(active));
        if let Err(source) = self.store.update_fields(R::COLLECTION, id, fields).await {
            return Err(self.reconcile(Operation::Toggle, confirmed, 1, source).await);
        }

        let state = if active { "activated" } else { "deactivated" };
        self.notifier
            .notify(Notice::success(format!("{} {state}", R::LABEL)));
        Ok(active)
    }

    async fn apply_reorder(
        &self,
        confirmed: Vec<R>,
        plan: Reorder<R>,
    ) -> Result<MoveOutcome, SyncError> {
        if plan.is_noop() {
            return Ok(plan.outcome);
        }

        self.replace(plan.sequence);
        self.persist(Operation::Reorder, confirmed, plan.diff).await?;
        self.notifier.notify(Notice::success("Order updated"));
        Ok(plan.outcome)
    }

    /// Issue every position write concurrently and wait for all of them.
    ///
    /// Must be called with the flight lock held and the optimistic listing
    /// already in place. `confirmed` is restored if re-listing fails.
    async fn persist(
        &self,
        operation: Operation,
        confirmed: Vec<R>,
        diff: Vec<PositionUpdate>,
    ) -> Result<(), SyncError> {
        if diff.is_empty() {
            return Ok(());
        }

        let writes = diff.len();
        let batch: Vec<JoinHandle<Result<(), StoreError>>> = diff
            .into_iter()
            .map(|update| {
                let store = Arc::clone(&self.store);
                let mut fields = Row::new();
                fields.insert(R::POSITION_FIELD.to_string(), Value::from(update.position));
                tokio::spawn(async move {
                    store
                        .update_fields(R::COLLECTION, &update.id, fields)
                        .await
                })
            })
            .collect();

        let mut failures = Vec::new();
        for handle in batch {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => failures.push(err),
                Err(err) => failures.push(StoreError::Transport(format!(
                    "position write did not finish: {err}"
                ))),
            }
        }

        if failures.is_empty() {
            info!(collection = R::COLLECTION, writes, "positions persisted");
            return Ok(());
        }

        let failed = failures.len();
        let source = failures.swap_remove(0);
        warn!(
            collection = R::COLLECTION,
            writes,
            failed,
            error = %source,
            "position writes failed"
        );
        Err(self.reconcile(operation, confirmed, failed, source).await)
    }

    /// Drop optimistic state: re-list from the store, or fall back to the last
    /// confirmed listing if that fails too. Emits the operation's single failure notice.
    async fn reconcile(
        &self,
        operation: Operation,
        confirmed: Vec<R>,
        failed: usize,
        source: StoreError,
    ) -> SyncError {
        let resynced = match self.fetch().await {
            Ok(items) => {
                self.replace(items);
                true
            }
            Err(err) => {
                warn!(collection = R::COLLECTION, error = %err, "resync failed, restoring last confirmed order");
                self.replace(confirmed);
                false
            }
        };

        self.notifier
            .notify(Notice::failure(failure_message::<R>(operation)));
        SyncError::Store {
            operation,
            failed,
            resynced,
            source,
        }
    }

    async fn fetch(&self) -> Result<Vec<R>, StoreError> {
        self.store
            .list_ordered(R::COLLECTION, &self.order)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    fn validate<V: Validate + ?Sized>(&self, input: &V) -> Result<(), SyncError> {
        input.validate().map_err(|err| {
            self.notifier.notify(Notice::failure(err.to_string()));
            SyncError::from(err)
        })
    }

    fn fail(&self, operation: Operation, source: StoreError) -> SyncError {
        warn!(collection = R::COLLECTION, %operation, error = %source, "store call failed");
        self.notifier
            .notify(Notice::failure(failure_message::<R>(operation)));
        SyncError::store(operation, source)
    }

    fn missing(&self, operation: Operation, id: &str) -> SyncError {
        self.notifier
            .notify(Notice::failure(failure_message::<R>(operation)));
        SyncError::NotFound { id: id.to_string() }
    }

    fn replace(&self, items: Vec<R>) {
        *self.view() = items;
    }

    /// Local listing. Never held across an await.
    fn view(&self) -> MutexGuard<'_, Vec<R>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Overlay `fields` onto a record via its row form.
fn merge_fields<R: OrderedRecord>(record: &R, fields: &Row) -> Result<R, StoreError> {
    let mut row = to_row(record)?;
    for (column, value) in fields {
        row.insert(column.clone(), value.clone());
    }
    from_row(row)
}

fn position_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
