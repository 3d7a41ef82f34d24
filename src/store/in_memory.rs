//! InMemoryRecordStore - HashMap-backed row store for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    ChangeEvent, ChangeFeed, ChangeKind, ChangeStream, OrderBy, RecordStore, Row, StoreError,
};

const FEED_CAPACITY: usize = 256;

/// In-memory row store backed by a map of collection name to rows.
///
/// Assigns UUID v4 ids, stamps `created_at`/`updated_at`, and publishes a
/// [`ChangeEvent`] after every successful write. Clone-friendly via Arc;
/// clones share rows and the change feed.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    /// Raw rows of a collection in insertion order.
    pub fn rows(&self, collection: &str) -> Vec<Row> {
        self.tables
            .read()
            .map(|tables| tables.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn publish(&self, collection: &str, kind: ChangeKind, id: &str) {
        // No subscribers is fine.
        let _ = self.changes.send(ChangeEvent::new(collection, kind, id));
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_ordered(
        &self,
        collection: &str,
        order: &OrderBy,
    ) -> Result<Vec<Row>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Poisoned("list"))?;

        let mut rows = tables.get(collection).cloned().unwrap_or_default();
        rows.sort_by(|a, b| {
            let ordering = compare_columns(a.get(&order.column), b.get(&order.column));
            if order.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        Ok(rows)
    }

    async fn insert(&self, collection: &str, mut row: Row) -> Result<Row, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Value::String(Utc::now().to_rfc3339());

        row.insert("id".into(), Value::String(id.clone()));
        row.entry("created_at").or_insert_with(|| now.clone());
        row.insert("updated_at".into(), now);

        {
            let mut tables = self
                .tables
                .write()
                .map_err(|_| StoreError::Poisoned("insert"))?;
            tables
                .entry(collection.to_string())
                .or_default()
                .push(row.clone());
        }

        self.publish(collection, ChangeKind::Insert, &id);
        Ok(row)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Row,
    ) -> Result<(), StoreError> {
        if let Some(new_id) = fields.get("id") {
            if new_id.as_str() != Some(id) {
                return Err(StoreError::Constraint(format!(
                    "{collection}.id is immutable"
                )));
            }
        }

        {
            let mut tables = self
                .tables
                .write()
                .map_err(|_| StoreError::Poisoned("update"))?;

            let row = tables
                .get_mut(collection)
                .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;

            for (column, value) in fields {
                row.insert(column, value);
            }
            row.insert("updated_at".into(), Value::String(Utc::now().to_rfc3339()));
        }

        self.publish(collection, ChangeKind::Update, id);
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        {
            let mut tables = self
                .tables
                .write()
                .map_err(|_| StoreError::Poisoned("delete"))?;

            let rows = tables.get_mut(collection);
            let index = rows
                .as_ref()
                .and_then(|rows| rows.iter().position(|row| row_id(row) == Some(id)));

            match (rows, index) {
                (Some(rows), Some(index)) => {
                    rows.remove(index);
                }
                _ => {
                    return Err(StoreError::NotFound {
                        collection: collection.to_string(),
                        id: id.to_string(),
                    })
                }
            }
        }

        self.publish(collection, ChangeKind::Delete, id);
        Ok(())
    }
}

impl ChangeFeed for InMemoryRecordStore {
    fn subscribe(&self, collection: &str) -> ChangeStream {
        ChangeStream::new(collection, self.changes.subscribe())
    }
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Ascending column order: numbers, then strings, then booleans; nulls last.
fn compare_columns(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}
