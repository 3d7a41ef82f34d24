//! Records - typed rows with a home collection.
//!
//! ## Example
//!
//! ```ignore
//! use menu_admin::{OrderedRecord, Record};
//!
//! #[derive(Clone, Serialize, Deserialize, Record, OrderedRecord)]
//! #[record(collection = "menu_items")]
//! struct MenuItem {
//!     pub id: String,
//!     pub name: String,
//!     pub sort_order: u32,
//!     pub active: bool,
//! }
//!
//! let items = store.records::<MenuItem>().list(&OrderBy::asc("sort_order")).await?;
//! ```

mod collection;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::store::{Row, StoreError};

/// Trait for types stored as rows of a named collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection (table) this record lives in, e.g. `"menu_items"`.
    const COLLECTION: &'static str;

    /// Human label used in notices ("Item added", "Branch deleted").
    const LABEL: &'static str = "Item";

    /// Store-assigned identifier. Never changes and is never reused.
    fn id(&self) -> &str;
}

/// A record with a manual, dense, zero-based position and an active flag.
///
/// Within a synchronized collection of N records the positions are exactly
/// `0..N`. Reordering only ever touches the position field.
pub trait OrderedRecord: Record {
    /// Column holding the position.
    const POSITION_FIELD: &'static str = "sort_order";

    /// Column holding the active flag.
    const ACTIVE_FIELD: &'static str = "active";

    fn position(&self) -> u32;

    fn set_position(&mut self, position: u32);

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);
}

/// Serialize a value that must encode as a JSON object.
pub fn to_row<T: Serialize + ?Sized>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::Serde(format!(
            "expected an object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode a stored row into a typed record.
pub fn from_row<R: Record>(row: Row) -> Result<R, StoreError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub use collection::{Records, RecordsExt};
