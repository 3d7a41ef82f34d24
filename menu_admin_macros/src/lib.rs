//! Derive macros for `menu_admin` records.
//!
//! ```ignore
//! #[derive(Clone, Serialize, Deserialize, Record, OrderedRecord)]
//! #[record(collection = "menu_items", label = "Item")]
//! pub struct MenuItem {
//!     pub id: String,
//!     #[record(position)]
//!     pub sort_order: u32,
//!     #[record(active)]
//!     pub active: bool,
//! }
//! ```

mod record;

use proc_macro::TokenStream;

/// Implements `menu_admin::Record`.
///
/// Struct attribute `#[record(collection = "...", label = "...")]`; both keys are
/// optional. The id field is the one marked `#[record(id)]`, or the field named `id`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}

/// Implements `menu_admin::OrderedRecord`.
///
/// Needs a `u32` field marked `#[record(position)]` (or named `sort_order`) and a
/// `bool` field marked `#[record(active)]` (or named `active`).
#[proc_macro_derive(OrderedRecord, attributes(record))]
pub fn derive_ordered_record(input: TokenStream) -> TokenStream {
    record::derive_ordered_record(input)
}
