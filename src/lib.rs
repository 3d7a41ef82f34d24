//! Manually ordered record collections over a hosted row store.
//!
//! The admin dashboard of a food brand keeps its menu in a hand-picked order.
//! This crate holds that order locally, applies moves optimistically, and
//! persists them as the fewest possible position writes, re-listing from the
//! store whenever a write fails.
//!
//! - [`ordering`] plans moves and swaps (pure, synchronous)
//! - [`OrderedCollection`] applies and persists them (async, single-flight)
//! - [`LiveCollection`] follows a realtime change feed for inbox-style views
//! - [`RecordStore`] / [`ChangeFeed`] are the injected backend

extern crate self as menu_admin;

mod config;
mod domain;
mod live;
mod notify;
mod record;
mod store;
mod sync;
pub mod validate;

pub mod ordering;

pub use config::{ConfigError, StoreConfig};
pub use domain::{
    live_announcements, Announcement, AnnouncementDraft, BlogPost, BlogPostDraft, ContactInfo,
    ContactInfoPatch, ContactMessage, ContactMessageDraft, DashboardStats, DashboardStatsPatch,
    MenuItem, MenuItemDraft, MenuItemPatch, ReadFlag, ShopBranch, ShopBranchDraft, SocialLink,
    SocialLinkDraft,
};
pub use live::LiveCollection;
#[cfg(feature = "emitter")]
pub use notify::EmitterNotifier;
pub use notify::{LogNotifier, Notice, Notifier};
pub use ordering::{Direction, MoveOutcome, NoOp, PositionUpdate, Reorder};
pub use record::{from_row, to_row, OrderedRecord, Record, Records, RecordsExt};
pub use store::{
    ChangeEvent, ChangeFeed, ChangeKind, ChangeStream, InMemoryRecordStore, OrderBy,
    RecordStore, Row, StoreError,
};
#[cfg(feature = "http")]
pub use store::RestRecordStore;
pub use sync::{Operation, OrderedCollection, SyncError};
pub use validate::{Validate, ValidationError};

// Derive macros share their trait's name.
pub use menu_admin_macros::{OrderedRecord, Record};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
