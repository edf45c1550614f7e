//! Storage layer for oneiro: dreams, messages, profiles, subscriptions.
//!
//! One async trait ([`RecordStore`]) fronting a PostgreSQL backend.
//! Quota admission is re-checked inside the dream-insert transaction so
//! two near-simultaneous requests cannot both consume the last free slot.

mod error;
mod pg_migrations;
mod pg_storage;
mod traits;

pub use error::StorageError;
pub use pg_storage::PgStorage;
pub use traits::{DreamWriteOutcome, RecordStore};
