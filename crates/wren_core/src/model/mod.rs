//! Persisted domain model for the grid workspace.
//!
//! # Responsibility
//! - Define the records the store keeps: datums, grids (with clips and
//!   cursors) and the application root.
//! - Provide the closed `Record` sum type used to tag persisted kinds.
//!
//! # Invariants
//! - Every record is identified by a stable string key.
//! - Datums are never physically deleted by core code; archival only drops
//!   them from a grid's active set.

pub mod application;
pub mod clip;
pub mod datum;
pub mod grid_record;
pub mod record;

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Key of any persisted record.
pub type RecordKey = String;
/// Key of a `Datum` record.
pub type DatumKey = String;
/// Key of a grid record.
pub type GridKey = String;
/// Key of a clip inside a grid record.
pub type ClipKey = String;

/// Generates a fresh record key (uuid v4, simple hex form).
pub fn new_key() -> RecordKey {
    Uuid::new_v4().simple().to_string()
}

/// Current wall clock as unix epoch milliseconds.
///
/// Falls back to `0` when the clock reads earlier than the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
