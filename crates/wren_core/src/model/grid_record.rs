//! Serialized shape of one grid.
//!
//! A grid is persisted as a single record holding its clips, cursors,
//! scroll offset, active datum list, relationship table and clipboard.
//! Bounds metadata is derived and therefore never stored.

use super::clip::{Clip, CursorRecord, CursorRole};
use super::{DatumKey, GridKey};
use crate::config::GridConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directed pairwise scores: `relationships[a][b]` is the score of `a`
/// conditioned on `b`, kept as opaque text.
pub type RelationshipTable = BTreeMap<DatumKey, BTreeMap<DatumKey, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRecord {
    pub key: GridKey,
    pub clips: Vec<Clip>,
    pub main_cursor: CursorRecord,
    pub secondary_cursor: CursorRecord,
    #[serde(default)]
    pub relationships: RelationshipTable,
    pub x_offset: i64,
    pub y_offset: i64,
    /// Ordered: ranking ties fall back to this encounter order.
    #[serde(default)]
    pub active_datums: Vec<DatumKey>,
    pub clipboard_datum_key: Option<DatumKey>,
}

impl GridRecord {
    /// Creates an empty grid record positioned per `config`.
    pub fn empty(key: impl Into<GridKey>, config: &GridConfig) -> Self {
        let key = key.into();
        let (main_x, main_y) = config.initial_main_cursor;
        let (secondary_x, secondary_y) = config.initial_secondary_cursor;
        let (x_offset, y_offset) = config.initial_offset;
        Self {
            main_cursor: CursorRecord::new(key.clone(), CursorRole::Main, main_x, main_y),
            secondary_cursor: CursorRecord::new(
                key.clone(),
                CursorRole::Secondary,
                secondary_x,
                secondary_y,
            ),
            key,
            clips: Vec::new(),
            relationships: RelationshipTable::new(),
            x_offset,
            y_offset,
            active_datums: Vec::new(),
            clipboard_datum_key: None,
        }
    }
}
