//! Clip and cursor records stored inside a grid.
//!
//! # Invariants
//! - Clip and cursor coordinates are plane coordinates, except the main
//!   cursor whose `x`/`y` are viewport-relative (see `grid::cursor`).
//! - A clip references its datum by key and never owns it.

use super::{new_key, ClipKey, DatumKey, GridKey, RecordKey};
use serde::{Deserialize, Serialize};

/// Placement of one datum at an absolute plane coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub key: ClipKey,
    pub grid_key: GridKey,
    pub datum_key: DatumKey,
    pub x: i64,
    pub y: i64,
    /// Offset into the datum content where text editing resumes.
    pub edit_cursor_position: usize,
}

impl Clip {
    /// Creates a clip with a generated key.
    pub fn new(
        grid_key: impl Into<GridKey>,
        datum_key: impl Into<DatumKey>,
        x: i64,
        y: i64,
        edit_cursor_position: usize,
    ) -> Self {
        Self {
            key: new_key(),
            grid_key: grid_key.into(),
            datum_key: datum_key.into(),
            x,
            y,
            edit_cursor_position,
        }
    }

    pub fn coords(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}

/// Which of the two grid cursors a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorRole {
    /// Selection cursor, stored in viewport-relative coordinates.
    Main,
    /// Marker cursor, stored in absolute plane coordinates.
    Secondary,
}

impl CursorRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "Selection",
            Self::Secondary => "Marker",
        }
    }
}

/// Persisted cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorRecord {
    pub key: RecordKey,
    pub grid_key: GridKey,
    pub role: CursorRole,
    pub x: i64,
    pub y: i64,
}

impl CursorRecord {
    pub fn new(grid_key: impl Into<GridKey>, role: CursorRole, x: i64, y: i64) -> Self {
        Self {
            key: new_key(),
            grid_key: grid_key.into(),
            role,
            x,
            y,
        }
    }
}
