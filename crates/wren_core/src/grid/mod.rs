//! Grid engine: sparse plane, bounds, cursors, column transforms, ranking.
//!
//! # Responsibility
//! - Own one grid's clips, cursors, scroll offset, active datums,
//!   relationship table and clipboard.
//! - Apply mutations atomically with respect to plane invariants and
//!   queue a `GridEvent` for each.
//!
//! # Invariants
//! - One clip per absolute coordinate.
//! - Bounds equal the brute-force extremes of the clip set after every
//!   public call returns.
//! - Every clip references a datum in the active set.
//! - The clipboard holds a datum key, never a clip key.
//!
//! Persistence is the caller's job: `to_record()` after a mutation.

pub mod bounds;
pub mod cursor;
pub mod event;
pub mod plane;
pub mod rank;
pub mod spiral;
pub mod transform;

use crate::config::GridConfig;
use crate::model::clip::{Clip, CursorRecord, CursorRole};
use crate::model::grid_record::{GridRecord, RelationshipTable};
use crate::model::{DatumKey, GridKey};
use bounds::Bounds;
use cursor::ColumnScroll;
use event::GridEvent;
use plane::SparsePlane;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Absolute plane coordinate `(x, y)`; `y` grows downwards.
pub type Coord = (i64, i64);

pub type GridResult<T> = Result<T, GridError>;

/// Invariant violations. These indicate a logic bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Occupied { x: i64, y: i64 },
    Vacant { x: i64, y: i64 },
    InactiveDatum(DatumKey),
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Occupied { x, y } => write!(f, "coordinate ({x}, {y}) already holds a clip"),
            Self::Vacant { x, y } => write!(f, "coordinate ({x}, {y}) holds no clip"),
            Self::InactiveDatum(key) => write!(f, "datum is not active in this grid: {key}"),
        }
    }
}

impl Error for GridError {}

/// Live grid state.
#[derive(Debug, Clone)]
pub struct Grid {
    key: GridKey,
    plane: SparsePlane,
    x_offset: i64,
    y_offset: i64,
    main_cursor: CursorRecord,
    secondary_cursor: CursorRecord,
    viewport_width: i64,
    viewport_height: i64,
    active_datums: Vec<DatumKey>,
    relationships: RelationshipTable,
    clipboard_datum_key: Option<DatumKey>,
    column_scroll: ColumnScroll,
    events: Vec<GridEvent>,
}

impl Grid {
    /// Creates an empty grid placed per `config`.
    pub fn new(key: impl Into<GridKey>, config: &GridConfig) -> Self {
        let record = GridRecord::empty(key, config);
        Self::assemble(record, SparsePlane::new(), config)
    }

    /// Rebuilds a live grid from its persisted record.
    ///
    /// Bounds are recomputed from the clip set.
    ///
    /// # Errors
    /// - `Occupied` when two persisted clips share a coordinate.
    /// - `InactiveDatum` when a clip references a datum outside the active set.
    pub fn from_record(mut record: GridRecord, config: &GridConfig) -> GridResult<Self> {
        let clips = std::mem::take(&mut record.clips);
        if let Some(orphan) = clips
            .iter()
            .find(|clip| !record.active_datums.contains(&clip.datum_key))
        {
            return Err(GridError::InactiveDatum(orphan.datum_key.clone()));
        }
        let plane = SparsePlane::from_clips(clips)?;
        Ok(Self::assemble(record, plane, config))
    }

    fn assemble(record: GridRecord, plane: SparsePlane, config: &GridConfig) -> Self {
        Self {
            key: record.key,
            plane,
            x_offset: record.x_offset,
            y_offset: record.y_offset,
            main_cursor: record.main_cursor,
            secondary_cursor: record.secondary_cursor,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            active_datums: record.active_datums,
            relationships: record.relationships,
            clipboard_datum_key: record.clipboard_datum_key,
            column_scroll: ColumnScroll::default(),
            events: Vec::new(),
        }
    }

    /// Snapshot for persistence; clips ordered by `(x, y)`.
    pub fn to_record(&self) -> GridRecord {
        GridRecord {
            key: self.key.clone(),
            clips: self.plane.sorted_clips().into_iter().cloned().collect(),
            main_cursor: self.main_cursor.clone(),
            secondary_cursor: self.secondary_cursor.clone(),
            relationships: self.relationships.clone(),
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            active_datums: self.active_datums.clone(),
            clipboard_datum_key: self.clipboard_datum_key.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn plane(&self) -> &SparsePlane {
        &self.plane
    }

    pub fn bounds(&self) -> &Bounds {
        self.plane.bounds()
    }

    pub fn offset(&self) -> (i64, i64) {
        (self.x_offset, self.y_offset)
    }

    pub fn viewport(&self) -> (i64, i64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Viewport row on which absolute row 0 is drawn.
    pub fn home_row_screen_y(&self) -> i64 {
        -self.y_offset
    }

    pub fn to_absolute(&self, screen_x: i64, screen_y: i64) -> Coord {
        (screen_x + self.x_offset, screen_y + self.y_offset)
    }

    pub fn to_screen(&self, x: i64, y: i64) -> Coord {
        (x - self.x_offset, y - self.y_offset)
    }

    pub fn clip_at(&self, x: i64, y: i64) -> Option<&Clip> {
        self.plane.get(x, y)
    }

    pub fn clip_at_screen(&self, screen_x: i64, screen_y: i64) -> Option<&Clip> {
        let (x, y) = self.to_absolute(screen_x, screen_y);
        self.plane.get(x, y)
    }

    /// Clip under the selection cursor.
    pub fn selection_clip(&self) -> Option<&Clip> {
        self.clip_at_screen(self.main_cursor.x, self.main_cursor.y)
    }

    /// Clip under the marker cursor.
    pub fn marker_clip(&self) -> Option<&Clip> {
        self.plane.get(self.secondary_cursor.x, self.secondary_cursor.y)
    }

    pub fn main_cursor(&self) -> &CursorRecord {
        &self.main_cursor
    }

    pub fn secondary_cursor(&self) -> &CursorRecord {
        &self.secondary_cursor
    }

    pub fn cursor(&self, role: CursorRole) -> &CursorRecord {
        match role {
            CursorRole::Main => &self.main_cursor,
            CursorRole::Secondary => &self.secondary_cursor,
        }
    }

    /// Absolute coordinate under the selection cursor.
    pub fn selection_coords(&self) -> Coord {
        self.to_absolute(self.main_cursor.x, self.main_cursor.y)
    }

    pub fn active_datums(&self) -> &[DatumKey] {
        &self.active_datums
    }

    pub fn is_active(&self, datum_key: &str) -> bool {
        self.active_datums.iter().any(|key| key == datum_key)
    }

    /// Adds a datum to the active set; returns whether it was new.
    pub fn activate(&mut self, datum_key: &str) -> bool {
        if self.is_active(datum_key) {
            return false;
        }
        self.active_datums.push(datum_key.to_string());
        true
    }

    /// Drops a datum from the active set; returns whether it was present.
    pub(crate) fn deactivate(&mut self, datum_key: &str) -> bool {
        let before = self.active_datums.len();
        self.active_datums.retain(|key| key != datum_key);
        before != self.active_datums.len()
    }

    /// Places a new clip for an active datum at absolute `(x, y)`.
    pub fn place_clip(
        &mut self,
        datum_key: &str,
        x: i64,
        y: i64,
        edit_cursor_position: usize,
    ) -> GridResult<&Clip> {
        if !self.is_active(datum_key) {
            return Err(GridError::InactiveDatum(datum_key.to_string()));
        }
        let clip = Clip::new(self.key.clone(), datum_key, x, y, edit_cursor_position);
        self.plane.place(clip)?;
        self.emit(GridEvent::ClipsChanged {
            touched: vec![(x, y)],
        });
        self.plane.get(x, y).ok_or(GridError::Vacant { x, y })
    }

    /// Removes the clip at absolute `(x, y)`.
    pub fn remove_clip(&mut self, x: i64, y: i64) -> GridResult<Clip> {
        let clip = self.plane.remove(x, y)?;
        self.emit(GridEvent::ClipsChanged {
            touched: vec![(x, y)],
        });
        Ok(clip)
    }

    /// Stores the text offset where editing of the clip at `(x, y)` resumes.
    pub fn set_edit_cursor_position(&mut self, x: i64, y: i64, position: usize) -> GridResult<()> {
        let clip = self.plane.get_mut(x, y).ok_or(GridError::Vacant { x, y })?;
        clip.edit_cursor_position = position;
        Ok(())
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard_datum_key.as_deref()
    }

    pub fn set_clipboard(&mut self, datum_key: Option<DatumKey>) {
        self.clipboard_datum_key = datum_key;
    }

    pub fn relationships(&self) -> &RelationshipTable {
        &self.relationships
    }

    /// Score of `a` conditioned on `b`, as stored.
    pub fn relationship(&self, a: &str, b: &str) -> Option<&str> {
        self.relationships
            .get(a)
            .and_then(|row| row.get(b))
            .map(String::as_str)
    }

    pub fn set_relationship(&mut self, a: &str, b: &str, score: impl Into<String>) {
        self.relationships
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), score.into());
    }

    /// Takes every queued change notification.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GridEvent) {
        self.events.push(event);
    }
}
