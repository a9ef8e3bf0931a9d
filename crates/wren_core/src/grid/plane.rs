//! Sparse coordinate plane.
//!
//! # Responsibility
//! - Map absolute `(x, y)` coordinates to clips.
//! - Keep `Bounds` in step with every placement and removal.
//!
//! # Invariants
//! - At most one clip per coordinate; a clip's own `x`/`y` equal its key in
//!   the map.
//! - `bounds()` always equals `Bounds::from_coords(coords())`.

use super::bounds::Bounds;
use super::{Coord, GridError, GridResult};
use crate::model::clip::Clip;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SparsePlane {
    clips: HashMap<Coord, Clip>,
    bounds: Bounds,
}

impl SparsePlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plane from persisted clips, rejecting duplicate coordinates.
    pub fn from_clips<I>(clips: I) -> GridResult<Self>
    where
        I: IntoIterator<Item = Clip>,
    {
        let mut plane = Self::new();
        for clip in clips {
            plane.place(clip)?;
        }
        Ok(plane)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<&Clip> {
        self.clips.get(&(x, y))
    }

    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut Clip> {
        self.clips.get_mut(&(x, y))
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.clips.contains_key(&(x, y))
    }

    /// Places a clip at its own coordinates.
    ///
    /// # Errors
    /// - `GridError::Occupied` when another clip already sits there.
    pub fn place(&mut self, clip: Clip) -> GridResult<()> {
        let (x, y) = clip.coords();
        if self.clips.contains_key(&(x, y)) {
            return Err(GridError::Occupied { x, y });
        }
        self.clips.insert((x, y), clip);
        self.bounds.on_place(x, y);
        Ok(())
    }

    /// Removes and returns the clip at `(x, y)`.
    ///
    /// # Errors
    /// - `GridError::Vacant` when nothing sits there.
    pub fn remove(&mut self, x: i64, y: i64) -> GridResult<Clip> {
        let clip = self
            .clips
            .remove(&(x, y))
            .ok_or(GridError::Vacant { x, y })?;
        self.bounds.on_remove(x, y, &self.clips);
        Ok(clip)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.values()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.clips.keys().copied()
    }

    /// Clips of column `x`, top to bottom.
    pub fn column(&self, x: i64) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.values().filter(|clip| clip.x == x).collect();
        clips.sort_by_key(|clip| clip.y);
        clips
    }

    /// Every clip ordered by `(x, y)`.
    pub fn sorted_clips(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.values().collect();
        clips.sort_by_key(|clip| clip.coords());
        clips
    }

    /// Lifts a clip out without touching bounds. Transform-internal.
    pub(super) fn take_raw(&mut self, coord: Coord) -> Option<Clip> {
        self.clips.remove(&coord)
    }

    /// Puts a clip back at its own coordinates without touching bounds.
    pub(super) fn put_raw(&mut self, clip: Clip) -> GridResult<()> {
        let (x, y) = clip.coords();
        if self.clips.contains_key(&(x, y)) {
            return Err(GridError::Occupied { x, y });
        }
        self.clips.insert((x, y), clip);
        Ok(())
    }

    pub(super) fn bounds_mut(&mut self) -> &mut Bounds {
        &mut self.bounds
    }

    pub(super) fn coords_where<F>(&self, predicate: F) -> Vec<Coord>
    where
        F: Fn(&Clip) -> bool,
    {
        self.clips
            .values()
            .filter(|clip| predicate(clip))
            .map(Clip::coords)
            .collect()
    }
}
