//! Change notifications for the presentation layer.
//!
//! Grid mutations append events to a queue owned by the grid; a viewer
//! drains the queue after each command and re-renders what changed.

use super::Coord;
use crate::model::clip::{Clip, CursorRole};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// Clips appeared, vanished or moved at these absolute coordinates.
    ClipsChanged { touched: Vec<Coord> },
    CursorChanged { role: CursorRole },
    /// Scroll offset changed; every visible cell may have changed.
    ScrollChanged { x_offset: i64, y_offset: i64 },
}

/// Outcome of one column transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Clips deleted from the plane.
    pub removed: Vec<Clip>,
    /// `(from, to)` for every relocated clip.
    pub moved: Vec<(Coord, Coord)>,
}

impl TransformReport {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.moved.is_empty()
    }

    /// Sorted, de-duplicated coordinates whose content changed.
    pub fn touched(&self) -> Vec<Coord> {
        let mut touched = BTreeSet::new();
        touched.extend(self.removed.iter().map(Clip::coords));
        for (from, to) in &self.moved {
            touched.insert(*from);
            touched.insert(*to);
        }
        touched.into_iter().collect()
    }
}
