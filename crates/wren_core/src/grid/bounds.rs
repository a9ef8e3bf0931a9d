//! Occupied-range bookkeeping for the sparse plane.
//!
//! # Responsibility
//! - Track the leftmost/rightmost occupied column.
//! - Track, per occupied column, the topmost (`upper`) and bottommost
//!   (`lower`) occupied row.
//!
//! # Invariants
//! - A column is present in `upper` iff it is present in `lower` iff it holds
//!   at least one clip.
//! - `min_x`/`max_x` are `None` exactly when no column is present, and equal
//!   the smallest/largest present column otherwise.
//! - `upper[x] <= lower[x]`, both equal to the true extremes of column `x`.

use super::Coord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bounds {
    min_x: Option<i64>,
    max_x: Option<i64>,
    upper: HashMap<i64, i64>,
    lower: HashMap<i64, i64>,
}

impl Bounds {
    /// Recomputes bounds from scratch over a set of occupied coordinates.
    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut bounds = Self::default();
        for (x, y) in coords {
            bounds.on_place(x, y);
        }
        bounds
    }

    pub fn min_x(&self) -> Option<i64> {
        self.min_x
    }

    pub fn max_x(&self) -> Option<i64> {
        self.max_x
    }

    /// Smallest (most negative, visually topmost) occupied row of column `x`.
    pub fn upper_bound(&self, x: i64) -> Option<i64> {
        self.upper.get(&x).copied()
    }

    /// Largest (visually bottommost) occupied row of column `x`.
    pub fn lower_bound(&self, x: i64) -> Option<i64> {
        self.lower.get(&x).copied()
    }

    /// `(upper, lower)` row range of column `x`, when occupied.
    pub fn column_range(&self, x: i64) -> Option<(i64, i64)> {
        Some((self.upper_bound(x)?, self.lower_bound(x)?))
    }

    pub fn has_column(&self, x: i64) -> bool {
        self.upper.contains_key(&x)
    }

    /// Occupied columns in ascending order.
    pub fn columns(&self) -> Vec<i64> {
        let mut columns: Vec<i64> = self.upper.keys().copied().collect();
        columns.sort_unstable();
        columns
    }

    /// Records a clip placed at `(x, y)`.
    pub fn on_place(&mut self, x: i64, y: i64) {
        self.min_x = Some(self.min_x.map_or(x, |min_x| min_x.min(x)));
        self.max_x = Some(self.max_x.map_or(x, |max_x| max_x.max(x)));
        self.upper
            .entry(x)
            .and_modify(|upper| *upper = (*upper).min(y))
            .or_insert(y);
        self.lower
            .entry(x)
            .and_modify(|lower| *lower = (*lower).max(y))
            .or_insert(y);
    }

    /// Records a clip removed from `(x, y)`.
    ///
    /// `occupied` must already exclude the removed coordinate. Rescans the
    /// column when an extreme row was removed, and every coordinate when the
    /// column emptied at `min_x`/`max_x`.
    pub fn on_remove<V>(&mut self, x: i64, y: i64, occupied: &HashMap<Coord, V>) {
        let Some((upper, lower)) = self.column_range(x) else {
            return;
        };

        if y == upper || y == lower {
            let rows = occupied
                .keys()
                .filter(|(cx, _)| *cx == x)
                .map(|(_, cy)| *cy);
            let (mut new_upper, mut new_lower) = (None::<i64>, None::<i64>);
            for row in rows {
                new_upper = Some(new_upper.map_or(row, |value| value.min(row)));
                new_lower = Some(new_lower.map_or(row, |value| value.max(row)));
            }
            match (new_upper, new_lower) {
                (Some(new_upper), Some(new_lower)) => {
                    self.upper.insert(x, new_upper);
                    self.lower.insert(x, new_lower);
                }
                _ => {
                    self.upper.remove(&x);
                    self.lower.remove(&x);
                }
            }
        }

        if self.has_column(x) {
            return;
        }
        if self.min_x == Some(x) {
            self.min_x = occupied.keys().map(|(cx, _)| *cx).min();
        }
        if self.max_x == Some(x) {
            self.max_x = occupied.keys().map(|(cx, _)| *cx).max();
        }
    }

    /// Forgets column `x` entirely; extremes are left to the caller.
    pub(super) fn drop_column(&mut self, x: i64) {
        self.upper.remove(&x);
        self.lower.remove(&x);
    }

    /// Renames the bounds of each listed column `x` to `x + delta`.
    ///
    /// Columns are processed in the order that never overwrites a column
    /// still waiting to move. Extremes are left to the caller.
    pub(super) fn shift_columns(&mut self, columns: &[i64], delta: i64) {
        let mut ordered = columns.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        if delta > 0 {
            ordered.reverse();
        }
        for x in ordered {
            if let (Some(upper), Some(lower)) = (self.upper.remove(&x), self.lower.remove(&x)) {
                self.upper.insert(x + delta, upper);
                self.lower.insert(x + delta, lower);
            }
        }
    }

    /// Replaces the row range of column `x`.
    pub(super) fn set_column(&mut self, x: i64, upper: i64, lower: i64) {
        self.upper.insert(x, upper);
        self.lower.insert(x, lower);
    }

    pub(super) fn set_extremes(&mut self, min_x: Option<i64>, max_x: Option<i64>) {
        self.min_x = min_x;
        self.max_x = max_x;
    }

    /// Recomputes `min_x`/`max_x` from the occupied column set.
    ///
    /// Linear in the number of occupied columns.
    pub(super) fn refresh_extremes(&mut self) {
        self.min_x = self.upper.keys().copied().min();
        self.max_x = self.upper.keys().copied().max();
    }
}
