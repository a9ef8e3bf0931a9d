//! Column transforms: insert, delete, clear, archive-and-collapse.
//!
//! # Responsibility
//! - Relocate or drop whole ranges of clips in one step.
//! - Leave `Bounds` exactly consistent with the new clip set.
//!
//! # Invariants
//! - Each transform either applies fully or is a no-op.
//! - Relocation lifts every affected clip before re-placing any, so an
//!   intermediate collision means a logic bug and surfaces as `Occupied`.

use super::event::{GridEvent, TransformReport};
use super::plane::SparsePlane;
use super::{Coord, Grid, GridResult};
use crate::model::clip::Clip;
use log::{debug, info};

impl SparsePlane {
    /// Opens an empty column at `column` by sliding every clip with
    /// `x <= column` one step left.
    ///
    /// No-op when nothing sits at or left of `column`.
    pub fn insert_column(&mut self, column: i64) -> GridResult<TransformReport> {
        let sources = self.coords_where(|clip| clip.x <= column);
        if sources.is_empty() {
            return Ok(TransformReport::default());
        }

        let columns: Vec<i64> = sources.iter().map(|(x, _)| *x).collect();
        let moved = self.relocate(&sources, |(x, y)| (x - 1, y))?;

        let bounds = self.bounds_mut();
        bounds.shift_columns(&columns, -1);
        let min_x = bounds.min_x().map(|min_x| min_x - 1);
        let max_x = bounds
            .max_x()
            .map(|max_x| if max_x <= column { max_x - 1 } else { max_x });
        bounds.set_extremes(min_x, max_x);

        Ok(TransformReport {
            removed: Vec::new(),
            moved,
        })
    }

    /// Deletes every clip in `column`, then closes the gap from the left:
    /// clips with `x < column` move to `x + 1`. Columns right of `column`
    /// stay where they are.
    ///
    /// No-op when nothing sits at or left of `column`.
    pub fn delete_column(&mut self, column: i64) -> GridResult<TransformReport> {
        let doomed = self.coords_where(|clip| clip.x == column);
        let sources = self.coords_where(|clip| clip.x < column);
        if doomed.is_empty() && sources.is_empty() {
            return Ok(TransformReport::default());
        }

        let removed = self.lift(&doomed);
        self.bounds_mut().drop_column(column);

        let columns: Vec<i64> = sources.iter().map(|(x, _)| *x).collect();
        let moved = self.relocate(&sources, |(x, y)| (x + 1, y))?;

        let bounds = self.bounds_mut();
        bounds.shift_columns(&columns, 1);
        bounds.refresh_extremes();

        Ok(TransformReport { removed, moved })
    }

    /// Removes every clip of `column` without shifting anything.
    pub fn clear_column(&mut self, column: i64) -> TransformReport {
        let doomed = self.coords_where(|clip| clip.x == column);
        if doomed.is_empty() {
            return TransformReport::default();
        }
        let removed = self.lift(&doomed);
        let bounds = self.bounds_mut();
        bounds.drop_column(column);
        bounds.refresh_extremes();
        TransformReport {
            removed,
            moved: Vec::new(),
        }
    }

    /// Removes every clip referencing `datum_key` and collapses what is left.
    ///
    /// Columns are visited left to right. A column whose home-row clip
    /// (`y == 0`) references the datum is removed whole and every later
    /// column is written one step further left. Other columns are compacted
    /// towards the home row in two independent passes: rows above home
    /// outward from `-1`, then rows from `0` downward; each removal pulls the
    /// rest of its pass one row closer to home.
    pub fn archive(&mut self, datum_key: &str) -> GridResult<TransformReport> {
        let mut report = TransformReport::default();
        let mut x_shift = 0;

        for x in self.bounds().columns() {
            let Some((upper, lower)) = self.bounds().column_range(x) else {
                continue;
            };

            let home_matches = self
                .get(x, 0)
                .is_some_and(|clip| clip.datum_key == datum_key);
            if home_matches {
                let doomed = self.coords_where(|clip| clip.x == x);
                report.removed.extend(self.lift(&doomed));
                self.bounds_mut().drop_column(x);
                x_shift += 1;
                continue;
            }

            let above: Vec<i64> = (upper.min(0)..0).rev().collect();
            let below: Vec<i64> = (upper.max(0)..=lower).collect();
            let mut kept_rows: Vec<i64> = Vec::new();

            for (rows, toward_home) in [(above, 1), (below, -1)] {
                let mut y_shift = 0;
                for y in rows {
                    let Some(mut clip) = self.take_raw((x, y)) else {
                        continue;
                    };
                    if clip.datum_key == datum_key {
                        y_shift += 1;
                        report.removed.push(clip);
                        continue;
                    }
                    let target = (x - x_shift, y + toward_home * y_shift);
                    if target != (x, y) {
                        report.moved.push(((x, y), target));
                    }
                    clip.x = target.0;
                    clip.y = target.1;
                    kept_rows.push(target.1);
                    self.put_raw(clip)?;
                }
            }

            let bounds = self.bounds_mut();
            bounds.drop_column(x);
            if let (Some(new_upper), Some(new_lower)) =
                (kept_rows.iter().min(), kept_rows.iter().max())
            {
                bounds.set_column(x - x_shift, *new_upper, *new_lower);
            }
        }

        self.bounds_mut().refresh_extremes();
        report.moved.sort_unstable();
        Ok(report)
    }

    fn lift(&mut self, coords: &[Coord]) -> Vec<Clip> {
        let mut lifted: Vec<Clip> = coords
            .iter()
            .filter_map(|coord| self.take_raw(*coord))
            .collect();
        lifted.sort_by_key(Clip::coords);
        lifted
    }

    fn relocate<F>(&mut self, sources: &[Coord], target: F) -> GridResult<Vec<(Coord, Coord)>>
    where
        F: Fn(Coord) -> Coord,
    {
        let lifted = self.lift(sources);
        let mut moved = Vec::with_capacity(lifted.len());
        for mut clip in lifted {
            let from = clip.coords();
            let (x, y) = target(from);
            clip.x = x;
            clip.y = y;
            moved.push((from, (x, y)));
            self.put_raw(clip)?;
        }
        Ok(moved)
    }
}

impl Grid {
    /// Opens an empty column at absolute `column`.
    pub fn insert_column(&mut self, column: i64) -> GridResult<TransformReport> {
        let report = self.plane.insert_column(column)?;
        self.record_transform("insert_column", column, &report);
        Ok(report)
    }

    /// Deletes absolute `column` and closes the gap from the left.
    pub fn delete_column(&mut self, column: i64) -> GridResult<TransformReport> {
        let report = self.plane.delete_column(column)?;
        self.record_transform("delete_column", column, &report);
        Ok(report)
    }

    /// Empties absolute `column` in place.
    pub fn clear_column(&mut self, column: i64) -> TransformReport {
        let report = self.plane.clear_column(column);
        self.record_transform("clear_column", column, &report);
        report
    }

    /// Archives a datum: removes its clips, collapses the plane, and drops
    /// it from the active set.
    pub fn archive(&mut self, datum_key: &str) -> GridResult<TransformReport> {
        let report = self.plane.archive(datum_key)?;
        self.deactivate(datum_key);
        if self.clipboard() == Some(datum_key) {
            self.set_clipboard(None);
        }
        let columns_removed = report
            .removed
            .iter()
            .filter(|clip| clip.y == 0 && clip.datum_key == datum_key)
            .count();
        info!(
            "event=grid_archive module=grid status=ok removed={} moved={} columns_removed={}",
            report.removed.len(),
            report.moved.len(),
            columns_removed
        );
        if !report.is_noop() {
            self.emit(GridEvent::ClipsChanged {
                touched: report.touched(),
            });
        }
        Ok(report)
    }

    fn record_transform(&mut self, op: &'static str, column: i64, report: &TransformReport) {
        if report.is_noop() {
            debug!("event=grid_{op} module=grid status=noop column={column}");
            return;
        }
        info!(
            "event=grid_{} module=grid status=ok column={} removed={} moved={}",
            op,
            column,
            report.removed.len(),
            report.moved.len()
        );
        self.emit(GridEvent::ClipsChanged {
            touched: report.touched(),
        });
    }
}
