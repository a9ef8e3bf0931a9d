//! Clip, column, cursor and navigation commands on the current grid.
//!
//! # Responsibility
//! - Translate selection-cursor commands into grid engine calls.
//! - Report every command as an `Outcome`; unmet preconditions mutate
//!   nothing.
//! - Persist touched records before returning.

use super::outcome::Outcome;
use super::session::{ServiceResult, Session};
use crate::grid::cursor::{ColumnScroll, CursorMove, Direction};
use crate::grid::spiral::next_free_coords;
use crate::model::clip::CursorRole;
use crate::model::DatumKey;
use crate::repo::record_store::RecordStore;
use log::info;

/// Viewport cell the find command scrolls a match to.
const FIND_ANCHOR: (i64, i64) = (2, 2);

impl<S: RecordStore> Session<S> {
    /// Creates a datum from `text` and places it at viewport `(x, y)`.
    pub fn new_datum_and_clip(
        &mut self,
        screen_x: i64,
        screen_y: i64,
        text: &str,
    ) -> ServiceResult<Outcome> {
        if self.grid().clip_at_screen(screen_x, screen_y).is_some() {
            return Ok(Outcome::failure("New Clip fail - cell is occupied"));
        }
        let (x, y) = self.grid().to_absolute(screen_x, screen_y);
        let key = self.create_datum(text)?;
        self.place_active(&key, x, y, text.chars().count())?;
        Ok(Outcome::success(format!("New Clip {}", self.datum_name(&key))))
    }

    /// Creates a datum from `text` and places it in the free cell nearest
    /// to the selection cursor.
    pub fn import_text(&mut self, text: &str) -> ServiceResult<Outcome> {
        let start = self.grid().selection_coords();
        let (x, y) = next_free_coords(start, |(x, y)| self.grid().plane().contains(x, y));
        let key = self.create_datum(text)?;
        self.place_active(&key, x, y, 0)?;
        Ok(Outcome::success(format!(
            "Import {} at ({x}, {y})",
            self.datum_name(&key)
        )))
    }

    /// Deletes the clip under the selection cursor.
    pub fn delete_clip(&mut self) -> ServiceResult<Outcome> {
        let Some(datum_key) = self.selection_datum() else {
            return Ok(Outcome::failure("Delete Clip fail - no Clip selected"));
        };
        let (x, y) = self.grid().selection_coords();
        self.grid_mut().remove_clip(x, y)?;
        self.save_grid()?;
        Ok(Outcome::success(format!(
            "Delete Clip {}",
            self.datum_name(&datum_key)
        )))
    }

    /// Puts the selected clip's datum on the clipboard.
    pub fn copy_clip(&mut self) -> ServiceResult<Outcome> {
        let Some(datum_key) = self.selection_datum() else {
            return Ok(Outcome::failure("Copy Clip fail - no Clip selected"));
        };
        self.grid_mut().set_clipboard(Some(datum_key.clone()));
        self.save_grid()?;
        Ok(Outcome::success(format!(
            "Copy Clip {}",
            self.datum_name(&datum_key)
        )))
    }

    /// Copies the selected clip's datum, then deletes the clip.
    pub fn cut_clip(&mut self) -> ServiceResult<Outcome> {
        let Some(datum_key) = self.selection_datum() else {
            return Ok(Outcome::failure("Cut Clip fail - no Clip selected"));
        };
        let (x, y) = self.grid().selection_coords();
        let grid = self.grid_mut();
        grid.set_clipboard(Some(datum_key.clone()));
        grid.remove_clip(x, y)?;
        self.save_grid()?;
        Ok(Outcome::success(format!(
            "Cut Clip {}",
            self.datum_name(&datum_key)
        )))
    }

    /// Places a fresh clip of the clipboard datum under the selection
    /// cursor, replacing whatever clip sits there.
    pub fn paste_clip(&mut self) -> ServiceResult<Outcome> {
        let Some(datum_key) = self.grid().clipboard().map(str::to_string) else {
            return Ok(Outcome::failure("Paste fail - clipboard is empty"));
        };
        let (x, y) = self.grid().selection_coords();
        if self.grid().clip_at(x, y).is_some() {
            self.grid_mut().remove_clip(x, y)?;
        }
        self.place_active(&datum_key, x, y, 0)?;
        Ok(Outcome::success(format!(
            "Paste Clip {}",
            self.datum_name(&datum_key)
        )))
    }

    /// Opens an empty column at the selection cursor's column.
    pub fn insert_cursor_column(&mut self) -> ServiceResult<Outcome> {
        let (column, _) = self.grid().selection_coords();
        let report = self.grid_mut().insert_column(column)?;
        if report.is_noop() {
            return Ok(Outcome::success(format!(
                "Insert Column {column} - nothing to shift"
            )));
        }
        self.save_grid()?;
        Ok(Outcome::success(format!("Insert Column {column}")))
    }

    /// Deletes the selection cursor's column.
    pub fn delete_cursor_column(&mut self) -> ServiceResult<Outcome> {
        let (column, _) = self.grid().selection_coords();
        let report = self.grid_mut().delete_column(column)?;
        if report.is_noop() {
            return Ok(Outcome::success(format!(
                "Delete Column {column} - nothing to delete"
            )));
        }
        self.save_grid()?;
        Ok(Outcome::success(format!(
            "Delete Column {column} - removed {}",
            report.removed.len()
        )))
    }

    /// Archives the selected clip's datum across the whole grid.
    pub fn archive_selection(&mut self) -> ServiceResult<Outcome> {
        let Some(datum_key) = self.selection_datum() else {
            return Ok(Outcome::failure(
                "Archive fail - select a Clip to archive its Datum",
            ));
        };
        let report = self.grid_mut().archive(&datum_key)?;
        self.save_grid()?;
        Ok(Outcome::success(format!(
            "Archive {} - removed {} clips",
            self.datum_name(&datum_key),
            report.removed.len()
        )))
    }

    /// Moves one cursor one unit.
    pub fn move_cursor(&mut self, role: CursorRole, direction: Direction) -> ServiceResult<Outcome> {
        let movement = self.grid_mut().move_cursor(role, direction);
        self.save_grid()?;
        let suffix = match movement {
            CursorMove::Moved => "",
            CursorMove::Scrolled => " (scrolled)",
        };
        Ok(Outcome::success(format!(
            "{} {}{suffix}",
            role.label(),
            direction.label()
        )))
    }

    /// Scrolls the viewport by a delta.
    pub fn scroll(&mut self, delta_x: i64, delta_y: i64) -> ServiceResult<Outcome> {
        self.grid_mut().scroll_by(delta_x, delta_y);
        self.save_grid()?;
        Ok(Outcome::success(format!("scroll ({delta_x}, {delta_y})")))
    }

    /// Scrolls so the selection sits at the left edge, vertically centered.
    pub fn scroll_cursor_left(&mut self) -> ServiceResult<Outcome> {
        let row = self.grid().center_row();
        self.scroll_cursor_to(0, row, "left")
    }

    /// Scrolls so the selection sits at the viewport center.
    pub fn scroll_cursor_center(&mut self) -> ServiceResult<Outcome> {
        let (column, row) = (self.grid().center_column(), self.grid().center_row());
        self.scroll_cursor_to(column, row, "center")
    }

    /// Scrolls so the selection sits at the right edge, vertically centered.
    pub fn scroll_cursor_right(&mut self) -> ServiceResult<Outcome> {
        let (width, _) = self.grid().viewport();
        let row = self.grid().center_row();
        self.scroll_cursor_to(width - 1, row, "right")
    }

    /// Cycles the selection column's vertical position: home row, bottom,
    /// top.
    pub fn column_scroll(&mut self) -> ServiceResult<Outcome> {
        let applied = self.grid_mut().column_scroll();
        self.save_grid()?;
        let label = match applied {
            ColumnScroll::HomeRow => "Home Row",
            ColumnScroll::Bottom => "Bottom",
            ColumnScroll::Top => "Top",
        };
        Ok(Outcome::success(format!("Column Scroll - {label}")))
    }

    /// Finds the first active datum whose content equals `text` and scrolls
    /// its clip into view.
    pub fn find(&mut self, text: &str) -> ServiceResult<Outcome> {
        if text.is_empty() {
            return Ok(Outcome::failure("Find fail - nothing to find"));
        }
        let mut found: Option<DatumKey> = None;
        for key in self.grid().active_datums().to_vec() {
            if self.datum(&key)?.content == text {
                found = Some(key);
                break;
            }
        }
        let Some(datum_key) = found else {
            return Ok(Outcome::failure("Find fail - no match"));
        };
        let target = self
            .grid()
            .plane()
            .sorted_clips()
            .into_iter()
            .find(|clip| clip.datum_key == datum_key)
            .map(|clip| clip.coords());
        let Some((x, y)) = target else {
            return Ok(Outcome::failure("Find fail - match has no Clip"));
        };
        self.grid_mut().scroll_to(x, y, FIND_ANCHOR.0, FIND_ANCHOR.1);
        self.save_grid()?;
        Ok(Outcome::success(format!(
            "Found {}",
            self.datum_name(&datum_key)
        )))
    }

    /// Makes the marker's datum the selection datum's parent, or clears the
    /// parent when it already is.
    pub fn cycle_parentage(&mut self) -> ServiceResult<Outcome> {
        let (Some(selection_key), Some(marker_key)) = (
            self.selection_datum(),
            self.grid().marker_clip().map(|clip| clip.datum_key.clone()),
        ) else {
            return Ok(Outcome::failure(
                "Set Parentage fail - put Selection and Marker on Clips",
            ));
        };

        let selection_name = self.datum_name(&selection_key);
        let marker_name = self.datum_name(&marker_key);
        let selection = self.datum_mut(&selection_key)?;
        let message = if selection.parent.as_deref() == Some(marker_key.as_str()) {
            selection.parent = None;
            format!("Set Parentage - Selection ({selection_name}) now has no Parent")
        } else {
            selection.parent = Some(marker_key);
            format!(
                "Set Parentage - Marker ({marker_name}) is now Selection's ({selection_name}) Parent"
            )
        };
        self.save_datum(&selection_key)?;
        Ok(Outcome::success(message))
    }

    /// Stores where text editing of the selected clip resumes.
    pub fn set_selection_edit_position(&mut self, position: usize) -> ServiceResult<Outcome> {
        let (x, y) = self.grid().selection_coords();
        if self.grid().clip_at(x, y).is_none() {
            return Ok(Outcome::failure("Edit fail - no Clip selected"));
        }
        self.grid_mut().set_edit_cursor_position(x, y, position)?;
        self.save_grid()?;
        Ok(Outcome::success("Editing Clip"))
    }

    /// Replaces the selected clip's datum content.
    pub fn edit_selection_text(&mut self, text: &str) -> ServiceResult<Outcome> {
        let Some(datum_key) = self.selection_datum() else {
            return Ok(Outcome::failure("Edit fail - no Clip selected"));
        };
        self.set_datum_content(&datum_key, text)?;
        Ok(Outcome::success(format!(
            "Edit Clip {}",
            self.datum_name(&datum_key)
        )))
    }

    /// Stores the directed score of `a` conditioned on `b`.
    pub fn set_relationship(&mut self, a: &str, b: &str, score: &str) -> ServiceResult<()> {
        self.grid_mut().set_relationship(a, b, score);
        self.save_grid()
    }

    pub(crate) fn selection_datum(&self) -> Option<DatumKey> {
        self.grid()
            .selection_clip()
            .map(|clip| clip.datum_key.clone())
    }

    fn place_active(
        &mut self,
        datum_key: &str,
        x: i64,
        y: i64,
        edit_cursor_position: usize,
    ) -> ServiceResult<()> {
        let grid = self.grid_mut();
        grid.activate(datum_key);
        grid.place_clip(datum_key, x, y, edit_cursor_position)?;
        self.save_grid()?;
        info!("event=clip_place module=service status=ok x={x} y={y}");
        Ok(())
    }

    fn scroll_cursor_to(
        &mut self,
        screen_x: i64,
        screen_y: i64,
        label: &str,
    ) -> ServiceResult<Outcome> {
        self.grid_mut().scroll_cursor_to(screen_x, screen_y);
        self.save_grid()?;
        Ok(Outcome::success(format!("Scroll Selection {label}")))
    }
}

