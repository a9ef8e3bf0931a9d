//! Selection/marker cursor movement and scrolling.
//!
//! # Invariants
//! - The selection (main) cursor is viewport-relative: its absolute position
//!   is `cursor + offset`.
//! - The marker (secondary) cursor is absolute and never scrolls the grid.
//! - Moving the selection cursor past a viewport edge scrolls by one unit
//!   and leaves the cursor on that edge.

use super::event::GridEvent;
use super::{Coord, Grid};
use crate::model::clip::CursorRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> Coord {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// What a cursor move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Moved,
    Scrolled,
}

/// Vertical jump cycle of the column-scroll command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnScroll {
    /// Next jump brings the home row back to the third viewport row.
    #[default]
    HomeRow,
    /// Next jump targets the column's bottommost clip.
    Bottom,
    /// Next jump targets the column's topmost clip.
    Top,
}

/// Viewport row the column-scroll jump aligns its target row to.
const COLUMN_SCROLL_ANCHOR_ROW: i64 = 2;

impl Grid {
    /// Moves one cursor one unit; the selection cursor scrolls at the edges.
    pub fn move_cursor(&mut self, role: CursorRole, direction: Direction) -> CursorMove {
        let (dx, dy) = direction.delta();
        let outcome = match role {
            CursorRole::Secondary => {
                self.secondary_cursor.x += dx;
                self.secondary_cursor.y += dy;
                CursorMove::Moved
            }
            CursorRole::Main => {
                let (x, y) = (self.main_cursor.x, self.main_cursor.y);
                let at_edge = match direction {
                    Direction::Left => x <= 0,
                    Direction::Right => x >= self.viewport_width - 1,
                    Direction::Up => y <= 0,
                    Direction::Down => y >= self.viewport_height - 1,
                };
                if at_edge {
                    self.x_offset += dx;
                    self.y_offset += dy;
                    CursorMove::Scrolled
                } else {
                    self.main_cursor.x += dx;
                    self.main_cursor.y += dy;
                    CursorMove::Moved
                }
            }
        };

        if outcome == CursorMove::Scrolled {
            self.emit_scroll();
        }
        self.emit(GridEvent::CursorChanged { role });
        outcome
    }

    /// Places the selection cursor at viewport `(x, y)`.
    pub fn set_main_cursor(&mut self, screen_x: i64, screen_y: i64) {
        self.main_cursor.x = screen_x;
        self.main_cursor.y = screen_y;
        self.emit(GridEvent::CursorChanged {
            role: CursorRole::Main,
        });
    }

    /// Places the marker cursor at absolute `(x, y)`.
    pub fn set_secondary_cursor(&mut self, x: i64, y: i64) {
        self.secondary_cursor.x = x;
        self.secondary_cursor.y = y;
        self.emit(GridEvent::CursorChanged {
            role: CursorRole::Secondary,
        });
    }

    /// Shifts the scroll offset; the selection cursor keeps its viewport cell.
    pub fn scroll_by(&mut self, delta_x: i64, delta_y: i64) {
        if delta_x == 0 && delta_y == 0 {
            return;
        }
        self.x_offset += delta_x;
        self.y_offset += delta_y;
        self.emit_scroll();
    }

    /// Scrolls so the selection cursor's absolute cell is drawn at viewport
    /// `(screen_x, screen_y)`, and moves the cursor there.
    pub fn scroll_cursor_to(&mut self, screen_x: i64, screen_y: i64) {
        let delta_x = self.main_cursor.x - screen_x;
        let delta_y = self.main_cursor.y - screen_y;
        self.scroll_by(delta_x, delta_y);
        self.set_main_cursor(screen_x, screen_y);
    }

    /// Scrolls so absolute `(x, y)` is drawn at viewport `(screen_x,
    /// screen_y)` and puts the selection cursor on it.
    pub fn scroll_to(&mut self, x: i64, y: i64, screen_x: i64, screen_y: i64) {
        let (x_offset, y_offset) = (x - screen_x, y - screen_y);
        self.scroll_by(x_offset - self.x_offset, y_offset - self.y_offset);
        self.set_main_cursor(screen_x, screen_y);
    }

    /// Viewport row at the vertical middle.
    pub fn center_row(&self) -> i64 {
        self.viewport_height / 2
    }

    pub fn center_column(&self) -> i64 {
        self.viewport_width / 2
    }

    /// Advances the column-scroll cycle for the selection column and
    /// returns the state just applied.
    pub fn column_scroll(&mut self) -> ColumnScroll {
        let (column, _) = self.selection_coords();
        let applied = self.column_scroll;
        let (target_row, next) = match applied {
            ColumnScroll::HomeRow => (0, ColumnScroll::Bottom),
            ColumnScroll::Bottom => (
                self.bounds().lower_bound(column).unwrap_or(0),
                ColumnScroll::Top,
            ),
            ColumnScroll::Top => (
                self.bounds().upper_bound(column).unwrap_or(0),
                ColumnScroll::HomeRow,
            ),
        };
        let new_y_offset = target_row - COLUMN_SCROLL_ANCHOR_ROW;
        self.scroll_by(0, new_y_offset - self.y_offset);
        self.column_scroll = next;
        applied
    }

    fn emit_scroll(&mut self) {
        self.emit(GridEvent::ScrollChanged {
            x_offset: self.x_offset,
            y_offset: self.y_offset,
        });
    }
}
