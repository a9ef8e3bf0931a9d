//! Next-free-slot search.
//!
//! `SpiralCoords` yields the start point, then square rings of growing
//! Chebyshev radius. Each ring starts at its top-left corner and walks the
//! top edge left to right, the right edge downwards, the bottom edge right to
//! left, then the left edge upwards, stopping just below the start corner.

use super::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Unbounded outward square spiral over integer coordinates.
#[derive(Debug, Clone)]
pub struct SpiralCoords {
    start: Coord,
    level: i64,
    cursor: Coord,
    edge: Edge,
    emitted_start: bool,
}

impl SpiralCoords {
    pub fn new(start_x: i64, start_y: i64) -> Self {
        Self {
            start: (start_x, start_y),
            level: 1,
            cursor: (start_x - 1, start_y - 1),
            edge: Edge::Top,
            emitted_start: false,
        }
    }
}

impl Iterator for SpiralCoords {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if !self.emitted_start {
            self.emitted_start = true;
            return Some(self.start);
        }

        let current = self.cursor;
        let (start_x, start_y) = self.start;
        let level = self.level;
        let (x, y) = &mut self.cursor;
        match self.edge {
            Edge::Top => {
                if *x == start_x + level {
                    *y += 1;
                    self.edge = Edge::Right;
                } else {
                    *x += 1;
                }
            }
            Edge::Right => {
                if *y == start_y + level {
                    *x -= 1;
                    self.edge = Edge::Bottom;
                } else {
                    *y += 1;
                }
            }
            Edge::Bottom => {
                if *x == start_x - level {
                    *y -= 1;
                    self.edge = Edge::Left;
                } else {
                    *x -= 1;
                }
            }
            Edge::Left => {
                if *y == start_y - level + 1 {
                    self.level += 1;
                    self.cursor = (start_x - self.level, start_y - self.level);
                    self.edge = Edge::Top;
                } else {
                    *y -= 1;
                }
            }
        }
        Some(current)
    }
}

/// First coordinate of the spiral from `start` for which `is_occupied`
/// returns false.
///
/// Terminates whenever the occupied set is finite.
pub fn next_free_coords<F>(start: Coord, is_occupied: F) -> Coord
where
    F: Fn(Coord) -> bool,
{
    SpiralCoords::new(start.0, start.1)
        .find(|coords| !is_occupied(*coords))
        .unwrap_or(start)
}
