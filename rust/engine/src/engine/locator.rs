// rust/engine/src/engine/locator.rs
#![forbid(unsafe_code)]

use crate::engine::constants::tile;
use crate::engine::grid::{Cell, TileGrid};

/// Fractional (column, row) coordinate: the center of a detected bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn of_cell(cell: Cell) -> Self {
        Self::new(cell.col as f64, cell.row as f64)
    }

    pub fn distance_to(&self, cell: Cell) -> f64 {
        let dx = self.x - cell.col as f64;
        let dy = self.y - cell.row as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Grid index for a fractional coordinate, rounding halves to even.
///
/// Scan origins such as `y + 0.5` land exactly on halves; the tuned delays
/// assume half-to-even there.
#[inline]
pub(crate) fn round_index(v: f64) -> i32 {
    v.round_ties_even() as i32
}

/// Bounding-box center of every cell equal to `code`, or `None` if absent.
///
/// Center, not centroid: sprite pixels can split across animation frames and
/// the box stays stable where the mean would drift.
pub fn bbox_center(grid: &TileGrid, code: u8) -> Option<Position> {
    let mut min_r = usize::MAX;
    let mut max_r = 0usize;
    let mut min_c = usize::MAX;
    let mut max_c = 0usize;
    let mut seen = false;

    for (r, row) in grid.cells().iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v == code {
                seen = true;
                min_r = min_r.min(r);
                max_r = max_r.max(r);
                min_c = min_c.min(c);
                max_c = max_c.max(c);
            }
        }
    }

    seen.then(|| {
        Position::new(
            (min_c + max_c) as f64 / 2.0,
            (min_r + max_r) as f64 / 2.0,
        )
    })
}

/// Nearest cell to `from` by Euclidean distance.
///
/// Ties keep the earliest element: a candidate replaces the current best only
/// when strictly closer.
pub fn nearest(cells: &[Cell], from: Position) -> Option<Cell> {
    nearest_where(cells, from, |_| true)
}

/// [`nearest`] restricted to cells accepted by `keep`.
pub fn nearest_where(cells: &[Cell], from: Position, keep: impl Fn(Cell) -> bool) -> Option<Cell> {
    let mut best: Option<(Cell, f64)> = None;
    for &cell in cells {
        if !keep(cell) {
            continue;
        }
        let d = from.distance_to(cell);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((cell, d)),
        }
    }
    best.map(|(cell, _)| cell)
}

/// Player position that survives ticks where the sprite is not visible.
///
/// Starts at the origin; once the player has been seen, a grid without any
/// player cells leaves the last position untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerTracker {
    pos: Position,
    seen: bool,
}

impl PlayerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh from `grid` and return the (possibly stale) position.
    pub fn locate(&mut self, grid: &TileGrid) -> Position {
        if let Some(p) = bbox_center(grid, tile::PLAYER) {
            self.pos = p;
            self.seen = true;
        }
        self.pos
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// True once the player has been located at least once.
    #[inline]
    pub fn has_seen(&self) -> bool {
        self.seen
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_player_block() -> TileGrid {
        let mut g = TileGrid::empty();
        for r in 3..=4 {
            for c in 5..=6 {
                g.set(r, c, tile::PLAYER);
            }
        }
        g
    }

    #[test]
    fn player_is_bbox_center() {
        let mut t = PlayerTracker::new();
        assert_eq!(t.locate(&grid_with_player_block()), Position::new(5.5, 3.5));
    }

    #[test]
    fn disconnected_sprite_uses_box_not_mean() {
        let mut g = TileGrid::empty();
        g.set(10, 2, tile::PLAYER);
        g.set(10, 3, tile::PLAYER);
        g.set(10, 4, tile::PLAYER);
        g.set(11, 8, tile::PLAYER);
        assert_eq!(bbox_center(&g, tile::PLAYER), Some(Position::new(5.0, 10.5)));
    }

    #[test]
    fn stale_position_survives_missing_player() {
        let mut t = PlayerTracker::new();
        t.locate(&grid_with_player_block());
        let p = t.locate(&TileGrid::empty());
        assert_eq!(p, Position::new(5.5, 3.5));
        assert!(t.has_seen());
    }

    #[test]
    fn never_seen_stays_at_origin() {
        let mut t = PlayerTracker::new();
        assert_eq!(t.locate(&TileGrid::empty()), Position::default());
        assert!(!t.has_seen());
    }

    #[test]
    fn nearest_keeps_first_on_tie() {
        let from = Position::new(5.0, 5.0);
        let cells = [Cell::new(5, 7), Cell::new(5, 3), Cell::new(9, 9)];
        assert_eq!(nearest(&cells, from), Some(Cell::new(5, 7)));
        assert_eq!(nearest(&[], from), None);
    }

    #[test]
    fn nearest_where_filters() {
        let from = Position::new(5.0, 5.0);
        let cells = [Cell::new(6, 5), Cell::new(2, 5)];
        assert_eq!(
            nearest_where(&cells, from, |c| (c.row as f64) < from.y),
            Some(Cell::new(2, 5))
        );
    }
}
