// rust/engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use std::ops::Range;

use crate::engine::constants::{tile, H, W};

/// A single grid cell, addressed as `grid[row][col]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Immutable per-tick snapshot of the visible game area.
///
/// The engine never writes into a snapshot it was handed; scratch state for
/// traces lives beside the grid, not in it. Mutators exist for builders
/// (tests, the headless world).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    cells: [[u8; W]; H],
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_ascii())
    }
}

impl TileGrid {
    pub const fn empty() -> Self {
        Self {
            cells: [[tile::AIR; W]; H],
        }
    }

    pub const fn from_cells(cells: [[u8; W]; H]) -> Self {
        Self { cells }
    }

    /// Parse a grid from `H` lines of `W` glyphs (see [`code_for_glyph`]).
    /// Short lines are padded with air; unknown glyphs and extra lines are rejected.
    pub fn from_ascii(text: &str) -> Option<Self> {
        let mut g = Self::empty();
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() > H {
            return None;
        }
        // Bottom-align so fixtures can omit leading air rows.
        let top = H - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() > W {
                return None;
            }
            for (c, ch) in chars.into_iter().enumerate() {
                g.cells[top + i][c] = code_for_glyph(ch)?;
            }
        }
        Some(g)
    }

    #[inline]
    pub fn cells(&self) -> &[[u8; W]; H] {
        &self.cells
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Bounds-checked read with signed coordinates; `None` off-grid.
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Option<u8> {
        if row < 0 || col < 0 || row >= H as i32 || col >= W as i32 {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, code: u8) {
        self.cells[row][col] = code;
    }

    pub fn contains(&self, code: u8) -> bool {
        self.cells.iter().any(|row| row.contains(&code))
    }

    /// All cells equal to `code`, in row-major scan order.
    pub fn locate_all(&self, code: u8) -> Vec<Cell> {
        let mut out = Vec::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == code {
                    out.push(Cell::new(r, c));
                }
            }
        }
        out
    }

    /// Cells matching any of `codes`, grouped by code in the order given,
    /// each group in row-major order.
    pub fn locate_codes(&self, codes: &[u8]) -> Vec<Cell> {
        codes.iter().flat_map(|&c| self.locate_all(c)).collect()
    }

    /// Minimum row in `col` holding `code`.
    pub fn first_in_column(&self, col: usize, code: u8) -> Option<usize> {
        if col >= W {
            return None;
        }
        (0..H).find(|&r| self.cells[r][col] == code)
    }

    pub fn row_contains(&self, row: usize, code: u8) -> bool {
        row < H && self.cells[row].contains(&code)
    }

    /// True if any cell in `rows x cols` (clipped to the grid) holds one of `codes`.
    pub fn band_contains(&self, rows: Range<usize>, cols: Range<usize>, codes: &[u8]) -> bool {
        let rows = rows.start.min(H)..rows.end.min(H);
        let cols = cols.start.min(W)..cols.end.min(W);
        for r in rows {
            for c in cols.clone() {
                if codes.contains(&self.cells[r][c]) {
                    return true;
                }
            }
        }
        false
    }

    pub fn render_ascii(&self) -> String {
        let mut s = String::with_capacity((W + 3) * (H + 2));
        s.push('+');
        s.push_str(&"-".repeat(W));
        s.push_str("+\n");
        for row in &self.cells {
            s.push('|');
            for &v in row {
                s.push(glyph(v));
            }
            s.push_str("|\n");
        }
        s.push('+');
        s.push_str(&"-".repeat(W));
        s.push_str("+\n");
        s
    }
}

/// Display glyph for a tile code. Unknown codes render as `*`.
pub fn glyph(code: u8) -> char {
    match code {
        tile::AIR => '.',
        tile::PLAYER => 'M',
        tile::WALL => 'W',
        tile::GROUND => '#',
        tile::SPECIAL_BLOCK => '?',
        tile::TUNNEL => 'T',
        tile::HAZARD_A => 'g',
        tile::HAZARD_B => 'k',
        tile::AIRBORNE_HAZARD => 'f',
        tile::HAZARD_C => 's',
        _ => '*',
    }
}

/// Inverse of [`glyph`] for the known vocabulary (space also reads as air).
pub fn code_for_glyph(ch: char) -> Option<u8> {
    Some(match ch {
        '.' | ' ' => tile::AIR,
        'M' => tile::PLAYER,
        'W' => tile::WALL,
        '#' => tile::GROUND,
        '?' => tile::SPECIAL_BLOCK,
        'T' => tile::TUNNEL,
        'g' => tile::HAZARD_A,
        'k' => tile::HAZARD_B,
        'f' => tile::AIRBORNE_HAZARD,
        's' => tile::HAZARD_C,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_all_is_row_major() {
        let mut g = TileGrid::empty();
        g.set(5, 7, tile::HAZARD_A);
        g.set(2, 9, tile::HAZARD_A);
        g.set(2, 1, tile::HAZARD_A);
        assert_eq!(
            g.locate_all(tile::HAZARD_A),
            vec![Cell::new(2, 1), Cell::new(2, 9), Cell::new(5, 7)]
        );
        assert!(g.locate_all(tile::HAZARD_B).is_empty());
    }

    #[test]
    fn get_is_none_off_grid() {
        let g = TileGrid::empty();
        assert_eq!(g.get(-1, 0), None);
        assert_eq!(g.get(0, -1), None);
        assert_eq!(g.get(H as i32, 0), None);
        assert_eq!(g.get(0, W as i32), None);
        assert_eq!(g.get(0, 0), Some(tile::AIR));
    }

    #[test]
    fn ascii_is_bottom_aligned_and_renders_back() {
        let g = TileGrid::from_ascii("..M\n####").unwrap();
        assert_eq!(g.at(H - 2, 2), tile::PLAYER);
        assert_eq!(g.at(H - 1, 3), tile::GROUND);
        assert_eq!(g.at(H - 1, 4), tile::AIR);
        assert!(g.render_ascii().contains("|####................|"));
        assert!(TileGrid::from_ascii("x").is_none());
    }

    #[test]
    fn band_is_clipped() {
        let mut g = TileGrid::empty();
        g.set(H - 1, W - 1, tile::WALL);
        assert!(g.band_contains(H - 2..H + 5, W - 2..W + 5, &[tile::WALL]));
        assert!(!g.band_contains(0..H, 0..W - 1, &[tile::WALL]));
    }
}
