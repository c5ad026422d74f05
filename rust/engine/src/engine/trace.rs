// rust/engine/src/engine/trace.rs
#![forbid(unsafe_code)]

/*
Reachability traces

Rather than assuming line of sight, a trace walks the grid one cell per
iteration along passable tiles and reports whether it reached what it was
looking for, plus which way the player has to go.

Hazard trace (player -> nearest ground hazard)
  1. step down while the cell below is passable, until the trace has gone up
  2. else step sideways toward the hazard if both the side cell and the cell
     diagonally above it are passable
  3. else step up, unless the trace already went both down and sideways
  Stops when the current cell holds a hazard code.

Special-block trace (block -> player)
  1. step down while the cell below is passable
  2. else step sideways toward the player (or keep the current heading)
  3. else give up
  Stops on a player cell.

Both traces read the grid through bounds-checked accessors and carry a hard
iteration cap, so malformed grids end in a negative result, never a loop.
The walked cells are returned in `path`; the grid itself is never touched.
*/

use serde::{Deserialize, Serialize};

use crate::engine::constants::{tile, BLOCK_TRACE_CAP, HAZARD_TRACE_CAP};
use crate::engine::grid::{Cell, TileGrid};
use crate::engine::locator::{nearest, nearest_where, round_index, Position};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

impl Direction {
    /// Heading from column `from` toward column `to`.
    pub fn toward(from: f64, to: f64) -> Self {
        if to < from {
            Direction::Left
        } else if to > from {
            Direction::Right
        } else {
            Direction::None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HazardTrace {
    pub found: bool,
    /// Cell where the trace ended on success.
    pub target: Option<Cell>,
    /// Which way the player should move to approach.
    pub direction: Direction,
    /// Jumps needed on the final approach (0 = walk, 1 = jump).
    pub vertical_offset: u8,
    /// Cells visited, in order.
    pub path: Vec<Cell>,
}

impl HazardTrace {
    pub fn not_found() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub hazard_cap: u32,
    /// Tiles the hazard trace may walk through. Includes the ground hazard
    /// codes so the trace can step onto its target.
    pub hazard_passable: Vec<u8>,
    pub block_cap: u32,
    pub block_passable: Vec<u8>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            hazard_cap: HAZARD_TRACE_CAP,
            hazard_passable: vec![
                tile::HAZARD_A,
                tile::HAZARD_B,
                tile::AIR,
                tile::PLAYER,
                tile::HAZARD_C,
            ],
            block_cap: BLOCK_TRACE_CAP,
            block_passable: vec![tile::SPECIAL_BLOCK, tile::AIR, tile::PLAYER],
        }
    }
}

#[inline]
fn passable(grid: &TileGrid, row: i32, col: i32, allow: &[u8]) -> bool {
    grid.get(row, col).is_some_and(|v| allow.contains(&v))
}

/// Find an airborne hazard or trace a path to the nearest ground hazard.
///
/// Airborne hazards are reported as soon as one is on screen (first in scan
/// order); the policy waits for them to come close rather than chasing them.
pub fn trace_hazard(grid: &TileGrid, player: Position, cfg: &TraceConfig) -> HazardTrace {
    if let Some(&cell) = grid.locate_all(tile::AIRBORNE_HAZARD).first() {
        return HazardTrace {
            found: true,
            target: Some(cell),
            direction: Direction::toward(player.x, cell.col as f64),
            vertical_offset: 0,
            path: Vec::new(),
        };
    }

    let hazards = grid.locate_codes(tile::GROUND_HAZARDS);
    let Some(goal) = nearest(&hazards, player) else {
        return HazardTrace::not_found();
    };

    let step: i32 = if (goal.col as f64) < player.x { -1 } else { 1 };
    let side = if step < 0 {
        Direction::Left
    } else {
        Direction::Right
    };
    let allow = cfg.hazard_passable.as_slice();

    let mut row = round_index(player.y + 0.5);
    let mut col = round_index(player.x);

    let mut path = Vec::new();
    let mut gone_up = false;
    let mut gone_down = false;
    let mut gone_side = false;
    let mut direction = Direction::None;
    let mut i: u32 = 0;

    while let Some(code) = grid.get(row, col) {
        path.push(Cell::new(row as usize, col as usize));

        if tile::ALL_HAZARDS.contains(&code) {
            tracing::trace!(?path, "hazard trace reached target");
            return HazardTrace {
                found: true,
                target: Some(Cell::new(row as usize, col as usize)),
                direction,
                vertical_offset: u8::from(gone_up),
                path,
            };
        }

        if !gone_up && passable(grid, row + 1, col, allow) {
            row += 1;
            i += 1;
            gone_down = true;
        } else if passable(grid, row - 1, col + step, allow) && passable(grid, row, col + step, allow) {
            col += step;
            gone_side = true;
            direction = side;
        } else if (!gone_down || !gone_side) && passable(grid, row - 1, col, allow) {
            row -= 1;
            gone_up = true;
        }

        if i > cfg.hazard_cap {
            break;
        }
        i += 1;
    }

    tracing::trace!(?path, "hazard trace gave up");
    HazardTrace {
        path,
        ..HazardTrace::not_found()
    }
}

/// Trace from the nearest special block above the player down to the player.
pub fn trace_special_block(grid: &TileGrid, player: Position, cfg: &TraceConfig) -> HazardTrace {
    let blocks = grid.locate_all(tile::SPECIAL_BLOCK);
    let Some(block) = nearest_where(&blocks, player, |c| (c.row as f64) < player.y) else {
        return HazardTrace::not_found();
    };

    let allow = cfg.block_passable.as_slice();

    let mut row = block.row as i32;
    let mut col = block.col as i32;

    let mut path = Vec::new();
    // Heading of the last step, as seen from the block.
    let mut heading = Direction::None;
    // Last sideways heading taken.
    let mut turn = Direction::None;
    let mut directly_above = true;
    let mut found = false;
    let mut i: u32 = 0;

    while let Some(code) = grid.get(row, col) {
        path.push(Cell::new(row as usize, col as usize));

        if code == tile::PLAYER {
            found = true;
            break;
        }

        if passable(grid, row + 1, col, allow) {
            row += 1;
            heading = Direction::None;
        } else {
            directly_above = false;
            let dx = player.x - f64::from(col);
            if (dx > 0.0 || heading == Direction::Right) && passable(grid, row, col + 1, allow) {
                col += 1;
                heading = Direction::Right;
                turn = Direction::Right;
            } else if (dx < 0.0 || heading == Direction::Left) && passable(grid, row, col - 1, allow) {
                col -= 1;
                heading = Direction::Left;
                turn = Direction::Left;
            } else {
                break;
            }
        }

        if i > cfg.block_cap {
            break;
        }
        i += 1;
    }

    tracing::trace!(?path, found, "special block trace");

    if !found {
        return HazardTrace {
            path,
            ..HazardTrace::not_found()
        };
    }

    // Flip to the player's point of view: a trace that walked right from the
    // block found the player to the right, so the block lies to the left.
    let (direction, vertical_offset) = match heading {
        Direction::None if directly_above => (Direction::None, 1),
        Direction::None => (flip(turn), 1),
        other => (flip(other), 0),
    };

    HazardTrace {
        found,
        target: Some(block),
        direction,
        vertical_offset,
        path,
    }
}

fn flip(d: Direction) -> Direction {
    match d {
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
        Direction::None => Direction::None,
    }
}
