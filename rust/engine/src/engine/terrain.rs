// rust/engine/src/engine/terrain.rs
#![forbid(unsafe_code)]

/*
Forward terrain classification

Three probes run from the player's position, in fixed priority:

  Wall   : topmost wall tile in the column just ahead
  Tunnel : topmost tunnel tile in the column just ahead, only if a tunnel tile
           is also at the player's height
  Drop   : straight scan down the column ahead, from foot level to the floor

The first probe that fires wins. Wall and tunnel delays scale linearly with
obstacle height; the constants are calibrated against the game's jump
physics and live in `TerrainConfig`.
*/

use serde::{Deserialize, Serialize};

use crate::engine::constants::{tile, DROP_BAND_START, H, W};
use crate::engine::grid::TileGrid;
use crate::engine::locator::{round_index, Position};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Added to the wall height above the player.
    pub wall_base_offset: f64,
    /// Added to the tunnel height above the player (tunnels need more clearance).
    pub tunnel_base_offset: f64,
    /// Hold ticks per tile of obstacle height.
    pub delay_per_tile: f64,
    pub big_gap_delay: u32,
    pub drop_delay: u32,
    /// Ticks to let pass, unchanged, before reacting to a drop.
    pub drop_settle_ticks: u32,
    /// Minimum descent (rows below the player) that counts as a drop.
    pub drop_depth: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            wall_base_offset: 1.5,
            tunnel_base_offset: 2.0,
            // (11 - 5) / (4 - 3)
            delay_per_tile: 6.0,
            big_gap_delay: 20,
            drop_delay: 50,
            drop_settle_ticks: 5,
            drop_depth: 7.0,
        }
    }
}

/// At most one obstacle is reported per decision. Payload is the hold delay in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Obstacle {
    #[default]
    None,
    Wall(u32),
    Tunnel(u32),
    Drop(u32),
    BigGap(u32),
}

impl Obstacle {
    pub fn delay(self) -> u32 {
        match self {
            Obstacle::None => 0,
            Obstacle::Wall(d) | Obstacle::Tunnel(d) | Obstacle::Drop(d) | Obstacle::BigGap(d) => d,
        }
    }

    pub fn is_none(self) -> bool {
        self == Obstacle::None
    }
}

/// Probe the column just ahead of the player for `code`.
///
/// Returns the hold delay if an obstacle of positive height is present.
/// Tunnel probes additionally require a tunnel tile on the player's row.
pub fn detect_vertical(
    grid: &TileGrid,
    player: Position,
    code: u8,
    base_offset: f64,
    delay_per_tile: f64,
) -> Option<u32> {
    let ahead = player.x + 1.5;
    if ahead >= W as f64 || ahead < 0.0 {
        return None;
    }

    let top = grid.first_in_column(ahead as usize, code)?;

    if code == tile::TUNNEL {
        let player_row = (player.y + 0.5).floor();
        if player_row < 0.0 || !grid.row_contains(player_row as usize, code) {
            return None;
        }
    }

    let height = base_offset + (player.y - top as f64);
    if height <= 0.0 {
        return None;
    }
    Some((delay_per_tile * height).round() as u32)
}

/// Look for a gap or a ledge ahead.
///
/// Skipped entirely when the floor band has no air. Otherwise a probe scans
/// straight down the column just ahead of the player, starting at foot level,
/// until it lands on floor or leaves the screen at the bottom (`BigGap`).
/// A column past the right edge reports nothing.
pub fn detect_drop(grid: &TileGrid, player: Position, cfg: &TerrainConfig) -> Obstacle {
    if !grid.band_contains(DROP_BAND_START..H, 0..W, &[tile::AIR]) {
        return Obstacle::None;
    }

    let mut row = round_index(player.y + 0.5);
    let col = round_index(player.x + 1.0);

    if col < W as i32 {
        loop {
            if row >= H as i32 {
                return Obstacle::BigGap(cfg.big_gap_delay);
            }
            if grid.get(row, col).is_some_and(|code| tile::FLOOR_STOPS.contains(&code)) {
                break;
            }
            row += 1;
        }
    }

    if f64::from(row) - player.y > cfg.drop_depth {
        Obstacle::Drop(cfg.drop_delay)
    } else {
        Obstacle::None
    }
}

/// Classify the terrain ahead: Wall > Tunnel > Drop/BigGap.
pub fn classify(grid: &TileGrid, player: Position, cfg: &TerrainConfig) -> Obstacle {
    if let Some(d) = detect_vertical(
        grid,
        player,
        tile::WALL,
        cfg.wall_base_offset,
        cfg.delay_per_tile,
    ) {
        return Obstacle::Wall(d);
    }
    if let Some(d) = detect_vertical(
        grid,
        player,
        tile::TUNNEL,
        cfg.tunnel_base_offset,
        cfg.delay_per_tile,
    ) {
        return Obstacle::Tunnel(d);
    }
    detect_drop(grid, player, cfg)
}
