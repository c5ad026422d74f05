// rust/engine/src/engine/constants.rs
#![forbid(unsafe_code)]

/// Visible game-area width in tiles (columns).
pub const W: usize = 20;
/// Visible game-area height in tiles (rows).
pub const H: usize = 16;

/**
 * Tile-code vocabulary of the game area.
 *
 * These must match the emulator's encoding exactly; every scan in the engine
 * compares raw cell values against them.
 */
pub mod tile {
    pub const AIR: u8 = 0;
    pub const PLAYER: u8 = 1;
    pub const WALL: u8 = 10;
    pub const GROUND: u8 = 12;
    pub const SPECIAL_BLOCK: u8 = 13;
    pub const TUNNEL: u8 = 14;
    pub const HAZARD_A: u8 = 15;
    pub const HAZARD_B: u8 = 16;
    pub const AIRBORNE_HAZARD: u8 = 18;
    pub const HAZARD_C: u8 = 19;

    /// Ground-roaming hazards.
    pub const GROUND_HAZARDS: &[u8] = &[HAZARD_A, HAZARD_B, HAZARD_C];

    /// Every hazard code, ground and airborne.
    pub const ALL_HAZARDS: &[u8] = &[HAZARD_A, HAZARD_B, AIRBORNE_HAZARD, HAZARD_C];

    /// Tiles that stop a forward drop scan.
    pub const FLOOR_STOPS: &[u8] = &[WALL, TUNNEL, GROUND];

    /// Tiles the player cannot walk through.
    pub const SOLID: &[u8] = &[WALL, GROUND, SPECIAL_BLOCK, TUNNEL];

    #[inline]
    pub fn is_solid(code: u8) -> bool {
        SOLID.contains(&code)
    }
}

/// Rows `[DROP_BAND_START, H)` are the floor band searched for gaps.
pub const DROP_BAND_START: usize = 14;

/// Default iteration cap for the ground/airborne hazard trace.
pub const HAZARD_TRACE_CAP: u32 = 10;
/// Default iteration cap for the special-block trace.
pub const BLOCK_TRACE_CAP: u32 = 20;
