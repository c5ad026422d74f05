// rust/engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod buttons;
mod constants;
mod grid;
mod locator;
mod terrain;
mod trace;

/**
 * Curated engine public API.
 *
 * Perception (grid, locator, terrain, traces) and the input vocabulary.
 * Internal helpers stay private; only stable items are re-exported here.
 */
pub use buttons::{ActionCommand, Button, ButtonSet, Command, InputEvent};
pub use constants::{tile, BLOCK_TRACE_CAP, DROP_BAND_START, H, HAZARD_TRACE_CAP, W};
pub use grid::{code_for_glyph, glyph, Cell, TileGrid};
pub use locator::{bbox_center, nearest, nearest_where, PlayerTracker, Position};
pub use terrain::{classify, detect_drop, detect_vertical, Obstacle, TerrainConfig};
pub use trace::{trace_hazard, trace_special_block, Direction, HazardTrace, TraceConfig};
