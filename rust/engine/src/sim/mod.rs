// rust/engine/src/sim/mod.rs
#![forbid(unsafe_code)]

/**
Headless platformer used for rollouts and end-to-end tests.

- `level`: text level format and the seeded generator
- `world`: `TileWorld`, the `Emulator` implementation
*/
pub mod level;
pub mod world;

pub use level::{Level, LevelGen, Spawn};
pub use world::{TileWorld, WorldConfig};
