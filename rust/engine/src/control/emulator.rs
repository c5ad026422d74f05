// rust/engine/src/control/emulator.rs
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::engine::{InputEvent, TileGrid};

/// End-of-episode statistics, keyed by stat name.
pub type GameStats = BTreeMap<String, serde_json::Value>;

/// Packed RGB8 image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub rgb: Vec<u8>,
}

/// What the controller needs from the emulator.
///
/// Contract:
/// - `game_area` is a pure read: repeated calls between two `tick`s return
///   the same snapshot.
/// - `send_input` is idempotent per event (pressing a held button is a no-op).
/// - `tick` blocks until exactly one frame has been emulated.
pub trait Emulator {
    /// Start a new episode.
    fn reset(&mut self);

    fn tick(&mut self);

    fn game_area(&self) -> TileGrid;

    fn send_input(&mut self, event: InputEvent);

    fn is_game_over(&self) -> bool;

    fn game_state(&self) -> GameStats;

    /// Only consumed by frame sinks.
    fn grab_frame(&self) -> Frame;
}

impl<E: Emulator + ?Sized> Emulator for &mut E {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn tick(&mut self) {
        (**self).tick()
    }

    fn game_area(&self) -> TileGrid {
        (**self).game_area()
    }

    fn send_input(&mut self, event: InputEvent) {
        (**self).send_input(event)
    }

    fn is_game_over(&self) -> bool {
        (**self).is_game_over()
    }

    fn game_state(&self) -> GameStats {
        (**self).game_state()
    }

    fn grab_frame(&self) -> Frame {
        (**self).grab_frame()
    }
}
