// rust/engine/src/control/actuator.rs
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::engine::{ActionCommand, Button, ButtonSet, Command, InputEvent};

use super::emulator::Emulator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Non-zero holds shorter than this are rounded up to it.
    pub min_hold: u32,
    /// Ticks advanced after a release so the game registers it.
    pub release_settle: u32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            min_hold: 5,
            release_settle: 5,
        }
    }
}

/// Turns commands into press / tick / release sequences.
///
/// Tracks which buttons it left pressed so "release all" and direction
/// swaps never leave Left and Right (or Up and Down) down together.
#[derive(Clone, Debug, Default)]
pub struct InputActuator {
    cfg: ActuatorConfig,
    held: ButtonSet,
    ticks: u64,
}

impl InputActuator {
    pub fn new(cfg: ActuatorConfig) -> Self {
        Self {
            cfg,
            held: ButtonSet::EMPTY,
            ticks: 0,
        }
    }

    /// Buttons currently pressed by this actuator.
    #[inline]
    pub fn held(&self) -> ButtonSet {
        self.held
    }

    /// Ticks this actuator has advanced in total.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forget held buttons and the tick count; keeps the config.
    pub fn reset(&mut self) {
        self.held = ButtonSet::EMPTY;
        self.ticks = 0;
    }

    /// 0 stays 0; anything in `(0, min_hold)` becomes `min_hold`.
    pub fn effective_hold(&self, requested: u32) -> u32 {
        if requested > 0 && requested < self.cfg.min_hold {
            self.cfg.min_hold
        } else {
            requested
        }
    }

    pub fn execute<E: Emulator + ?Sized>(&mut self, emu: &mut E, command: &Command) {
        match *command {
            Command::Hold(action) => self.run_action(emu, action),
            Command::Release { buttons, ticks } => self.release(emu, buttons, ticks),
            Command::ReleaseAll => self.release_all(emu),
            Command::Wait(n) => self.advance(emu, n),
        }
    }

    /// Press, then either return with the buttons down (`hold_ticks == 0`) or
    /// hold for the clamped duration, release and settle.
    pub fn run_action<E: Emulator + ?Sized>(&mut self, emu: &mut E, action: ActionCommand) {
        let buttons = action.buttons();

        // Drop the opposite direction first.
        let mut opposing = ButtonSet::EMPTY;
        for (a, b) in [(Button::Left, Button::Right), (Button::Up, Button::Down)] {
            if buttons.contains(a) && self.held.contains(b) {
                opposing = opposing.with(b);
            }
            if buttons.contains(b) && self.held.contains(a) {
                opposing = opposing.with(a);
            }
        }
        self.send_release(emu, opposing);

        for b in buttons.iter() {
            emu.send_input(InputEvent::Press(b));
        }
        self.held = self.held.union(buttons);

        let hold = self.effective_hold(action.hold_ticks());
        if hold == 0 {
            return;
        }

        self.advance(emu, hold);
        self.send_release(emu, buttons);
        self.advance(emu, self.cfg.release_settle);
    }

    /// Release `buttons`; with `ticks > 0`, also wait (clamped) and settle.
    pub fn release<E: Emulator + ?Sized>(&mut self, emu: &mut E, buttons: ButtonSet, ticks: u32) {
        self.send_release(emu, buttons);
        let wait = self.effective_hold(ticks);
        if wait == 0 {
            return;
        }
        self.advance(emu, wait);
        self.advance(emu, self.cfg.release_settle);
    }

    /// Release every held button immediately.
    pub fn release_all<E: Emulator + ?Sized>(&mut self, emu: &mut E) {
        self.send_release(emu, self.held);
    }

    pub fn advance<E: Emulator + ?Sized>(&mut self, emu: &mut E, n: u32) {
        for _ in 0..n {
            emu.tick();
        }
        self.ticks += u64::from(n);
    }

    fn send_release<E: Emulator + ?Sized>(&mut self, emu: &mut E, buttons: ButtonSet) {
        for b in buttons.iter() {
            emu.send_input(InputEvent::Release(b));
        }
        self.held = self.held.difference(buttons);
    }
}
