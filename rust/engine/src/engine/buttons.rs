// rust/engine/src/engine/buttons.rs
#![forbid(unsafe_code)]

use std::fmt;

use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    /// Jump.
    A = 4,
    B = 5,
    Select = 6,
    Start = 7,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::A => "a",
            Button::B => "b",
            Button::Select => "select",
            Button::Start => "start",
        }
    }
}

/// Explicit press/release pair; never encoded as an arithmetic offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(Button),
    Release(Button),
}

/// Order-independent set of buttons.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);
    pub const RIGHT: ButtonSet = ButtonSet(Button::Right.bit());
    pub const LEFT: ButtonSet = ButtonSet(Button::Left.bit());
    pub const JUMP: ButtonSet = ButtonSet(Button::A.bit());
    pub const JUMP_RIGHT: ButtonSet = ButtonSet(Button::A.bit() | Button::Right.bit());
    pub const JUMP_LEFT: ButtonSet = ButtonSet(Button::A.bit() | Button::Left.bit());
    pub const HORIZONTAL: ButtonSet = ButtonSet(Button::Left.bit() | Button::Right.bit());
    pub const ALL: ButtonSet = ButtonSet(u8::MAX);

    #[inline]
    pub const fn with(self, b: Button) -> Self {
        Self(self.0 | b.bit())
    }

    #[inline]
    pub const fn contains(self, b: Button) -> bool {
        self.0 & b.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: ButtonSet) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn difference(self, other: ButtonSet) -> Self {
        Self(self.0 & !other.0)
    }

    /// At most one of Left/Right and at most one of Up/Down.
    pub const fn is_consistent(self) -> bool {
        let lr = Button::Left.bit() | Button::Right.bit();
        let ud = Button::Up.bit() | Button::Down.bit();
        self.0 & lr != lr && self.0 & ud != ud
    }

    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |&b| self.contains(b))
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(ButtonSet::EMPTY, ButtonSet::with)
    }
}

impl fmt::Debug for ButtonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ButtonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, b) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(b.name())?;
        }
        f.write_str("}")
    }
}

/// Buttons to press and how long to hold them.
///
/// `hold_ticks == 0` presses and leaves the buttons down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionCommand {
    buttons: ButtonSet,
    hold_ticks: u32,
}

impl ActionCommand {
    pub fn new(buttons: ButtonSet, hold_ticks: u32) -> Result<Self> {
        if !buttons.is_consistent() {
            return Err(EngineError::ConflictingButtons(buttons));
        }
        Ok(Self {
            buttons,
            hold_ticks,
        })
    }

    /// For compile-time button sets known to be consistent.
    pub(crate) const fn fixed(buttons: ButtonSet, hold_ticks: u32) -> Self {
        debug_assert!(buttons.is_consistent());
        Self {
            buttons,
            hold_ticks,
        }
    }

    #[inline]
    pub fn buttons(&self) -> ButtonSet {
        self.buttons
    }

    #[inline]
    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }
}

/// One actuator step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Press, hold, release, settle. A zero hold leaves the buttons pressed.
    Hold(ActionCommand),
    /// Release `buttons`; if `ticks > 0`, advance (clamped) `ticks` then settle.
    Release { buttons: ButtonSet, ticks: u32 },
    /// Release every button, no ticks.
    ReleaseAll,
    /// Advance `n` ticks with the current held state.
    Wait(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_directions_are_rejected() {
        assert!(ActionCommand::new(ButtonSet::HORIZONTAL, 5).is_err());
        let ud: ButtonSet = [Button::Up, Button::Down].into_iter().collect();
        assert!(ActionCommand::new(ud, 0).is_err());
        assert!(ActionCommand::new(ButtonSet::JUMP_RIGHT, 20).is_ok());
    }

    #[test]
    fn set_ops_and_display() {
        let s = ButtonSet::EMPTY.with(Button::Right).with(Button::A);
        assert_eq!(s, ButtonSet::JUMP_RIGHT);
        assert_eq!(s.to_string(), "{right+a}");
        assert_eq!(s.difference(ButtonSet::RIGHT), ButtonSet::JUMP);
        assert!(ButtonSet::EMPTY.is_empty());
        assert_eq!(ButtonSet::ALL.iter().count(), 8);
    }
}
