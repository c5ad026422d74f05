// rust/engine/src/policy/base.rs
#![forbid(unsafe_code)]

use crate::engine::{Command, Position, TileGrid};

/// What a policy sees on one tick.
#[derive(Clone, Copy, Debug)]
pub struct Observation<'a> {
    pub grid: &'a TileGrid,
    /// Player position, possibly stale if the sprite is not on screen.
    pub player: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    /// Jump on a nearby hazard.
    HazardJump,
    /// Step right under an overhang before dealing with a hazard.
    HazardApproach,
    /// Stand still and let a hazard come closer.
    HazardWait,
    /// Move or jump toward a special block.
    Block,
    Wall,
    Tunnel,
    BigGap,
    Drop,
    /// Plain forward run.
    Run,
    Random,
}

impl DecisionKind {
    pub const COUNT: usize = 10;

    pub const ALL: [DecisionKind; Self::COUNT] = [
        DecisionKind::HazardJump,
        DecisionKind::HazardApproach,
        DecisionKind::HazardWait,
        DecisionKind::Block,
        DecisionKind::Wall,
        DecisionKind::Tunnel,
        DecisionKind::BigGap,
        DecisionKind::Drop,
        DecisionKind::Run,
        DecisionKind::Random,
    ];

    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DecisionKind::HazardJump => "hazard_jump",
            DecisionKind::HazardApproach => "hazard_approach",
            DecisionKind::HazardWait => "hazard_wait",
            DecisionKind::Block => "block",
            DecisionKind::Wall => "wall",
            DecisionKind::Tunnel => "tunnel",
            DecisionKind::BigGap => "big_gap",
            DecisionKind::Drop => "drop",
            DecisionKind::Run => "run",
            DecisionKind::Random => "random",
        }
    }
}

/// One tick's choice: an ordered list of actuator commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub kind: DecisionKind,
    pub commands: Vec<Command>,
}

impl Decision {
    pub fn new(kind: DecisionKind, commands: Vec<Command>) -> Self {
        Self { kind, commands }
    }
}

/// Per-kind decision counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecisionCounts([u64; DecisionKind::COUNT]);

impl DecisionCounts {
    #[inline]
    pub fn record(&mut self, kind: DecisionKind) {
        self.0[kind.idx()] += 1;
    }

    #[inline]
    pub fn get(&self, kind: DecisionKind) -> u64 {
        self.0[kind.idx()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn merge(&mut self, other: &DecisionCounts) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += *b;
        }
    }

    /// Non-zero counters, in `DecisionKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (DecisionKind, u64)> + '_ {
        DecisionKind::ALL
            .into_iter()
            .map(|k| (k, self.get(k)))
            .filter(|&(_, n)| n > 0)
    }
}

/// Policy chooses what to do for the current tick.
///
/// Must always return a decision (the expert falls back to running right);
/// "nothing found" is never an error.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn decide(&mut self, obs: &Observation<'_>) -> Decision;

    /// Clear per-episode state.
    fn reset(&mut self) {}
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&mut self, obs: &Observation<'_>) -> Decision {
        (**self).decide(obs)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<P: Policy + ?Sized> Policy for &mut P {
    fn decide(&mut self, obs: &Observation<'_>) -> Decision {
        (**self).decide(obs)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
