// rust/engine/src/policy/random.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::{ActionCommand, ButtonSet, Command};

use super::base::{Decision, DecisionKind, Observation, Policy};

/// Seeded baseline: picks uniformly from a small menu of legal moves.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn decide(&mut self, _obs: &Observation<'_>) -> Decision {
        let command = match self.rng.gen_range(0..4u8) {
            0 => Command::Hold(ActionCommand::fixed(ButtonSet::RIGHT, 0)),
            1 => Command::Hold(ActionCommand::fixed(
                ButtonSet::JUMP_RIGHT,
                self.rng.gen_range(5..=30),
            )),
            2 => Command::Hold(ActionCommand::fixed(ButtonSet::JUMP, 10)),
            _ => Command::Wait(5),
        };
        Decision::new(DecisionKind::Random, vec![command])
    }
}
