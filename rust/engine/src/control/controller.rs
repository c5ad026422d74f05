// rust/engine/src/control/controller.rs
#![forbid(unsafe_code)]

use crate::engine::{PlayerTracker, Position, TileGrid};
use crate::error::Result;
use crate::policy::{Decision, DecisionCounts, Observation, Policy};

use super::actuator::{ActuatorConfig, InputActuator};
use super::emulator::{Emulator, GameStats};
use super::sink::{FrameSink, ResultSink};

#[derive(Clone, Debug, Default)]
pub struct EpisodeReport {
    /// Every emulated tick, loop and actuator alike.
    pub ticks: u64,
    /// Control-loop iterations (one decision each).
    pub steps: u64,
    pub decisions: DecisionCounts,
    pub stats: GameStats,
    /// Stopped by a tick limit, the controller's or the emulator's own,
    /// with neither `level_complete` nor `dead` set.
    pub truncated: bool,
}

fn flag(stats: &GameStats, key: &str) -> bool {
    stats.get(key).and_then(serde_json::Value::as_bool).unwrap_or(false)
}

/// Drives one episode: tick, observe, decide, actuate.
///
/// Owns all cross-tick state (player position, the policy's counters via the
/// policy itself, held buttons via the actuator).
pub struct Controller<E: Emulator, P: Policy> {
    emu: E,
    policy: P,
    actuator: InputActuator,
    tracker: PlayerTracker,
    max_ticks: Option<u64>,
    loop_ticks: u64,
    steps: u64,
    decisions: DecisionCounts,
}

impl<E: Emulator, P: Policy> Controller<E, P> {
    pub fn new(emu: E, policy: P, actuator: ActuatorConfig) -> Self {
        Self {
            emu,
            policy,
            actuator: InputActuator::new(actuator),
            tracker: PlayerTracker::new(),
            max_ticks: None,
            loop_ticks: 0,
            steps: 0,
            decisions: DecisionCounts::default(),
        }
    }

    /// Stop the episode after this many emulated ticks even without game over.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn emulator(&self) -> &E {
        &self.emu
    }

    pub fn emulator_mut(&mut self) -> &mut E {
        &mut self.emu
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn player(&self) -> Position {
        self.tracker.position()
    }

    pub fn ticks(&self) -> u64 {
        self.loop_ticks + self.actuator.ticks()
    }

    pub fn into_parts(self) -> (E, P) {
        (self.emu, self.policy)
    }

    /// Reset emulator and per-episode state, and take a first fix on the player.
    pub fn begin(&mut self) {
        self.emu.reset();
        self.policy.reset();
        self.tracker.reset();
        self.actuator.reset();
        self.loop_ticks = 0;
        self.steps = 0;
        self.decisions = DecisionCounts::default();
        let grid = self.emu.game_area();
        self.tracker.locate(&grid);
        tracing::info!(player = ?self.tracker.position(), "episode start");
    }

    fn over_limit(&self) -> bool {
        self.max_ticks.is_some_and(|m| self.ticks() >= m)
    }

    pub fn is_done(&self) -> bool {
        self.emu.is_game_over() || self.over_limit()
    }

    /// One control-loop iteration. Returns the decision and the grid it was made on.
    pub fn step(&mut self) -> (Decision, TileGrid) {
        self.emu.tick();
        self.loop_ticks += 1;
        self.steps += 1;

        let grid = self.emu.game_area();
        let player = self.tracker.locate(&grid);

        let decision = self.policy.decide(&Observation {
            grid: &grid,
            player,
        });
        self.decisions.record(decision.kind);

        for command in &decision.commands {
            self.actuator.execute(&mut self.emu, command);
        }

        (decision, grid)
    }

    /// Collect final stats, hand them to `results`, and report.
    pub fn finish(&mut self, results: &mut dyn ResultSink) -> Result<EpisodeReport> {
        self.actuator.release_all(&mut self.emu);

        let stats = self.emu.game_state();
        let truncated = !(flag(&stats, "level_complete") || flag(&stats, "dead"));
        tracing::info!(
            ticks = self.ticks(),
            steps = self.steps,
            truncated,
            stats = ?stats,
            "episode end"
        );
        results.write_result(&stats)?;

        Ok(EpisodeReport {
            ticks: self.ticks(),
            steps: self.steps,
            decisions: self.decisions,
            stats,
            truncated,
        })
    }

    /// Run a whole episode.
    pub fn play(
        &mut self,
        frames: &mut dyn FrameSink,
        results: &mut dyn ResultSink,
    ) -> Result<EpisodeReport> {
        self.begin();
        while !self.is_done() {
            if frames.enabled() {
                frames.write_frame(&self.emu.grab_frame())?;
            }
            self.step();
        }
        self.finish(results)
    }
}
