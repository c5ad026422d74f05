// rust/engine/src/policy/expert.rs
#![forbid(unsafe_code)]

/*
Rule-based expert

Priority ladder, evaluated fresh every tick, first match wins:

  1. Hazard   : a ground hazard is reachable by trace, or an airborne hazard is
                on screen. Stop moving sideways, then jump if it is within
                `hazard_close_range` columns, or nudge right if there is an
                overhang just ahead; otherwise wait for it.
  2. Block    : a special block above the player is reachable by trace. Jump
                straight/diagonally at it or walk under it. Jumps are budgeted:
                each costs `attempt_step`; once the budget exceeds
                `attempt_cap` the branch is skipped, paying back one unit per
                tick, until it is empty again.
  3. Traverse : classify the terrain ahead and jump walls, tunnels and gaps,
                walk off ledges, or just run right.
*/

use serde::{Deserialize, Serialize};

use crate::engine::{
    classify, tile, trace_hazard, trace_special_block, ActionCommand, ButtonSet, Command,
    Direction, Obstacle, Position, TerrainConfig, TileGrid, TraceConfig,
};

use super::base::{Decision, DecisionKind, Observation, Policy};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpertConfig {
    pub terrain: TerrainConfig,
    pub trace: TraceConfig,

    // ---------------- hazards ----------------
    pub hazard_jump_hold: u32,
    pub hazard_approach_hold: u32,
    /// Jump once the hazard is strictly closer than this many columns.
    pub hazard_close_range: f64,

    // ---------------- special blocks ----------------
    pub block_jump_hold: u32,
    pub block_diagonal_hold: u32,
    pub attempt_step: u32,
    pub attempt_cap: u32,
}

impl Default for ExpertConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            trace: TraceConfig::default(),
            hazard_jump_hold: 30,
            hazard_approach_hold: 5,
            hazard_close_range: 2.0,
            block_jump_hold: 10,
            block_diagonal_hold: 12,
            attempt_step: 2,
            attempt_cap: 8,
        }
    }
}

pub struct ExpertPolicy {
    cfg: ExpertConfig,
    attempts: u32,
    cooling_down: bool,
}

impl Default for ExpertPolicy {
    fn default() -> Self {
        Self::new(ExpertConfig::default())
    }
}

impl ExpertPolicy {
    pub fn new(cfg: ExpertConfig) -> Self {
        Self {
            cfg,
            attempts: 0,
            cooling_down: false,
        }
    }

    pub fn config(&self) -> &ExpertConfig {
        &self.cfg
    }

    /// Current special-block attempt budget.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooling_down
    }

    fn respond_to_hazard(&mut self, grid: &TileGrid, player: Position) -> Option<Decision> {
        let trace = trace_hazard(grid, player, &self.cfg.trace);
        if !trace.found {
            return None;
        }
        let target = trace.target?;

        self.cooling_down = false;

        let mut commands = vec![Command::Release {
            buttons: ButtonSet::HORIZONTAL,
            ticks: 0,
        }];

        let kind = if (player.x - target.col as f64).abs() < self.cfg.hazard_close_range {
            commands.push(Command::Hold(ActionCommand::fixed(
                ButtonSet::JUMP,
                self.cfg.hazard_jump_hold,
            )));
            DecisionKind::HazardJump
        } else if overhang_ahead(grid, player) {
            commands.push(Command::Hold(ActionCommand::fixed(
                ButtonSet::RIGHT,
                self.cfg.hazard_approach_hold,
            )));
            DecisionKind::HazardApproach
        } else {
            DecisionKind::HazardWait
        };

        Some(Decision::new(kind, commands))
    }

    fn approach_block(&mut self, grid: &TileGrid, player: Position) -> Option<Decision> {
        if !grid.contains(tile::SPECIAL_BLOCK) {
            return None;
        }
        let trace = trace_special_block(grid, player, &self.cfg.trace);
        if !trace.found {
            return None;
        }

        if self.cooling_down {
            if self.attempts > 0 {
                self.attempts -= 1;
                return None;
            }
            self.cooling_down = false;
        }

        let (buttons, hold, jumps) = match (trace.direction, trace.vertical_offset) {
            (Direction::None, 0) => return None,
            (Direction::None, _) => (ButtonSet::JUMP, self.cfg.block_jump_hold, true),
            (Direction::Left, 0) => (ButtonSet::LEFT, 0, false),
            (Direction::Right, 0) => (ButtonSet::RIGHT, 0, false),
            (Direction::Left, _) => (ButtonSet::JUMP_LEFT, self.cfg.block_diagonal_hold, true),
            (Direction::Right, _) => (ButtonSet::JUMP_RIGHT, self.cfg.block_diagonal_hold, true),
        };

        if jumps {
            self.attempts += self.cfg.attempt_step;
        }
        if self.attempts > self.cfg.attempt_cap {
            self.cooling_down = true;
        }

        Some(Decision::new(
            DecisionKind::Block,
            vec![
                Command::Release {
                    buttons: ButtonSet::RIGHT,
                    ticks: 0,
                },
                Command::Hold(ActionCommand::fixed(buttons, hold)),
            ],
        ))
    }

    fn traverse(&self, grid: &TileGrid, player: Position) -> Decision {
        let jump_right = |kind, ticks: u32| {
            // A zero hold would leave A pressed and the jump would never end.
            Decision::new(
                kind,
                vec![Command::Hold(ActionCommand::fixed(
                    ButtonSet::JUMP_RIGHT,
                    ticks.max(1),
                ))],
            )
        };

        match classify(grid, player, &self.cfg.terrain) {
            Obstacle::Wall(d) => jump_right(DecisionKind::Wall, d),
            Obstacle::Tunnel(d) => jump_right(DecisionKind::Tunnel, d),
            Obstacle::BigGap(d) => jump_right(DecisionKind::BigGap, d),
            Obstacle::Drop(d) => Decision::new(
                DecisionKind::Drop,
                vec![
                    Command::Wait(self.cfg.terrain.drop_settle_ticks),
                    Command::Release {
                        buttons: ButtonSet::RIGHT,
                        ticks: d,
                    },
                ],
            ),
            Obstacle::None => Decision::new(
                DecisionKind::Run,
                vec![Command::Hold(ActionCommand::fixed(ButtonSet::RIGHT, 0))],
            ),
        }
    }
}

/// Wall, ground or tunnel tiles in the band up to four rows above the player,
/// over the player's column and the next one.
fn overhang_ahead(grid: &TileGrid, player: Position) -> bool {
    let top = if player.y > 4.0 {
        player.y - 4.0
    } else {
        player.y
    };
    let rows = top as usize..(player.y + 1.0) as usize;
    let cols = player.x as usize..(player.x + 2.0) as usize;
    grid.band_contains(rows, cols, &[tile::WALL, tile::GROUND, tile::TUNNEL])
}

impl Policy for ExpertPolicy {
    fn decide(&mut self, obs: &Observation<'_>) -> Decision {
        let Observation { grid, player } = *obs;

        let decision = self
            .respond_to_hazard(grid, player)
            .or_else(|| self.approach_block(grid, player))
            .unwrap_or_else(|| self.traverse(grid, player));

        tracing::debug!(
            kind = decision.kind.name(),
            x = player.x,
            y = player.y,
            attempts = self.attempts,
            commands = ?decision.commands,
            "expert decision"
        );
        decision
    }

    fn reset(&mut self) {
        self.attempts = 0;
        self.cooling_down = false;
    }
}
