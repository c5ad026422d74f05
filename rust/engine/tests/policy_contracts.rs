// rust/engine/tests/policy_contracts.rs
#![forbid(unsafe_code)]

/**
 * Cross-policy contract tests.
 *
 * Purpose:
 * - Enforce shared behavior contracts for policy implementations:
 *   non-empty legal decisions, determinism, and input-grid purity.
 * - Lock the expert's branch priority: hazard > special block > wall >
 *   tunnel > drop/gap > run.
 *
 * Covered policy families:
 * - `ExpertPolicy` (rule-based, deterministic)
 * - `RandomPolicy` (seeded deterministic RNG path)
 */
use platformer_engine::{
    tile, ActionCommand, ButtonSet, Command, Decision, DecisionKind, ExpertPolicy, Observation,
    Policy, Position, RandomPolicy, TileGrid, H, W,
};

fn flat() -> TileGrid {
    let mut g = TileGrid::empty();
    for r in 14..H {
        for c in 0..W {
            g.set(r, c, tile::GROUND);
        }
    }
    g
}

/// Draws the 2x2 player with its top-left at (top, left).
fn with_player(mut g: TileGrid, top: usize, left: usize) -> (TileGrid, Position) {
    for r in top..top + 2 {
        for c in left..left + 2 {
            g.set(r, c, tile::PLAYER);
        }
    }
    (g, Position::new(left as f64 + 0.5, top as f64 + 0.5))
}

fn decide(policy: &mut dyn Policy, grid: &TileGrid, player: Position) -> Decision {
    policy.decide(&Observation { grid, player })
}

/// A handful of layouts covering every expert branch.
fn fixture_grids() -> Vec<(TileGrid, Position)> {
    let mut out = Vec::new();

    out.push(with_player(flat(), 12, 3));

    let (mut g, p) = with_player(flat(), 12, 3);
    g.set(13, 5, tile::HAZARD_A);
    out.push((g, p));

    let (mut g, p) = with_player(flat(), 12, 4);
    g.set(8, 4, tile::SPECIAL_BLOCK);
    out.push((g, p));

    let (mut g, p) = with_player(flat(), 12, 3);
    for r in 11..14 {
        g.set(r, 5, tile::WALL);
    }
    out.push((g, p));

    let mut g = flat();
    for c in 8..11 {
        g.set(14, c, tile::AIR);
        g.set(15, c, tile::AIR);
    }
    out.push(with_player(g, 12, 5));

    let (mut g, p) = with_player(flat(), 12, 3);
    g.set(2, 12, tile::AIRBORNE_HAZARD);
    out.push((g, p));

    out
}

fn assert_legal(d: &Decision) {
    assert!(!d.commands.is_empty(), "{:?} has no commands", d.kind);
    for c in &d.commands {
        if let Command::Hold(a) = c {
            assert!(a.buttons().is_consistent());
            assert!(!a.buttons().is_empty());
        }
    }
}

#[test]
fn every_decision_is_legal_and_non_empty() {
    let mut expert = ExpertPolicy::default();
    let mut random = RandomPolicy::new(11);
    for (g, p) in fixture_grids() {
        assert_legal(&decide(&mut expert, &g, p));
        for _ in 0..8 {
            assert_legal(&decide(&mut random, &g, p));
        }
    }
}

#[test]
fn expert_is_deterministic_across_instances() {
    let mut a = ExpertPolicy::default();
    let mut b = ExpertPolicy::default();
    for (g, p) in fixture_grids().into_iter().cycle().take(40) {
        assert_eq!(decide(&mut a, &g, p), decide(&mut b, &g, p));
    }
}

#[test]
fn random_is_seed_deterministic() {
    let (g, p) = with_player(flat(), 12, 3);
    let mut a = RandomPolicy::new(42);
    let mut b = RandomPolicy::new(42);
    let xs: Vec<Decision> = (0..64).map(|_| decide(&mut a, &g, p)).collect();
    let ys: Vec<Decision> = (0..64).map(|_| decide(&mut b, &g, p)).collect();
    assert_eq!(xs, ys);
    assert!(xs.iter().all(|d| d.kind == DecisionKind::Random));
}

#[test]
fn deciding_does_not_touch_the_grid() {
    let mut expert = ExpertPolicy::default();
    for (g, p) in fixture_grids() {
        let before = g;
        let _ = decide(&mut expert, &g, p);
        assert_eq!(g.cells(), before.cells());
    }
}

#[test]
fn reset_clears_block_budget() {
    let (mut g, p) = with_player(flat(), 12, 4);
    g.set(8, 4, tile::SPECIAL_BLOCK);
    let mut expert = ExpertPolicy::default();
    for _ in 0..5 {
        decide(&mut expert, &g, p);
    }
    assert!(expert.is_cooling_down());
    expert.reset();
    assert_eq!(expert.attempts(), 0);
    assert!(!expert.is_cooling_down());
    assert_eq!(decide(&mut expert, &g, p).kind, DecisionKind::Block);
}

// ---------------------------------------------------------------------------
// Priority ladder
// ---------------------------------------------------------------------------

#[test]
fn block_outranks_wall() {
    let (mut g, p) = with_player(flat(), 12, 4);
    g.set(8, 4, tile::SPECIAL_BLOCK);
    for r in 11..14 {
        g.set(r, 6, tile::WALL);
    }
    let mut expert = ExpertPolicy::default();
    assert_eq!(decide(&mut expert, &g, p).kind, DecisionKind::Block);
}

#[test]
fn wall_outranks_tunnel_in_the_same_column() {
    let (mut g, p) = with_player(flat(), 12, 3);
    g.set(11, 5, tile::WALL);
    g.set(12, 5, tile::WALL);
    g.set(13, 5, tile::TUNNEL);
    let mut expert = ExpertPolicy::default();
    let d = decide(&mut expert, &g, p);
    assert_eq!(d.kind, DecisionKind::Wall);
}

#[test]
fn tunnel_on_the_player_row_jumps() {
    let (mut g, p) = with_player(flat(), 12, 3);
    for r in 11..14 {
        g.set(r, 5, tile::TUNNEL);
        g.set(r, 6, tile::TUNNEL);
    }
    let mut expert = ExpertPolicy::default();
    let d = decide(&mut expert, &g, p);
    assert_eq!(d.kind, DecisionKind::Tunnel);
    // 2.0 + (12.5 - 11) = 3.5 -> 21
    assert_eq!(
        d.commands,
        vec![Command::Hold(ActionCommand::new(ButtonSet::JUMP_RIGHT, 21).unwrap())]
    );
}

#[test]
fn airborne_hazard_anywhere_triggers_the_hazard_branch() {
    let (mut g, p) = with_player(flat(), 12, 3);
    g.set(2, 12, tile::AIRBORNE_HAZARD);
    g.set(8, 3, tile::SPECIAL_BLOCK);
    let mut expert = ExpertPolicy::default();
    let d = decide(&mut expert, &g, p);
    assert_eq!(d.kind, DecisionKind::HazardWait);
    assert_eq!(
        d.commands,
        vec![Command::Release {
            buttons: ButtonSet::HORIZONTAL,
            ticks: 0
        }]
    );
}

// ---------------------------------------------------------------------------
// End-to-end decision scenario
// ---------------------------------------------------------------------------

#[test]
fn open_flat_ground_runs_right_without_hold() {
    let g = flat();
    let mut expert = ExpertPolicy::default();
    let d = decide(&mut expert, &g, Position::new(2.0, 10.0));
    assert_eq!(d.kind, DecisionKind::Run);
    assert_eq!(
        d.commands,
        vec![Command::Hold(ActionCommand::new(ButtonSet::RIGHT, 0).unwrap())]
    );
}
