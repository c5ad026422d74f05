// rust/engine/tests/control_loop_e2e.rs
#![forbid(unsafe_code)]

/**
 * End-to-end control loop on the headless tile world.
 *
 * Purpose:
 * - Drive `Controller` + `ExpertPolicy` + `InputActuator` against `TileWorld`
 *   and check episode-level outcomes rather than individual decisions.
 *
 * Scenarios covered:
 * - Flat level: every decision is a plain run and the goal is reached.
 * - Single wall: the expert jumps it and still finishes.
 * - Pit with a run-only policy: the episode ends in death, not a hang.
 * - Generated levels: episodes end in completion or death well inside the
 *   tick limit, and are reproducible per seed.
 * - An airborne hazard on screen is waited out, not waited on forever.
 * - Hitting the world's own tick limit counts as truncation.
 * - Sinks: frames per step, results.json written once.
 */
use platformer_engine::{
    tile, ActionCommand, ActuatorConfig, ButtonSet, Command, Controller, Decision, DecisionKind,
    Emulator, EpisodeReport, ExpertPolicy, Frame, FrameSink, JsonResultSink, Level, LevelGen, NoopFrameSink,
    NoopResultSink, Observation, Policy, Result, TileWorld, WorldConfig, H,
};
use serde_json::json;

/// Ground on rows 14..16, player at (12, 2), goal at column `goal`.
fn level(width: usize, goal: usize, extra: &[(usize, usize, char)]) -> Level {
    let mut rows: Vec<Vec<char>> = (0..H)
        .map(|r| (0..width).map(|_| if r >= 14 { '#' } else { '.' }).collect())
        .collect();
    rows[12][2] = 'M';
    rows[0][goal] = '|';
    for &(r, c, g) in extra {
        rows[r][c] = g;
    }
    let text: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
    Level::parse(&text.join("\n")).unwrap()
}

fn play<P: Policy>(lvl: Level, policy: P, max_ticks: u64) -> EpisodeReport {
    let world = TileWorld::new(
        lvl,
        WorldConfig {
            max_ticks,
            ..WorldConfig::default()
        },
    );
    let mut ctl = Controller::new(world, policy, ActuatorConfig::default()).with_max_ticks(max_ticks);
    ctl.play(&mut NoopFrameSink, &mut NoopResultSink).unwrap()
}

/// Holds Right forever.
struct RunOnly;

impl Policy for RunOnly {
    fn decide(&mut self, _obs: &Observation<'_>) -> Decision {
        Decision::new(
            DecisionKind::Run,
            vec![Command::Hold(ActionCommand::new(ButtonSet::RIGHT, 0).unwrap())],
        )
    }
}

#[test]
fn flat_level_is_a_straight_run_to_the_goal() {
    let r = play(level(40, 35, &[]), ExpertPolicy::default(), 5_000);

    assert_eq!(r.stats["level_complete"], json!(true));
    assert_eq!(r.stats["dead"], json!(false));
    assert!(!r.truncated);
    assert_eq!(r.decisions.get(DecisionKind::Run), r.steps);
    // One column per 3 ticks from column 2 to 34; zero-hold runs add no ticks.
    assert_eq!(r.ticks, 96);
    assert_eq!(r.stats["distance"], json!(34));
}

#[test]
fn single_wall_is_jumped() {
    let r = play(
        level(40, 35, &[(12, 12, 'W'), (13, 12, 'W')]),
        ExpertPolicy::default(),
        5_000,
    );
    assert!(r.decisions.get(DecisionKind::Wall) >= 1);
    assert_eq!(r.stats["level_complete"], json!(true));
    assert_eq!(r.stats["dead"], json!(false));
}

#[test]
fn running_into_a_pit_ends_the_episode() {
    let pit: Vec<(usize, usize, char)> = (8..11)
        .flat_map(|c| [(14, c, '.'), (15, c, '.')])
        .collect();
    let r = play(level(40, 35, &pit), RunOnly, 5_000);
    assert_eq!(r.stats["dead"], json!(true));
    assert_eq!(r.stats["level_complete"], json!(false));
    assert!(r.ticks < 200);
}

#[test]
fn stale_position_survives_death() {
    let pit: Vec<(usize, usize, char)> = (8..11)
        .flat_map(|c| [(14, c, '.'), (15, c, '.')])
        .collect();
    let world = TileWorld::new(level(40, 35, &pit), WorldConfig::default());
    let mut ctl = Controller::new(world, RunOnly, ActuatorConfig::default());
    ctl.begin();
    while !ctl.is_done() {
        ctl.step();
    }
    // The player is no longer drawn, but the tracker keeps its last fix.
    assert!(!ctl.emulator().game_area().contains(tile::PLAYER));
    let last = ctl.player();
    ctl.step();
    assert_eq!(ctl.player(), last);
    assert!(last.x > 0.0 && last.y > 10.0);
}

#[test]
fn generated_levels_end_in_a_result() {
    let gen = LevelGen::new(120);
    for seed in 0..6u64 {
        let r = play(gen.generate(seed), ExpertPolicy::default(), 20_000);
        let complete = r.stats["level_complete"] == json!(true);
        let dead = r.stats["dead"] == json!(true);
        assert!(complete || dead, "seed {seed}: {:?}", r.stats);
        assert!(!r.truncated, "seed {seed}");
        assert!(r.ticks < 20_000, "seed {seed}: {} ticks", r.ticks);
        assert!(r.stats["distance"].as_u64().unwrap_or(0) > 2, "seed {seed}");
        assert_eq!(r.decisions.total(), r.steps);
    }
}

#[test]
fn airborne_hazard_does_not_stall_the_expert() {
    let r = play(level(60, 55, &[(11, 18, 'f')]), ExpertPolicy::default(), 5_000);
    let complete = r.stats["level_complete"] == json!(true);
    let dead = r.stats["dead"] == json!(true);
    assert!(complete || dead, "{:?}", r.stats);
    assert!(r.ticks < 1_000, "{} ticks", r.ticks);
    assert!(r.decisions.get(DecisionKind::HazardWait) < r.steps);
}

#[test]
fn world_tick_limit_marks_the_episode_truncated() {
    // Standing still never wins or dies; the world's own limit ends it.
    struct Idle;
    impl Policy for Idle {
        fn decide(&mut self, _obs: &Observation<'_>) -> Decision {
            Decision::new(DecisionKind::HazardWait, vec![Command::Wait(0)])
        }
    }
    let r = play(level(40, 35, &[]), Idle, 300);
    assert_eq!(r.stats["ticks"], json!(300));
    assert_eq!(r.stats["level_complete"], json!(false));
    assert_eq!(r.stats["dead"], json!(false));
    assert!(r.truncated);
}

#[test]
fn episodes_are_reproducible_per_seed() {
    let gen = LevelGen::new(100);
    let a = play(gen.generate(9), ExpertPolicy::default(), 2_000);
    let b = play(gen.generate(9), ExpertPolicy::default(), 2_000);
    assert_eq!(a.ticks, b.ticks);
    assert_eq!(a.steps, b.steps);
    assert_eq!(a.decisions, b.decisions);
    assert_eq!(a.stats, b.stats);
}

#[derive(Default)]
struct CountingFrames {
    frames: u64,
    last: Frame,
}

impl FrameSink for CountingFrames {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.frames += 1;
        self.last = frame.clone();
        Ok(())
    }
}

#[test]
fn sinks_see_every_step_and_the_final_stats() {
    let dir = std::env::temp_dir().join(format!("platformer_e2e_{}", std::process::id()));
    let mut frames = CountingFrames::default();
    let mut results = JsonResultSink::new(&dir);

    let world = TileWorld::new(level(40, 20, &[]), WorldConfig::default());
    let mut ctl = Controller::new(world, ExpertPolicy::default(), ActuatorConfig::default());
    let r = ctl.play(&mut frames, &mut results).unwrap();

    assert_eq!(frames.frames, r.steps);
    assert_eq!((frames.last.width, frames.last.height), (160, 128));

    let text = std::fs::read_to_string(results.path()).unwrap();
    let back: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back["level_complete"], json!(true));
    assert_eq!(back["score"], r.stats["score"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replaying_resets_the_world() {
    let world = TileWorld::new(level(40, 20, &[(9, 6, '?')]), WorldConfig::default());
    let mut ctl = Controller::new(world, ExpertPolicy::default(), ActuatorConfig::default());
    let first = ctl.play(&mut NoopFrameSink, &mut NoopResultSink).unwrap();
    let second = ctl.play(&mut NoopFrameSink, &mut NoopResultSink).unwrap();
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.decisions, second.decisions);
}
