// rust/platformer_cli/src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use platformer_engine::{
    ActuatorConfig, Controller, Emulator, JsonResultSink, Level, LevelGen, NoopResultSink, Policy,
    ResultSink, TileWorld, WorldConfig,
};

use super::sinks::{ReportRow, RolloutSink};
use super::stats::{FinalReport, RolloutStats};

/// Fixed internal cadence (in decisions) for progress-bar live message updates.
const LIVE_EVERY: u64 = 200;

/// Where each episode's level comes from.
#[derive(Clone, Debug)]
pub enum LevelSource {
    /// Same level every episode.
    Fixed(Level),
    /// A fresh level per episode, seeded with the episode seed.
    Generated(LevelGen),
}

impl LevelSource {
    fn level(&self, seed: u64) -> Level {
        match self {
            LevelSource::Fixed(level) => level.clone(),
            LevelSource::Generated(gen) => gen.generate(seed),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    pub episodes: u64,
    /// Base seed; each episode uses base_seed + episode_id.
    pub base_seed: u64,

    /// Used only for the final report string.
    pub policy_name: String,

    // ---------------- world ----------------
    pub level: LevelSource,
    pub world: WorldConfig,
    pub actuator: ActuatorConfig,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic table (via sink)
    pub verbosity: u8,

    /// Print a table row every N episodes (only used when verbosity == 2).
    /// 0 disables table reporting.
    pub report_every: u64,

    /// Where the last episode's results.json goes, if anywhere.
    pub results_dir: Option<PathBuf>,

    // ---------------- rendering ----------------
    /// If Some(ms): render every decision; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

pub struct Runner {
    cfg: RunnerConfig,
    sink: Box<dyn RolloutSink>,
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Box<dyn RolloutSink>) -> Self {
        Self { cfg, sink }
    }

    pub fn run(&mut self, policy: &mut dyn Policy) -> platformer_engine::Result<FinalReport> {
        let cfg = self.cfg.clone();

        // Progress bar is UI only; runner logic does not depend on it.
        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(cfg.episodes);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>5}/{len:<5}  {percent:>3}%  {elapsed_precise}  {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RolloutStats::new();

        for episode_id in 0..cfg.episodes {
            let seed = cfg.base_seed.wrapping_add(episode_id);
            let world = TileWorld::new(cfg.level.level(seed), cfg.world);
            let mut ctl = Controller::new(world, &mut *policy, cfg.actuator)
                .with_max_ticks(cfg.world.max_ticks);

            // ------------------------------------------------------------
            // One episode: begin, step until game over, finish.
            // ------------------------------------------------------------
            ctl.begin();
            if cfg.render_ms.is_some() {
                println!("=== episode {} seed={} ===", episode_id, seed);
                print!("{}", ctl.emulator().game_area().render_ascii());
            }

            let mut steps: u64 = 0;
            while !ctl.is_done() {
                let (decision, grid) = ctl.step();
                steps += 1;

                if let Some(ms) = cfg.render_ms {
                    println!(
                        "episode={} tick={} decision={} player=({:.1},{:.1})",
                        episode_id,
                        ctl.ticks(),
                        decision.kind.name(),
                        ctl.player().x,
                        ctl.player().y,
                    );
                    print!("{}", grid.render_ascii());
                    if ms > 0 {
                        std::thread::sleep(Duration::from_millis(ms));
                    }
                }

                if let Some(ref pb) = pb {
                    if steps % LIVE_EVERY == 0 {
                        pb.set_message(format!("ep={} tick={}", episode_id, ctl.ticks()));
                    }
                }
            }

            // Only the last episode's stats land in results.json.
            let last = episode_id + 1 == cfg.episodes;
            let mut results: Box<dyn ResultSink> = match &cfg.results_dir {
                Some(dir) if last => Box::new(JsonResultSink::new(dir)),
                _ => Box::new(NoopResultSink),
            };
            let report = ctl.finish(&mut *results)?;
            stats.on_episode_end(&report);

            if let Some(ref pb) = pb {
                pb.inc(1);
                pb.set_message(stats.live_msg());
            }

            // ------------------------------------------------------------
            // Periodic table report (verbosity == 2 only).
            // ------------------------------------------------------------
            if cfg.verbosity == 2
                && cfg.report_every > 0
                && stats.episodes_finished % cfg.report_every == 0
            {
                let row = ReportRow {
                    episode: stats.episodes_finished,
                    episodes_total: cfg.episodes,
                    tps: stats.ticks_per_sec(),

                    completions: stats.completions,
                    deaths: stats.deaths,

                    avg_score: stats.avg_score(),
                    avg_coins: stats.avg_coins(),
                    avg_distance: stats.avg_distance(),
                    max_distance: stats.max_distance,
                };
                self.sink.on_report_row(&row, pb.as_ref());
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        Ok(stats.final_report(&cfg.policy_name))
    }
}
