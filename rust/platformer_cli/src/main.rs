// rust/platformer_cli/src/main.rs
#![forbid(unsafe_code)]

mod rollout;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::rollout::{LevelSource, NoopSink, RolloutSink, Runner, RunnerConfig, TableSink};
use platformer_engine::{
    ControllerConfig, ExpertPolicy, Level, LevelGen, Policy, RandomPolicy, WorldConfig,
};

#[derive(Parser, Debug)]
#[command(name = "platformer_cli")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Number of episodes to play.
    #[arg(long, default_value_t = 5)]
    episodes: u64,

    /// Base RNG seed (episodes use base_seed + episode_id). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy: expert | random
    #[arg(long, default_value = "expert")]
    policy: String,

    // ---------------- world ----------------
    /// Level text file. If omitted, every episode plays a freshly generated level.
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,

    /// Width of generated levels in columns.
    #[arg(long, default_value_t = 200)]
    level_len: usize,

    /// Tick limit per episode.
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// JSON file overriding policy / actuator tunables. Missing fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    // ---------------- visualization ----------------
    /**
     * Render the tile grid as ASCII on every decision; value is sleep in ms.
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic table.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a table row every N episodes (only used with --verbosity 2).
    #[arg(long, default_value_t = 1)]
    report_every: u64,

    /// Directory for results.json (final stats of the last episode).
    #[arg(long, value_name = "DIR")]
    results_dir: Option<PathBuf>,
}

fn init_tracing() {
    // Diagnostics go to stderr; stdout belongs to rendering and the summary.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let base_seed = args.seed.unwrap_or(12345);

    let tunables = match &args.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControllerConfig::default(),
    };

    let level = match &args.level {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading level {}", path.display()))?;
            let level = Level::parse(&text)
                .with_context(|| format!("parsing level {}", path.display()))?;
            LevelSource::Fixed(level)
        }
        None => LevelSource::Generated(LevelGen::new(args.level_len)),
    };

    // Boxed so the CLI can switch implementations at runtime.
    let mut policy: Box<dyn Policy> = match args.policy.as_str() {
        "expert" => Box::new(ExpertPolicy::new(tunables.expert.clone())),
        "random" => Box::new(RandomPolicy::new(base_seed.wrapping_add(999))),
        other => anyhow::bail!("unknown policy {other:?} (expected expert | random)"),
    };

    tracing::info!(
        policy = %args.policy,
        episodes = args.episodes,
        base_seed,
        fixed_level = args.level.is_some(),
        "starting rollout"
    );

    let cfg = RunnerConfig {
        episodes: args.episodes,
        base_seed,
        policy_name: args.policy.clone(),

        level,
        world: WorldConfig {
            max_ticks: args.max_ticks,
            ..WorldConfig::default()
        },
        actuator: tunables.actuator,

        render_ms: args.render,

        verbosity: args.verbosity,
        report_every: args.report_every,
        results_dir: args.results_dir.clone(),
    };

    // Reporting sink:
    // - verbosity 2 => periodic table (unless report_every == 0)
    // - otherwise   => no-op
    let sink: Box<dyn RolloutSink> = if cfg.verbosity >= 2 && cfg.report_every > 0 {
        Box::new(TableSink::new(20))
    } else {
        Box::new(NoopSink)
    };

    let mut runner = Runner::new(cfg, sink);
    let report = runner.run(&mut *policy).context("rollout failed")?;

    // Final one-line summary (useful for logs / grep).
    println!(
        "DONE: policy={} episodes={} elapsed={:.3}s ticks={} ticks/s={:.1} completed={} deaths={} truncated={} avg_score={:.1} avg_coins={:.2} avg_distance={:.1} max_distance={} decisions=[{}] (last_score={} last_complete={})",
        report.policy,
        report.episodes,
        report.elapsed_s,
        report.total_ticks,
        report.ticks_per_s,
        report.completions,
        report.deaths,
        report.truncations,
        report.avg_score,
        report.avg_coins,
        report.avg_distance,
        report.max_distance,
        report.decisions,
        report.last_score,
        report.last_complete,
    );
    Ok(())
}
