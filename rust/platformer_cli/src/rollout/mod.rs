// rust/platformer_cli/src/rollout/mod.rs
#![forbid(unsafe_code)]

pub mod runner;
pub mod sinks;
pub mod stats;

pub use runner::{LevelSource, Runner, RunnerConfig};
pub use sinks::{NoopSink, RolloutSink, TableSink};
