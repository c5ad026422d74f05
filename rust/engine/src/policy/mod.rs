// rust/engine/src/policy/mod.rs
#![forbid(unsafe_code)]

mod base;
mod expert;
mod random;

/**
 * Curated policy public API.
 *
 * Internal implementation modules remain private; only stable policy entrypoints are re-exported.
 */
pub use base::{Decision, DecisionCounts, DecisionKind, Observation, Policy};
pub use expert::{ExpertConfig, ExpertPolicy};
pub use random::RandomPolicy;
