// rust/engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod policy;
pub mod sim;

pub use config::ControllerConfig;
pub use control::{
    ActuatorConfig, Controller, Emulator, EpisodeReport, Frame, FrameSink, GameStats, InputActuator,
    JsonResultSink, NoopFrameSink, NoopResultSink, ResultSink,
};
pub use engine::{
    tile, ActionCommand, Button, ButtonSet, Cell, Command, InputEvent, Obstacle, PlayerTracker,
    Position, TileGrid, H, W,
};
pub use error::{EngineError, Result};
pub use policy::{
    Decision, DecisionCounts, DecisionKind, ExpertConfig, ExpertPolicy, Observation, Policy,
    RandomPolicy,
};
pub use sim::{Level, LevelGen, TileWorld, WorldConfig};
