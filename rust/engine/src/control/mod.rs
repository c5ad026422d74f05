// rust/engine/src/control/mod.rs
#![forbid(unsafe_code)]

mod actuator;
mod controller;
mod emulator;
mod sink;

/**
 * Control loop and its collaborators.
 *
 * The emulator is reached only through `Emulator`; recording and result
 * persistence only through the sink traits.
 */
pub use actuator::{ActuatorConfig, InputActuator};
pub use controller::{Controller, EpisodeReport};
pub use emulator::{Emulator, Frame, GameStats};
pub use sink::{FrameSink, JsonResultSink, NoopFrameSink, NoopResultSink, ResultSink};
