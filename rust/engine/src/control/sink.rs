// rust/engine/src/control/sink.rs
#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

use super::emulator::{Frame, GameStats};

/// Receives one frame per control-loop iteration (video recording lives behind this).
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    /// When false the controller skips grabbing frames entirely.
    fn enabled(&self) -> bool {
        true
    }
}

/// Receives the final stats once per episode.
pub trait ResultSink {
    fn write_result(&mut self, stats: &GameStats) -> Result<()>;
}

pub struct NoopFrameSink;

impl FrameSink for NoopFrameSink {
    fn write_frame(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }

    fn enabled(&self) -> bool {
        false
    }
}

pub struct NoopResultSink;

impl ResultSink for NoopResultSink {
    fn write_result(&mut self, _stats: &GameStats) -> Result<()> {
        Ok(())
    }
}

/// Writes `results.json` into a directory, creating it if needed.
pub struct JsonResultSink {
    dir: PathBuf,
}

impl JsonResultSink {
    pub const FILE_NAME: &'static str = "results.json";

    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(Self::FILE_NAME)
    }
}

impl ResultSink for JsonResultSink {
    fn write_result(&mut self, stats: &GameStats) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let text = serde_json::to_string_pretty(stats).map_err(EngineError::ResultEncode)?;
        fs::write(self.path(), text)?;
        tracing::info!(path = %self.path().display(), "wrote result record");
        Ok(())
    }
}
