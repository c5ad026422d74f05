// rust/engine/src/error.rs
#![forbid(unsafe_code)]

use thiserror::Error;

use crate::engine::ButtonSet;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("conflicting directions in button set {0}")]
    ConflictingButtons(ButtonSet),

    #[error("level row {row} has width {width}, expected {expected}")]
    RaggedLevel {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("level has {rows} rows, expected {expected}")]
    LevelHeight { rows: usize, expected: usize },

    #[error("unknown level glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },

    #[error("level has no player start")]
    MissingStart,

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("encoding result record: {0}")]
    ResultEncode(#[source] serde_json::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
