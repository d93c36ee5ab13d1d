//! Error types for the configuration and persistence layers
//!
//! The engine itself never fails; these only surface from loading tuning
//! files and reading/writing the leaderboard.

use thiserror::Error;

/// Rejected engine parameters
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("column count must be at least 1")]
    NoColumns,
    #[error("tile height must be positive and finite, got {0}")]
    TileHeight(f32),
    #[error("base speed must be finite and not negative, got {0}")]
    BaseSpeed(f32),
    #[error("speed increment must be finite and not negative, got {0}")]
    SpeedIncrement(f32),
    #[error("malformed tuning file")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Failure while loading or saving persisted data
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("JSON error")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
