//! Tile Tapper - a four-column reflex game
//!
//! Core modules:
//! - `sim`: Game-state engine (spawning, motion, taps, pause, game over)
//! - `feedback`: Capability interface for audio/haptic side effects
//! - `audio` / `haptics`: Device-side feedback managers
//! - `highscores` / `persistence`: Local leaderboard with versioned saves
//! - `tuning`: Engine parameters
//! - `settings`: Player preferences

pub mod audio;
pub mod error;
pub mod feedback;
pub mod haptics;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{PersistError, TuningError};
pub use feedback::{DeviceFeedback, FeedbackEvent, FeedbackSink, NullFeedback, RecordingFeedback};
pub use highscores::{HighScores, LocalScoreStore, ScoreStore};
pub use settings::Settings;
pub use sim::{GameEngine, GamePhase, GameState, Tile};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta the driver will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Number of lanes tiles can fall in
    pub const COLUMN_COUNT: u8 = 4;
    /// Tile height, also the vertical gap between consecutive spawns
    pub const TILE_HEIGHT: f32 = 300.0;
    /// Starting fall speed (pixels per tick)
    pub const BASE_SPEED: f32 = 10.0;
    /// Speed added on every accepted update (pixels per tick)
    pub const SPEED_INCREMENT: f32 = 0.02;

    /// Name recorded when the player leaves the name field blank
    pub const ANONYMOUS_PLAYER: &str = "Anonymous";
}

/// Current time as Unix milliseconds (0 if the clock is before the epoch)
pub fn now_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
