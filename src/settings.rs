//! Game settings and preferences
//!
//! Held in memory for the session; the host app decides where they live.

use serde::{Deserialize, Serialize};

use crate::consts::ANONYMOUS_PLAYER;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Feedback ===
    /// Vibrate on taps and failure (still suppressed in silent mode)
    pub vibration_enabled: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Scoreboard ===
    /// Name pre-filled when submitting a score
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vibration_enabled: true,

            master_volume: 1.0,
            sfx_volume: 1.0,
            // Background track sits well under the tap effect
            music_volume: 0.2,

            player_name: String::new(),
        }
    }
}

impl Settings {
    /// Name to record for a score: trimmed, or "Anonymous" when blank
    pub fn display_name(&self) -> String {
        normalize_player_name(&self.player_name)
    }
}

/// Trim a submitted name, falling back to "Anonymous"
pub fn normalize_player_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        ANONYMOUS_PLAYER.to_string()
    } else {
        trimmed.to_string()
    }
}
