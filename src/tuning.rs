//! Engine tuning parameters
//!
//! The values the engine is constructed with. Defaults match the shipped game;
//! tests and the headless runner override them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Fixed engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of columns tiles spawn in
    pub column_count: u8,
    /// Tile height in pixels (also the spawn gap)
    pub tile_height: f32,
    /// Speed at reset (pixels per tick)
    pub base_speed: f32,
    /// Speed gained per accepted update (pixels per tick)
    pub speed_increment: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            column_count: COLUMN_COUNT,
            tile_height: TILE_HEIGHT,
            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
        }
    }
}

impl Tuning {
    /// Check that the engine can run with these parameters
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.column_count == 0 {
            return Err(TuningError::NoColumns);
        }
        if !self.tile_height.is_finite() || self.tile_height <= 0.0 {
            return Err(TuningError::TileHeight(self.tile_height));
        }
        if !self.base_speed.is_finite() || self.base_speed < 0.0 {
            return Err(TuningError::BaseSpeed(self.base_speed));
        }
        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            return Err(TuningError::SpeedIncrement(self.speed_increment));
        }
        Ok(())
    }

    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }
}
