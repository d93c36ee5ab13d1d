//! Idle/demo mode - a bot that plays the game
//!
//! Taps the head tile once its bottom edge crosses a reaction line near the
//! bottom of the play area. A seeded miss chance makes it fail eventually.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, Tile};
use super::tick::Tap;
use crate::tuning::Tuning;

/// Default reaction line as a fraction of the play area height
pub const DEFAULT_REACTION: f32 = 0.75;

#[derive(Debug, Clone)]
pub struct Autoplay {
    rng: Pcg32,
    /// Probability (0-1) that a tap goes to the wrong column
    miss_chance: f64,
    reaction: f32,
}

impl Autoplay {
    pub fn new(seed: u64, miss_chance: f32) -> Self {
        let miss_chance = if miss_chance.is_finite() {
            miss_chance.clamp(0.0, 1.0) as f64
        } else {
            0.0
        };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            miss_chance,
            reaction: DEFAULT_REACTION,
        }
    }

    /// Move the reaction line (fraction of the play area, clamped to 0-1)
    pub fn with_reaction(mut self, reaction: f32) -> Self {
        if reaction.is_finite() {
            self.reaction = reaction.clamp(0.0, 1.0);
        }
        self
    }

    /// Pick this tick's tap, if any
    pub fn decide(&mut self, state: &GameState, tuning: &Tuning, play_area_height: f32) -> Option<Tap> {
        if !state.accepts_input() {
            return None;
        }
        let head = state.head()?;
        if head.bottom(tuning.tile_height) < play_area_height * self.reaction {
            return None;
        }

        if self.rng.random_bool(self.miss_chance) {
            // Wrong column if there is one, otherwise a stale index
            let tap = if tuning.column_count > 1 {
                let shift = self.rng.random_range(1..tuning.column_count);
                let column = ((head.column as u16 + shift as u16) % tuning.column_count as u16) as u8;
                Tap {
                    tile: Tile::new(column, head.y),
                    index: 0,
                }
            } else {
                Tap {
                    tile: *head,
                    index: 1,
                }
            };
            log::debug!("Autoplay fumbles: {:?}", tap);
            return Some(tap);
        }

        Some(Tap {
            tile: *head,
            index: 0,
        })
    }
}
