//! Fixed timestep tick driver
//!
//! The engine never owns a loop. This module is the explicit driver: it turns
//! variable frame times into whole ticks and applies one-shot inputs before
//! spawning and moving tiles, all on one control path.

use super::engine::{GameEngine, TapOutcome};
use super::state::Tile;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::feedback::FeedbackSink;

/// A tap on a rendered tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Tile as the renderer last saw it
    pub tile: Tile,
    /// Position of `tile` in the renderer's list
    pub index: usize,
}

/// Input commands for a single tick (one-shot, cleared after use)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub tap: Option<Tap>,
    pub pause: bool,
    pub resume: bool,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.tap.is_none() && !self.pause && !self.resume
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Advance the game by one tick. Returns the tap outcome if a tap was applied.
pub fn tick<F: FeedbackSink>(
    engine: &mut GameEngine<F>,
    input: &TickInput,
    play_area_height: f32,
) -> Option<TapOutcome> {
    if input.resume {
        engine.resume_game();
    }
    if input.pause {
        engine.pause_game();
    }

    let outcome = input.tap.map(|tap| engine.handle_tap(&tap.tile, tap.index));

    engine.spawn_tile();
    engine.update_tiles(play_area_height);
    outcome
}

/// Accumulator that converts frame deltas into fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame delta (seconds) and return how many ticks to run now.
    /// Long frames are clamped and at most `MAX_SUBSTEPS` ticks run per frame
    /// to prevent spiral of death.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop whatever the substep cap could not absorb
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Fraction of a tick left over (0..1), for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
