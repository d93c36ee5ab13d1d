//! Game-state engine
//!
//! Owns the canonical [`GameState`] and applies every mutation: spawning,
//! per-tick motion, tap resolution, pause/resume and reset. All mutators take
//! `&mut self`, so spawn/update/tap are linearized by construction; readers
//! borrow the state or clone a snapshot.
//!
//! Paused and game-over states turn spawn/update/tap into no-ops, which keeps a
//! still-running frame driver harmless.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::observer::{SubscriptionId, Subscribers};
use super::state::{GamePhase, GameState, Tile};
use crate::error::TuningError;
use crate::feedback::{FeedbackSink, NullFeedback};
use crate::tuning::Tuning;

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Paused or game over, nothing happened
    Ignored,
    /// Head tile removed, score +1
    Hit,
    /// Wrong or stale tap, game over
    Miss,
}

/// The game-state engine
#[derive(Debug)]
pub struct GameEngine<F: FeedbackSink = NullFeedback> {
    state: GameState,
    /// Countdown enforcing spawn spacing; may dip below zero
    spawn_buffer: f32,
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    feedback: F,
    subscribers: Subscribers,
}

impl GameEngine<NullFeedback> {
    /// Engine with default tuning and no feedback devices
    pub fn headless(seed: u64) -> Self {
        Self::new(seed, NullFeedback)
    }
}

impl<F: FeedbackSink> GameEngine<F> {
    /// Create an engine with default tuning
    pub fn new(seed: u64, feedback: F) -> Self {
        Self::build(Tuning::default(), seed, feedback)
    }

    /// Create an engine with overridden parameters
    pub fn with_tuning(tuning: Tuning, seed: u64, feedback: F) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, seed, feedback))
    }

    fn build(tuning: Tuning, seed: u64, feedback: F) -> Self {
        Self {
            state: GameState::new(tuning.base_speed),
            spawn_buffer: 0.0,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            feedback,
            subscribers: Subscribers::new(),
        }
    }

    // === Read access ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn spawn_buffer(&self) -> f32 {
        self.spawn_buffer
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    // === Subscriptions ===

    /// Register a callback that receives every committed snapshot
    pub fn subscribe(&mut self, callback: impl FnMut(&GameState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn publish(&mut self) {
        self.subscribers.publish(&self.state);
    }

    // === Lifecycle ===

    /// Session entry hook: starts ambient audio, leaves the state alone
    pub fn start(&mut self) {
        self.feedback.on_session_start();
        if !self.state.started {
            log::info!("Session started (seed {})", self.seed);
            self.state.started = true;
            self.publish();
        }
    }

    /// Back to initial values: no tiles, score 0, base speed, flags cleared
    pub fn reset(&mut self) {
        log::info!("Game reset (final score {})", self.state.score);
        self.feedback.on_session_reset();
        self.state = GameState::new(self.tuning.base_speed);
        self.spawn_buffer = 0.0;
        self.publish();
    }

    /// Replace the whole state, e.g. to continue a saved game
    pub fn load_state(&mut self, state: GameState) {
        self.state = state;
        self.spawn_buffer = 0.0;
        self.publish();
    }

    pub fn pause_game(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.is_paused = true;
        self.feedback.on_pause_audio();
        self.publish();
    }

    pub fn resume_game(&mut self) {
        self.state.is_paused = false;
        self.feedback.on_resume_audio();
        self.publish();
    }

    // === Per-tick operations ===

    /// Spawn a tile above the newest one if the spawn buffer has run out.
    /// Returns true if a tile was added.
    pub fn spawn_tile(&mut self) -> bool {
        if self.spawn_buffer > 0.0 || !self.state.accepts_input() {
            return false;
        }

        let column = self.rng.random_range(0..self.tuning.column_count);
        // Stack on the newest tile so the gap stays exactly one tile height
        // no matter how irregular the spawn cadence was
        let y = match self.state.tail() {
            Some(last) => -self.tuning.tile_height + last.y,
            None => -self.tuning.tile_height,
        };

        log::debug!("Spawn tile: column {} at y {:.1}", column, y);
        self.state.tiles.push(Tile::new(column, y));
        self.state.started = true;
        self.spawn_buffer = self.tuning.tile_height;
        self.publish();
        true
    }

    /// Advance every tile by the current speed, detect overflow, ramp speed
    pub fn update_tiles(&mut self, play_area_height: f32) {
        if !self.state.accepts_input() {
            return;
        }

        let speed = self.state.speed;
        if self.spawn_buffer > 0.0 {
            self.spawn_buffer -= speed;
        }

        let tiles: Vec<Tile> = self
            .state
            .tiles
            .iter()
            .map(|t| Tile::new(t.column, t.y + speed))
            .collect();
        let game_over = tiles.iter().any(|t| t.y > play_area_height);

        self.state.tiles = tiles;
        self.state.speed = speed + self.tuning.speed_increment;
        self.state.game_over = game_over;
        self.state.started = true;

        if game_over {
            log::info!("Game over: tile passed the bottom edge (score {})", self.state.score);
            self.feedback.on_game_over();
        }
        self.publish();
    }

    /// Resolve a tap on `tile`, found at `index` in the renderer's tile list.
    ///
    /// Correct only when the tap is on index 0 and the column still matches the
    /// head tile, which also catches references that went stale after the
    /// head was removed. Anything else ends the game.
    pub fn handle_tap(&mut self, tile: &Tile, index: usize) -> TapOutcome {
        if !self.state.accepts_input() {
            return TapOutcome::Ignored;
        }

        let correct = index == 0
            && self
                .state
                .head()
                .is_some_and(|head| head.column == tile.column);

        let outcome = if correct {
            self.state.tiles.remove(0);
            self.state.score = self.state.score.saturating_add(1);
            self.feedback.on_tap_success();
            TapOutcome::Hit
        } else {
            log::info!(
                "Game over: wrong tap (column {}, index {}, score {})",
                tile.column,
                index,
                self.state.score
            );
            self.state.game_over = true;
            self.feedback.on_tap_fail();
            TapOutcome::Miss
        };

        self.state.started = true;
        self.publish();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{FeedbackEvent, RecordingFeedback};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn new_engine() -> GameEngine<RecordingFeedback> {
        GameEngine::new(12345, RecordingFeedback::new())
    }

    fn state_with(tiles: &[(u8, f32)], score: u32, speed: f32) -> GameState {
        GameState {
            tiles: tiles.iter().map(|&(c, y)| Tile::new(c, y)).collect(),
            score,
            speed,
            game_over: false,
            is_paused: false,
            started: true,
        }
    }

    #[test]
    fn test_first_spawn() {
        let mut engine = new_engine();
        assert!(engine.spawn_tile());
        let tiles = &engine.state().tiles;
        assert_eq!(tiles.len(), 1);
        assert!(tiles[0].column < 4);
        assert_eq!(tiles[0].y, -300.0);
        assert_eq!(engine.spawn_buffer(), 300.0);
    }

    #[test]
    fn test_spawn_waits_for_buffer() {
        let mut engine = new_engine();
        engine.spawn_tile();
        assert!(!engine.spawn_tile());
        assert_eq!(engine.state().tiles.len(), 1);

        // 30 ticks at >= 10 px/tick drain a 300 px buffer
        for _ in 0..30 {
            engine.update_tiles(10_000.0);
        }
        assert!(engine.spawn_buffer() <= 0.0);
        assert!(engine.spawn_tile());
        let tiles = &engine.state().tiles;
        assert_eq!(tiles.len(), 2);
        assert!((tiles[0].y - tiles[1].y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_gap_is_tile_height() {
        let mut engine = new_engine();
        let mut gaps = Vec::new();
        for _ in 0..600 {
            let before = engine.state().tail().copied();
            if engine.spawn_tile() {
                if let (Some(prev), Some(new)) = (before, engine.state().tail()) {
                    gaps.push(prev.y - new.y);
                }
            }
            engine.update_tiles(1.0e9);
        }
        assert!(gaps.len() > 10);
        for gap in gaps {
            assert!((gap - 300.0).abs() < 1e-2, "gap {}", gap);
        }
    }

    #[test]
    fn test_buffer_goes_negative_unclamped() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(0, 0.0)], 0, 7.0));
        engine.spawn_tile();
        for _ in 0..43 {
            engine.update_tiles(1.0e9);
        }
        assert!(engine.spawn_buffer() < 0.0);
        let buffer = engine.spawn_buffer();
        // Once at or below zero it is left alone until the next spawn
        engine.update_tiles(1.0e9);
        assert_eq!(engine.spawn_buffer(), buffer);
    }

    #[test]
    fn test_update_moves_and_ramps() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(1, 0.0), (2, -300.0)], 0, 10.0));
        engine.update_tiles(800.0);
        let state = engine.state();
        assert_eq!(state.tiles[0].y, 10.0);
        assert_eq!(state.tiles[1].y, -290.0);
        assert!((state.speed - 10.02).abs() < 1e-5);
        assert!(!state.game_over);
    }

    #[test]
    fn test_correct_tap() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(2, 0.0)], 5, 10.0));
        let outcome = engine.handle_tap(&Tile::new(2, 0.0), 0);
        assert_eq!(outcome, TapOutcome::Hit);
        assert_eq!(engine.state().score, 6);
        assert!(engine.state().tiles.is_empty());
        assert_eq!(engine.feedback().events, vec![FeedbackEvent::TapSuccess]);
    }

    #[test]
    fn test_wrong_column_tap() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(2, 0.0)], 5, 10.0));
        let outcome = engine.handle_tap(&Tile::new(1, 0.0), 0);
        assert_eq!(outcome, TapOutcome::Miss);
        let state = engine.state();
        assert!(state.game_over);
        assert_eq!(state.score, 5);
        assert_eq!(state.tiles, vec![Tile::new(2, 0.0)]);
        assert_eq!(engine.feedback().events, vec![FeedbackEvent::TapFail]);
    }

    #[test]
    fn test_tap_wrong_index_or_empty() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(2, 0.0), (2, -300.0)], 0, 10.0));
        // Same column as the head, but not the head
        assert_eq!(engine.handle_tap(&Tile::new(2, -300.0), 1), TapOutcome::Miss);
        assert_eq!(engine.state().tiles.len(), 2);

        let mut engine = new_engine();
        engine.start();
        assert_eq!(engine.handle_tap(&Tile::new(0, 0.0), 0), TapOutcome::Miss);
        assert!(engine.state().game_over);
    }

    #[test]
    fn test_overflow_ends_game_once() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(0, 798.0)], 3, 10.0));
        engine.update_tiles(800.0);
        let state = engine.snapshot();
        assert_eq!(state.tiles[0].y, 808.0);
        assert!(state.game_over);
        assert_eq!(engine.phase(), GamePhase::GameOver);

        // Frozen afterwards
        engine.update_tiles(800.0);
        engine.spawn_tile();
        assert_eq!(engine.handle_tap(&Tile::new(0, 808.0), 0), TapOutcome::Ignored);
        assert_eq!(engine.state(), &state);
        assert_eq!(engine.feedback().count(FeedbackEvent::GameOver), 1);
    }

    #[test]
    fn test_paused_update_is_noop() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(0, 100.0)], 0, 10.0));
        engine.pause_game();
        let before = engine.snapshot();
        engine.update_tiles(800.0);
        engine.spawn_tile();
        engine.handle_tap(&Tile::new(0, 100.0), 0);
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.phase(), GamePhase::Paused);

        engine.resume_game();
        engine.update_tiles(800.0);
        assert_eq!(engine.state().tiles[0].y, 110.0);
        assert_eq!(
            engine.feedback().events,
            vec![FeedbackEvent::PauseAudio, FeedbackEvent::ResumeAudio]
        );
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut engine = new_engine();
        engine.start();
        engine.handle_tap(&Tile::new(0, 0.0), 0);
        engine.pause_game();
        assert!(!engine.state().is_paused);
        assert_eq!(engine.feedback().count(FeedbackEvent::PauseAudio), 0);
    }

    #[test]
    fn test_resume_is_unconditional() {
        let mut engine = new_engine();
        engine.resume_game();
        assert!(!engine.state().is_paused);
        assert_eq!(engine.feedback().count(FeedbackEvent::ResumeAudio), 1);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = new_engine();
        engine.start();
        for _ in 0..100 {
            engine.spawn_tile();
            engine.update_tiles(800.0);
        }
        engine.pause_game();
        engine.reset();

        assert_eq!(engine.state(), &GameState::new(10.0));
        assert_eq!(engine.spawn_buffer(), 0.0);
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.feedback().events.last(), Some(&FeedbackEvent::SessionReset));

        // Playable again
        assert!(engine.spawn_tile());
        assert_eq!(engine.state().tiles[0].y, -300.0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut engine = new_engine();
        engine.load_state(state_with(&[(3, 50.0)], 9, 12.0));
        let before = engine.snapshot();
        engine.start();
        engine.start();
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.feedback().count(FeedbackEvent::SessionStart), 2);
    }

    #[test]
    fn test_phase_transitions() {
        let mut engine = new_engine();
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        engine.start();
        assert_eq!(engine.phase(), GamePhase::Running);
        engine.pause_game();
        assert_eq!(engine.phase(), GamePhase::Paused);
        engine.resume_game();
        assert_eq!(engine.phase(), GamePhase::Running);
        engine.handle_tap(&Tile::new(0, 0.0), 3);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        engine.reset();
        assert_eq!(engine.phase(), GamePhase::NotStarted);

        // First accepted interaction also starts the session
        engine.update_tiles(800.0);
        assert_eq!(engine.phase(), GamePhase::Running);
    }

    #[test]
    fn test_subscribers_see_commits_only() {
        let mut engine = new_engine();
        let lens = Rc::new(RefCell::new(Vec::new()));
        let sink = lens.clone();
        let id = engine.subscribe(move |s| sink.borrow_mut().push(s.tiles.len()));

        engine.spawn_tile();
        engine.spawn_tile(); // buffer blocks this one
        engine.update_tiles(800.0);
        assert_eq!(*lens.borrow(), vec![1, 1]);

        engine.pause_game();
        let published = lens.borrow().len();
        engine.update_tiles(800.0);
        assert_eq!(lens.borrow().len(), published);

        assert!(engine.unsubscribe(id));
        engine.resume_game();
        assert_eq!(lens.borrow().len(), published);
    }

    #[test]
    fn test_same_seed_same_columns() {
        let columns = |seed| {
            let mut engine = GameEngine::headless(seed);
            for _ in 0..400 {
                engine.spawn_tile();
                engine.update_tiles(1.0e9);
            }
            engine.state().tiles.iter().map(|t| t.column).collect::<Vec<_>>()
        };
        assert_eq!(columns(7), columns(7));
        assert!(columns(7).iter().all(|&c| c < 4));
    }

    #[test]
    fn test_custom_tuning() {
        let tuning = Tuning {
            column_count: 6,
            tile_height: 100.0,
            base_speed: 4.0,
            speed_increment: 0.5,
        };
        let mut engine = GameEngine::with_tuning(tuning, 1, NullFeedback).unwrap();
        engine.spawn_tile();
        assert_eq!(engine.state().tiles[0].y, -100.0);
        engine.update_tiles(800.0);
        assert_eq!(engine.state().speed, 4.5);

        let bad = Tuning {
            column_count: 0,
            ..Default::default()
        };
        assert!(GameEngine::with_tuning(bad, 1, NullFeedback).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Spawn,
            Update(f32),
            Tap { column: u8, index: usize },
            TapHead,
            Pause,
            Resume,
            Start,
            Reset,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => Just(Op::Spawn),
                8 => (300.0f32..2000.0).prop_map(Op::Update),
                1 => (0u8..4, 0usize..3).prop_map(|(column, index)| Op::Tap { column, index }),
                3 => Just(Op::TapHead),
                1 => Just(Op::Pause),
                1 => Just(Op::Resume),
                1 => Just(Op::Start),
                1 => Just(Op::Reset),
            ]
        }

        proptest! {
            #[test]
            fn prop_engine_invariants(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..400)) {
                let mut engine = GameEngine::new(seed, RecordingFeedback::new());
                let inc = engine.tuning().speed_increment;
                let th = engine.tuning().tile_height;
                let base = engine.tuning().base_speed;

                for op in ops {
                    let before = engine.snapshot();
                    let buffer_before = engine.spawn_buffer();
                    let accepts = before.accepts_input();
                    let resets = matches!(op, Op::Reset);

                    match op {
                        Op::Spawn => {
                            let spawned = engine.spawn_tile();
                            prop_assert_eq!(spawned, accepts && buffer_before <= 0.0);
                            if spawned {
                                let expected = before.tail().map_or(-th, |t| -th + t.y);
                                prop_assert_eq!(engine.state().tiles.len(), before.tiles.len() + 1);
                                prop_assert_eq!(engine.state().tail().map(|t| t.y), Some(expected));
                            } else {
                                prop_assert_eq!(engine.state(), &before);
                            }
                        }
                        Op::Update(height) => {
                            engine.update_tiles(height);
                            if accepts {
                                prop_assert_eq!(engine.state().speed, before.speed + inc);
                                for (old, new) in before.tiles.iter().zip(&engine.state().tiles) {
                                    prop_assert_eq!(new.y, old.y + before.speed);
                                    prop_assert_eq!(new.column, old.column);
                                }
                                let overflow = engine.state().tiles.iter().any(|t| t.y > height);
                                prop_assert_eq!(engine.state().game_over, overflow);
                            } else {
                                prop_assert_eq!(engine.state(), &before);
                            }
                        }
                        Op::Tap { .. } | Op::TapHead => {
                            let (tile, index) = match op {
                                Op::Tap { column, index } => (Tile::new(column, 0.0), index),
                                _ => (before.head().copied().unwrap_or(Tile::new(0, 0.0)), 0),
                            };
                            let outcome = engine.handle_tap(&tile, index);
                            let correct = index == 0
                                && before.head().is_some_and(|h| h.column == tile.column);
                            let after = engine.state();
                            if !accepts {
                                prop_assert_eq!(outcome, TapOutcome::Ignored);
                                prop_assert_eq!(after, &before);
                            } else if correct {
                                prop_assert_eq!(outcome, TapOutcome::Hit);
                                prop_assert_eq!(after.score, before.score + 1);
                                prop_assert_eq!(&after.tiles[..], &before.tiles[1..]);
                            } else {
                                prop_assert_eq!(outcome, TapOutcome::Miss);
                                prop_assert!(after.game_over);
                                prop_assert_eq!(after.score, before.score);
                                prop_assert_eq!(&after.tiles, &before.tiles);
                            }
                        }
                        Op::Pause => engine.pause_game(),
                        Op::Resume => engine.resume_game(),
                        Op::Start => engine.start(),
                        Op::Reset => {
                            engine.reset();
                            prop_assert_eq!(engine.state(), &GameState::new(base));
                            prop_assert_eq!(engine.spawn_buffer(), 0.0);
                            prop_assert_eq!(engine.phase(), GamePhase::NotStarted);
                        }
                    }

                    let after = engine.state();
                    if before.game_over && !resets {
                        prop_assert!(after.game_over);
                        prop_assert_eq!(&after.tiles, &before.tiles);
                        prop_assert_eq!(after.score, before.score);
                        prop_assert_eq!(after.speed, before.speed);
                    }
                    if !resets {
                        prop_assert!(after.speed >= before.speed);
                    }
                    prop_assert!(after.tiles.windows(2).all(|w| w[0].y > w[1].y));
                }
            }
        }
    }
}
