//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives here.

use serde::{Deserialize, Serialize};

/// Current phase of gameplay, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh or reset session, nothing has happened yet
    NotStarted,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// A falling tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Lane index in `[0, column_count)`
    pub column: u8,
    /// Top edge in pixels from the top of the play area (negative = above it)
    pub y: f32,
}

impl Tile {
    pub fn new(column: u8, y: f32) -> Self {
        Self { column, y }
    }

    /// Bottom edge for a tile of the given height
    pub fn bottom(&self, tile_height: f32) -> f32 {
        self.y + tile_height
    }
}

/// Complete game state (serializable snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Active tiles, oldest (lowest on screen) first
    pub tiles: Vec<Tile>,
    /// Correct taps this run
    pub score: u32,
    /// Fall speed in pixels per tick
    pub speed: f32,
    /// Set once by an overflow or a wrong tap; cleared only by reset
    pub game_over: bool,
    pub is_paused: bool,
    /// Session has begun (start() or first accepted interaction)
    #[serde(default)]
    pub started: bool,
}

impl GameState {
    /// Initial state for the given base speed
    pub fn new(base_speed: f32) -> Self {
        Self {
            tiles: Vec::new(),
            score: 0,
            speed: base_speed,
            game_over: false,
            is_paused: false,
            started: false,
        }
    }

    /// The only tile a scoring tap may target
    pub fn head(&self) -> Option<&Tile> {
        self.tiles.first()
    }

    /// Most recently spawned tile
    pub fn tail(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if self.is_paused {
            GamePhase::Paused
        } else if self.started {
            GamePhase::Running
        } else {
            GamePhase::NotStarted
        }
    }

    /// Whether spawn/update/tap may mutate this state
    pub fn accepts_input(&self) -> bool {
        !self.game_over && !self.is_paused
    }
}
