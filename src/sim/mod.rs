//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Feedback and persistence reached through injected interfaces
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod engine;
pub mod observer;
pub mod state;
pub mod tick;

pub use autoplay::Autoplay;
pub use engine::{GameEngine, TapOutcome};
pub use observer::{SubscriptionId, Subscribers};
pub use state::{GamePhase, GameState, Tile};
pub use tick::{FixedStep, Tap, TickInput, tick};
