//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed discrete ticks only, paced by the caller
//! - Seeded RNG only
//! - Stable pipe iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod mask;
pub mod state;
pub mod tick;

pub use mask::{Mask, SpriteMasks};
pub use state::{Base, Bird, GamePhase, GameState, Pipe};
pub use tick::{Observation, TickInput, TickResult, tick};
