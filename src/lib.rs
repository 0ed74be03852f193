//! Flappy Sim - A deterministic Flappy Bird simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, pixel-mask collision, round state)
//! - `highscores`: High score leaderboard persisted to a JSON file
//!
//! Rendering, audio and input are external collaborators: a driver feeds one
//! `TickInput` per tick and reads positions/masks back out to draw a frame.

pub mod highscores;
pub mod sim;

pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const WIN_WIDTH: f32 = 576.0;
    pub const WIN_HEIGHT: f32 = 750.0;
    /// Top of the scrolling ground strip; the bird dies on contact
    pub const GROUND_LEVEL: f32 = 680.0;

    /// Bird spawn position (x is fixed for the whole round)
    pub const BIRD_START_X: f32 = 230.0;
    pub const BIRD_START_Y: f32 = 350.0;

    /// Velocity magnitude applied at the moment of a jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -10.5;
    /// Terminal per-tick fall displacement cap
    pub const MAX_DROP: f32 = 16.0;
    /// Extra displacement subtracted while the raw arc is still non-positive,
    /// steepening the initial climb
    pub const ASCENT_BOOST: f32 = 2.0;

    /// Tilt limits (degrees) and per-tick downward rotation
    pub const MAX_TILT: f32 = 25.0;
    pub const MIN_TILT: f32 = -90.0;
    pub const TILT_VEL: f32 = 20.0;
    /// The bird keeps its nose up while above jump height + this margin
    pub const TILT_SNAP_MARGIN: f32 = 50.0;

    /// Ticks per wing-flap animation frame (render-only)
    pub const ANIMATION_TIME: u32 = 5;

    /// Horizontal scroll velocity shared by pipes and ground (units/tick)
    pub const SCROLL_VEL: f32 = 5.0;
    /// Vertical opening between the top and bottom pipe pieces
    pub const PIPE_GAP: f32 = 200.0;
    /// X coordinate where new pipes appear
    pub const PIPE_SPAWN_X: f32 = 600.0;
    /// Gap center is drawn uniformly from [GAP_CENTER_MIN, GAP_CENTER_MAX)
    pub const GAP_CENTER_MIN: i32 = 50;
    pub const GAP_CENTER_MAX: i32 = 450;

    /// Default sprite dimensions (2x-scaled source art), used by the demo
    /// driver and tests; a real renderer supplies its own masks
    pub const BIRD_WIDTH: u32 = 68;
    pub const BIRD_HEIGHT: u32 = 48;
    pub const PIPE_WIDTH: u32 = 104;
    pub const PIPE_HEIGHT: u32 = 640;
    pub const BASE_TILE_WIDTH: f32 = 672.0;
}
