//! Fixed timestep simulation tick
//!
//! One call advances the whole world by one tick: ground scroll, bird
//! kinematics, jump input, pipe stream (collide / pass / retire / spawn),
//! scoring, and terminal conditions. The caller paces the ticks; nothing
//! here blocks or suspends.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump requested this tick (key press, tap, or an external agent)
    pub flap: bool,
}

/// What happened during one tick, for the driving layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickResult {
    pub phase: GamePhase,
    pub score: u64,
    /// The round ended on this exact tick (high-score persistence, episode
    /// boundaries)
    pub died: bool,
    /// Pipe ids spawned this tick, for the renderer to allocate
    pub spawned: Vec<u32>,
    /// Pipe ids retired this tick, for the renderer to free
    pub retired: Vec<u32>,
}

/// The three-value observation consumed by an external control agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Observation {
    /// Bird's vertical position
    pub bird_y: f32,
    /// Absolute vertical distance to the next gap's top edge
    pub dy_top: f32,
    /// Absolute vertical distance to the next gap's bottom edge
    pub dy_bottom: f32,
}

impl GameState {
    /// Observe the bird relative to the next relevant pipe's gap
    pub fn observe(&self) -> Observation {
        let pipe = &self.pipes[self.next_pipe_index()];
        Observation {
            bird_y: self.bird.y,
            dy_top: (self.bird.y - pipe.gap_center).abs(),
            dy_bottom: (self.bird.y - pipe.bottom).abs(),
        }
    }
}

/// Advance the game state by one tick.
///
/// While `Dead` this is a silent no-op (not an error); the driver is
/// expected to stop ticking or call [`GameState::reset_round`].
pub fn tick(state: &mut GameState, input: &TickInput) -> TickResult {
    if state.phase == GamePhase::Dead {
        return TickResult {
            phase: GamePhase::Dead,
            score: state.score,
            died: false,
            spawned: Vec::new(),
            retired: Vec::new(),
        };
    }

    state.time_ticks += 1;

    state.base.advance();
    state.bird.advance();
    if input.flap {
        state.bird.jump();
    }

    // Pipe stream: collide, pass, retire, then advance, in spawn order.
    // Retirement is mark-then-compact so the list never mutates mid-scan.
    let mut dead = false;
    let mut spawn_requested = false;
    let mut retired: Vec<u32> = Vec::new();

    for pipe in &mut state.pipes {
        if pipe.collides_with(&state.bird, &state.masks) {
            dead = true;
        }
        if !pipe.passed && pipe.x < state.bird.x {
            pipe.passed = true;
            spawn_requested = true;
        }
        if pipe.is_offscreen(&state.masks) {
            retired.push(pipe.id);
        }
        pipe.advance();
    }

    let mut spawned = Vec::new();
    if spawn_requested {
        state.score += 1;
        let id = state.spawn_pipe();
        spawned.push(id);
        log::debug!("score {}, spawned pipe {}", state.score, id);
    }

    if !retired.is_empty() {
        state.pipes.retain(|p| !retired.contains(&p.id));
    }

    // Terminal bounds: ground contact or flying off the top
    let bird_bottom = state.bird.y + state.masks().bird.height() as f32;
    if bird_bottom >= GROUND_LEVEL || state.bird.y < 0.0 {
        dead = true;
    }

    if dead {
        state.phase = GamePhase::Dead;
        log::info!(
            "bird died at tick {} with score {}",
            state.time_ticks,
            state.score
        );
    }

    TickResult {
        phase: state.phase,
        score: state.score,
        died: dead,
        spawned,
        retired,
    }
}
