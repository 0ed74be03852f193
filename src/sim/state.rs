//! Round state and core simulation types
//!
//! All state that must advance deterministically lives here. The RNG is
//! seeded per session and owned by the round so gap sequences reproduce
//! exactly under the same seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::mask::SpriteMasks;
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Round in progress; ticks advance the world
    Alive,
    /// Terminal state; ticks are no-ops until an explicit reset
    Dead,
}

/// The controllable bird
///
/// Vertical velocity is implicit: displacement is recomputed each tick from
/// the closed-form arc `v0 * t + 1.5 * t^2`, where `t` counts ticks since
/// the last jump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Horizontal position, fixed for the whole round
    pub x: f32,
    /// Vertical position of the sprite's top edge
    pub y: f32,
    /// Rendering tilt in degrees, clamped to [MIN_TILT, MAX_TILT]
    pub tilt: f32,
    /// Ticks since the last jump
    tick_count: u32,
    /// Velocity magnitude fixed at jump time
    vel: f32,
    /// Height recorded at the last jump, reference for the tilt hysteresis
    height_at_jump: f32,
    /// Wing animation counter (render-only)
    img_count: u32,
}

impl Bird {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            tilt: 0.0,
            tick_count: 0,
            vel: 0.0,
            height_at_jump: y,
            img_count: 0,
        }
    }

    /// Start a new jump arc. Legal at any time while alive; jumping mid-arc
    /// simply restarts the arc from the current height.
    pub fn jump(&mut self) {
        self.vel = JUMP_VELOCITY;
        self.tick_count = 0;
        self.height_at_jump = self.y;
    }

    /// Advance one tick of the fall/jump arc
    pub fn advance(&mut self) {
        self.tick_count += 1;
        let t = self.tick_count as f32;

        let mut d = self.vel * t + 1.5 * t * t;
        if d > MAX_DROP {
            d = MAX_DROP;
        }
        if d <= 0.0 {
            // Steepen the climb while the raw arc is still non-positive
            d -= ASCENT_BOOST;
        }
        self.y += d;

        // Asymmetric tilt: snap the nose up instantly while ascending or
        // still above the last jump height, rotate down gradually otherwise
        if d < 0.0 || self.y < self.height_at_jump + TILT_SNAP_MARGIN {
            if self.tilt < MAX_TILT {
                self.tilt = MAX_TILT;
            }
        } else if self.tilt > MIN_TILT {
            self.tilt = (self.tilt - TILT_VEL).max(MIN_TILT);
        }

        // Wing flap cycle; a nose-dive freezes the wings level
        self.img_count += 1;
        if self.tilt <= -80.0 {
            self.img_count = ANIMATION_TIME * 2;
        } else if self.img_count > ANIMATION_TIME * 4 {
            self.img_count = 0;
        }
    }

    /// Which of the three wing sprites to draw (0, 1, 2 = down, mid, up)
    pub fn animation_frame(&self) -> usize {
        if self.tilt <= -80.0 {
            return 0;
        }
        match self.img_count {
            c if c < ANIMATION_TIME => 0,
            c if c < ANIMATION_TIME * 2 => 1,
            c if c < ANIMATION_TIME * 3 => 2,
            c if c < ANIMATION_TIME * 4 => 1,
            _ => 0,
        }
    }

    /// Top-left corner of the sprite, for rendering
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[cfg(test)]
    pub(crate) fn ticks_since_jump(&self) -> u32 {
        self.tick_count
    }
}

/// A paired top/bottom pipe with a fixed vertical gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Stable id for renderer allocate/free bookkeeping
    pub id: u32,
    /// Horizontal position of both pieces' left edge
    pub x: f32,
    /// Top edge of the gap (bottom of the top piece)
    pub gap_center: f32,
    /// Y of the top piece's top-left corner (negative: most of it is off-screen)
    pub top: f32,
    /// Y of the bottom piece's top-left corner
    pub bottom: f32,
    /// Set once when the bird's x first passes this pipe
    pub passed: bool,
}

impl Pipe {
    /// Spawn a pipe at `x` with a gap center drawn uniformly from
    /// [GAP_CENTER_MIN, GAP_CENTER_MAX); the gap is fixed for the pipe's
    /// lifetime.
    pub fn new(id: u32, x: f32, rng: &mut Pcg32, masks: &SpriteMasks) -> Self {
        let gap_center = rng.random_range(GAP_CENTER_MIN..GAP_CENTER_MAX) as f32;
        Self {
            id,
            x,
            gap_center,
            top: gap_center - masks.pipe_top.height() as f32,
            bottom: gap_center + PIPE_GAP,
            passed: false,
        }
    }

    /// Scroll one tick to the left
    pub fn advance(&mut self) {
        self.x -= SCROLL_VEL;
    }

    /// Exact pixel-mask hit test against the bird, for both pieces
    pub fn collides_with(&self, bird: &Bird, masks: &SpriteMasks) -> bool {
        let dx = (self.x - bird.x).round() as i32;
        let bird_y = bird.y.round();
        let top_offset = glam::IVec2::new(dx, (self.top - bird_y) as i32);
        let bottom_offset = glam::IVec2::new(dx, (self.bottom - bird_y) as i32);

        masks.bird.overlaps(&masks.pipe_top, top_offset)
            || masks.bird.overlaps(&masks.pipe_bottom, bottom_offset)
    }

    /// Fully scrolled past the left edge, safe to retire
    pub fn is_offscreen(&self, masks: &SpriteMasks) -> bool {
        self.x + (masks.pipe_top.width() as f32) < 0.0
    }

    /// Top-left corners of the two pieces, for rendering
    pub fn piece_positions(&self) -> (Vec2, Vec2) {
        (Vec2::new(self.x, self.top), Vec2::new(self.x, self.bottom))
    }
}

/// The scrolling ground: two copies of one tile leapfrogging each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    /// Vertical position of the strip (fixed)
    pub y: f32,
    /// Left edges of the two tile copies
    pub x1: f32,
    pub x2: f32,
    /// Width of one tile
    pub tile_width: f32,
}

impl Base {
    pub fn new(y: f32, tile_width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: tile_width,
            tile_width,
        }
    }

    /// Scroll both copies one tick; whichever has fully left the screen is
    /// teleported to sit after the other. Both wrap checks read snapshotted
    /// post-scroll offsets so a double wrap in one tick (scroll velocity
    /// above the tile width) cannot chain one wrap into the other.
    pub fn advance(&mut self) {
        self.x1 -= SCROLL_VEL;
        self.x2 -= SCROLL_VEL;

        let (x1, x2) = (self.x1, self.x2);
        if x1 + self.tile_width < 0.0 {
            self.x1 = x2 + self.tile_width;
        }
        if x2 + self.tile_width < 0.0 {
            self.x2 = x1 + self.tile_width;
        }
    }
}

/// Complete round state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Pipes passed this round
    pub score: u64,
    pub phase: GamePhase,
    /// Ticks advanced while alive, across the whole session
    pub time_ticks: u64,
    pub bird: Bird,
    pub base: Base,
    /// Live pipes in spawn order (leftmost first)
    pub pipes: Vec<Pipe>,
    /// Immutable sprite masks shared by every round of the session
    pub(crate) masks: SpriteMasks,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh round from a seed and the session's sprite masks
    pub fn new(seed: u64, masks: SpriteMasks) -> Self {
        let mut state = Self {
            seed,
            score: 0,
            phase: GamePhase::Alive,
            time_ticks: 0,
            bird: Bird::new(BIRD_START_X, BIRD_START_Y),
            base: Base::new(GROUND_LEVEL, BASE_TILE_WIDTH),
            pipes: Vec::new(),
            masks,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.spawn_pipe();
        state
    }

    /// Discard the current round and rebuild initial conditions.
    ///
    /// The RNG stream continues rather than rewinding, so consecutive rounds
    /// see different gap sequences under one session seed.
    pub fn reset_round(&mut self) {
        log::info!("round reset (seed {}, final score {})", self.seed, self.score);
        self.score = 0;
        self.phase = GamePhase::Alive;
        self.bird = Bird::new(BIRD_START_X, BIRD_START_Y);
        self.base = Base::new(GROUND_LEVEL, BASE_TILE_WIDTH);
        self.pipes.clear();
        self.spawn_pipe();
    }

    /// Allocate a stable pipe id
    fn next_pipe_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append one pipe at the spawn x and return its id
    pub fn spawn_pipe(&mut self) -> u32 {
        let id = self.next_pipe_id();
        let pipe = Pipe::new(id, PIPE_SPAWN_X, &mut self.rng, &self.masks);
        self.pipes.push(pipe);
        id
    }

    /// Index of the pipe the bird must steer through next.
    ///
    /// Index 0, unless there is more than one pipe and the bird has already
    /// cleared the first pipe's trailing edge. With exactly one pipe the
    /// index stays 0 even past the trailing edge; observers see the pipe
    /// behind the bird until the next one spawns.
    pub fn next_pipe_index(&self) -> usize {
        if self.pipes.len() > 1
            && self.bird.x > self.pipes[0].x + self.masks.pipe_top.width() as f32
        {
            1
        } else {
            0
        }
    }

    /// Read-only access to the session's sprite masks
    pub fn masks(&self) -> &SpriteMasks {
        &self.masks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Per-tick displacements after a jump from rest, from the closed form
    /// with the 16-cap and the -2 ascent boost applied
    const JUMP_ARC: [f32; 10] = [
        -11.0, -17.0, -20.0, -20.0, -17.0, -11.0, -2.0, 12.0, 16.0, 16.0,
    ];

    #[test]
    fn test_jump_arc_displacements() {
        let mut bird = Bird::new(BIRD_START_X, BIRD_START_Y);
        bird.jump();
        let mut y = bird.y;
        for (t, expected) in JUMP_ARC.iter().enumerate() {
            bird.advance();
            let d = bird.y - y;
            assert!((d - expected).abs() < 1e-4, "tick {}: d = {}", t + 1, d);
            y = bird.y;
        }
    }

    #[test]
    fn test_freefall_displacements() {
        // No jump ever: v0 = 0, pure 1.5 t^2 arc capped at 16
        let mut bird = Bird::new(BIRD_START_X, BIRD_START_Y);
        let expected = [1.5, 6.0, 13.5, 16.0, 16.0];
        let mut y = bird.y;
        for (t, exp) in expected.iter().enumerate() {
            bird.advance();
            assert!((bird.y - y - exp).abs() < 1e-4, "tick {}", t + 1);
            y = bird.y;
        }
    }

    #[test]
    fn test_displacement_formula_first_20_ticks() {
        let mut bird = Bird::new(0.0, 0.0);
        bird.jump();
        let mut y = 0.0;
        for t in 1..=20u32 {
            bird.advance();
            let raw = JUMP_VELOCITY * t as f32 + 1.5 * (t * t) as f32;
            let mut expect = raw.min(MAX_DROP);
            if expect <= 0.0 {
                expect -= ASCENT_BOOST;
            }
            assert!((bird.y - y - expect).abs() < 1e-3, "tick {t}");
            y = bird.y;
        }
    }

    #[test]
    fn test_jump_resets_arc() {
        let mut bird = Bird::new(BIRD_START_X, BIRD_START_Y);
        for _ in 0..8 {
            bird.advance();
        }
        bird.jump();
        assert_eq!(bird.ticks_since_jump(), 0);
        let y_before = bird.y;
        bird.advance();
        // First post-jump tick always rises
        assert!(bird.y < y_before);
    }

    #[test]
    fn test_tilt_snaps_up_and_rotates_down() {
        let mut bird = Bird::new(BIRD_START_X, BIRD_START_Y);
        bird.jump();
        bird.advance();
        assert_eq!(bird.tilt, MAX_TILT);

        // Fall long enough to rotate all the way down
        for _ in 0..30 {
            bird.advance();
        }
        assert_eq!(bird.tilt, MIN_TILT);
    }

    #[test]
    fn test_nose_dive_freezes_wings() {
        let mut bird = Bird::new(BIRD_START_X, BIRD_START_Y);
        for _ in 0..40 {
            bird.advance();
        }
        assert!(bird.tilt <= -80.0);
        assert_eq!(bird.animation_frame(), 0);
    }

    proptest! {
        #[test]
        fn prop_tilt_stays_in_bounds(flaps in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut bird = Bird::new(BIRD_START_X, BIRD_START_Y);
            for flap in flaps {
                bird.advance();
                if flap {
                    bird.jump();
                }
                prop_assert!(bird.tilt >= MIN_TILT);
                prop_assert!(bird.tilt <= MAX_TILT);
            }
        }

        #[test]
        fn prop_gap_invariant_holds_for_any_seed(seed in any::<u64>()) {
            let masks = SpriteMasks::solid();
            let mut rng = Pcg32::seed_from_u64(seed);
            for id in 0..32 {
                let pipe = Pipe::new(id, PIPE_SPAWN_X, &mut rng, &masks);
                prop_assert!(pipe.gap_center >= GAP_CENTER_MIN as f32);
                prop_assert!(pipe.gap_center < GAP_CENTER_MAX as f32);
                prop_assert_eq!(pipe.bottom - pipe.gap_center, PIPE_GAP);
                prop_assert_eq!(
                    pipe.gap_center - pipe.top,
                    masks.pipe_top.height() as f32
                );
            }
        }

        #[test]
        fn prop_base_offsets_stay_one_tile_apart(ticks in 1usize..2000) {
            let mut base = Base::new(GROUND_LEVEL, BASE_TILE_WIDTH);
            for _ in 0..ticks {
                base.advance();
            }
            let gap = (base.x1 - base.x2).abs();
            prop_assert!(
                (gap - base.tile_width).abs() < 1e-3,
                "offsets {} / {}", base.x1, base.x2
            );
        }
    }

    #[test]
    fn test_base_wrap_preserves_coverage() {
        let mut base = Base::new(GROUND_LEVEL, BASE_TILE_WIDTH);
        // Scroll well past several full wraps
        for _ in 0..1000 {
            base.advance();
            let left = base.x1.min(base.x2);
            let right = base.x1.max(base.x2);
            // The two tiles always cover the whole playfield width
            assert!(left <= 0.0);
            assert!(right + base.tile_width >= crate::consts::WIN_WIDTH);
        }
    }

    #[test]
    fn test_gap_sequence_reproducible() {
        let a = GameState::new(42, SpriteMasks::solid());
        let b = GameState::new(42, SpriteMasks::solid());
        assert_eq!(a.pipes[0].gap_center, b.pipes[0].gap_center);

        let mut c = GameState::new(42, SpriteMasks::solid());
        c.spawn_pipe();
        c.spawn_pipe();
        let mut d = GameState::new(42, SpriteMasks::solid());
        d.spawn_pipe();
        d.spawn_pipe();
        assert_eq!(c.pipes[1].gap_center, d.pipes[1].gap_center);
        assert_eq!(c.pipes[2].gap_center, d.pipes[2].gap_center);
    }

    #[test]
    fn test_next_pipe_index_single_pipe_sticks_at_zero() {
        let mut state = GameState::new(7, SpriteMasks::solid());
        // Drag the only pipe behind the bird; index must stay 0
        state.pipes[0].x = -200.0;
        assert_eq!(state.next_pipe_index(), 0);

        // With a second pipe ahead, the query moves on to it
        state.spawn_pipe();
        assert_eq!(state.next_pipe_index(), 1);

        // Second pipe present but first not yet cleared
        state.pipes[0].x = state.bird.x - 10.0;
        assert_eq!(state.next_pipe_index(), 0);
    }
}
