//! Flappy Sim entry point
//!
//! Headless demo driver: runs a few rounds with a trivial gap-centering
//! autopilot built on the three-value observation, then records the best
//! scores. A real front end would replace this loop with a renderer and
//! keyboard input, feeding the same `TickInput`.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use flappy_sim::HighScores;
use flappy_sim::sim::{GamePhase, GameState, SpriteMasks, TickInput, tick};

/// Safety cap per round so a perfect autopilot cannot loop forever
const MAX_TICKS_PER_ROUND: u64 = 50_000;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Flap whenever the bird sinks within 60 units of the next gap's bottom
/// edge; enough to clear most gap sequences for a demo run
fn autopilot(state: &GameState) -> bool {
    let obs = state.observe();
    let bird_h = state.masks().bird.height() as f32;
    obs.dy_bottom < bird_h + 60.0 && obs.bird_y < state.pipes[state.next_pipe_index()].bottom
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(unix_now);
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);

    log::info!("flappy-sim demo: seed {seed}, {rounds} rounds");

    let scores_path = PathBuf::from("flappy_highscores.json");
    let mut highscores = HighScores::load(&scores_path);

    let mut state = GameState::new(seed, SpriteMasks::solid());

    for round in 1..=rounds {
        let mut ticks = 0u64;
        while state.phase == GamePhase::Alive && ticks < MAX_TICKS_PER_ROUND {
            let input = TickInput {
                flap: autopilot(&state),
            };
            let result = tick(&mut state, &input);
            ticks += 1;
            if result.died {
                println!(
                    "round {round}: died at tick {ticks} with score {}",
                    result.score
                );
                if let Some(rank) = highscores.add_score(result.score, seed, unix_now()) {
                    println!("  new high score, rank {rank}");
                }
            }
        }
        if state.phase == GamePhase::Alive {
            log::warn!("round {round} hit the {MAX_TICKS_PER_ROUND}-tick cap, ending it");
            println!("round {round}: survived the full run with score {}", state.score);
            highscores.add_score(state.score, seed, unix_now());
        }
        state.reset_round();
    }

    if let Some(top) = highscores.top_score() {
        println!("best score this board: {top}");
    }
    if let Err(err) = highscores.save(&scores_path) {
        log::error!("failed to save high scores: {err}");
    }
}
