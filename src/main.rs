//! Brick Breaker entry point
//!
//! Runs a headless demo: loads tuning (defaults unless a JSON path is
//! given), then lets a simple autopilot play on a manual 60 Hz clock and
//! logs what happens. Set `RUST_LOG=info` (or `debug`) to see it.

#[cfg(not(target_arch = "wasm32"))]
use brick_breaker::platform::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
use brick_breaker::sim::{BallState, GameEvent, GamePhase, GameState, Steer, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use brick_breaker::Tuning;

/// Simulated frame length in seconds
#[cfg(not(target_arch = "wasm32"))]
const FRAME_TIME: f64 = 1.0 / 60.0;

/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
const DEMO_SEED: u64 = 0x5eed;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let clock = ManualClock::new(0.0);
    let mut state = GameState::new(tuning, DEMO_SEED, clock.now());
    let mut frames = 0u64;

    while frames < MAX_FRAMES {
        clock.advance(FRAME_TIME);
        let input = autopilot(&state);
        for event in tick(&mut state, &input, clock.now()) {
            match event {
                GameEvent::BrickDestroyed(_) | GameEvent::SafetyBrickLost => {
                    log::trace!("{:?}", event)
                }
                GameEvent::LevelCleared { level, time, new_best } => {
                    log::info!("Cleared level {} in {:.1}s (new best: {})", level, time, new_best)
                }
                _ => log::debug!("{:?}", event),
            }
        }
        if let GamePhase::GameOver { won } = state.phase {
            log::info!(
                "Game over ({}) on level {} at t={:.1}s",
                if won { "won" } else { "lost" },
                state.level,
                clock.now()
            );
            break;
        }
        frames += 1;
    }

    log::info!(
        "Stopped after {} frames: {} bricks and {} safety bricks left",
        frames,
        state.field.bricks_remaining(),
        state.field.safety_remaining()
    );
}

/// Follow the lowest free ball and launch whenever one is riding the paddle
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState) -> TickInput {
    let field = &state.field;
    let mut input = TickInput {
        launch: field.balls.iter().any(|b| b.is_attached()),
        ..Default::default()
    };

    let target = field
        .balls
        .iter()
        .filter(|b| b.state() == BallState::Free)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let Some(ball) = target else {
        return input;
    };

    let dx = ball.pos.x - field.paddle.pos.x;
    let dead_zone = field.paddle.width / 4.0;
    if dx < -dead_zone {
        input.steer = Some(Steer::Left);
    } else if dx > dead_zone {
        input.steer = Some(Steer::Right);
    } else {
        input.release = Some(if field.paddle.accel < 0.0 {
            Steer::Left
        } else {
            Steer::Right
        });
    }
    input
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is usable from wasm hosts directly
}
