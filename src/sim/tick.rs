//! Once-per-frame game tick
//!
//! Order within a frame: input, sweep of last frame's deletions, status
//! check, then paddle and ball movement.

use super::paddle::Steer;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering key pressed
    pub steer: Option<Steer>,
    /// Steering key released
    pub release: Option<Steer>,
    /// Tilt one step; `Some(true)` is clockwise
    pub rotate: Option<bool>,
    /// Launch a ball riding the paddle
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new run once the game is over
    pub restart: bool,
}

/// Advance the game by one frame at time `now` (seconds)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Handle pause toggle
    if input.pause {
        if state.pause(now) {
            events.push(GameEvent::Paused);
            return events;
        }
        if state.resume(now) {
            events.push(GameEvent::Resumed);
        }
    }

    match state.phase {
        GamePhase::Paused => return events,
        GamePhase::GameOver { .. } => {
            if input.restart {
                events.push(state.restart(now));
            }
            return events;
        }
        GamePhase::LevelCleared => {
            if state.break_over(now) {
                let next = state.level + 1;
                events.push(state.start_level(next, now));
            }
            return events;
        }
        GamePhase::Playing => {}
    }

    let field = &mut state.field;
    if let Some(direction) = input.release {
        field.paddle.release(direction);
    }
    if let Some(direction) = input.steer {
        field.paddle.steer(direction);
    }
    if let Some(clockwise) = input.rotate {
        field.paddle.rotate(clockwise);
    }
    if input.launch {
        field.release_ball(&mut state.rng);
    }

    events.extend(field.sweep(now).into_iter().map(GameEvent::from));

    if field.bricks_remaining() == 0 {
        events.push(state.clear_level(now));
        return events;
    }
    if field.balls.is_empty() {
        events.push(state.lose());
        return events;
    }

    field.step(now);
    state.frames += 1;

    events
}
