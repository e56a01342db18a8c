//! Brick Breaker - an arcade brick-breaking game
//!
//! Core modules:
//! - `sim`: Collision detection/response and the per-frame game loop
//! - `platform`: Host-provided time source
//! - `tuning`: Data-driven field layout and game balance

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Fixed physics constants (not tunable)
pub mod consts {
    /// Extra "kick" applied to a moving surface's velocity when it strikes a ball
    pub const SURFACE_KICK: f32 = 1.1;
    /// Paddle loses 1/13 of its velocity to friction every frame
    pub const PADDLE_FRICTION_DIVISOR: f32 = 13.0;
    /// Per-frame damping applied to a ball above the speed ceiling
    pub const BALL_DAMPING: f32 = 0.99;
    /// Two ball centers closer than radius * this are treated as the same point
    pub const PEER_EPSILON_RATIO: f32 = 0.25;
    /// Launch speed as a fraction of the ball speed ceiling
    pub const DETACH_SPEED_RATIO: f32 = 0.75;
    /// Degrees the paddle turns per rotate input
    pub const PADDLE_ROTATION_STEP: f32 = 3.0;
    /// How far the paddle is nudged away from a wall it touched
    pub const PADDLE_WALL_NUDGE: f32 = 1.0;
}

/// Normalize a rotation in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}
