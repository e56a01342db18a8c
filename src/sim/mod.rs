//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Collision detection and response between the field's entities
//! - The play field that owns them and sweeps deletions between frames
//! - Stage layouts, game phases and the per-frame tick
//!
//! Nothing here reads the clock or touches the platform. Time comes in as
//! an argument and randomness from the game's seeded RNG.

pub mod ball;
pub mod barrier;
pub mod brick;
pub mod collision;
pub mod field;
pub mod geom;
pub mod paddle;
pub mod stage;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState, Hit, Step, Surroundings};
pub use barrier::Barrier;
pub use brick::{Brick, Special};
pub use collision::{Collidable, Contact, ContactKind, Surface, contact_angle, deflect, exchange, reflect};
pub use field::{EntityRef, Field, SweepEvent};
pub use geom::{Aabb, Rotation};
pub use paddle::{Paddle, Steer};
pub use stage::{LEVEL_PATTERNS, StageBuilder};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
