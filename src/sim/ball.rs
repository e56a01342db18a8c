//! Balls and the per-frame collision pipeline
//!
//! A free ball checks, in order, the barrier, the paddle, every brick and
//! every other ball against its own bounding box. The first contact found is
//! resolved and the rest are skipped for this frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::barrier::Barrier;
use super::brick::Brick;
use super::collision::{Collidable, Contact, contact_angle, deflect, exchange, reflect};
use super::geom::Aabb;
use super::paddle::Paddle;
use crate::consts::{BALL_DAMPING, DETACH_SPEED_RATIO, PEER_EPSILON_RATIO, SURFACE_KICK};

/// Ball state - riding the paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Sits on the paddle's anchor with zero velocity
    Attached,
    Free,
}

/// What a ball ran into this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Barrier,
    Paddle,
    /// Index into the brick slice
    Brick(usize),
    Ball,
}

/// Outcome of one [`Ball::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fell out of the field and is marked for deletion
    Lost,
    /// Riding the paddle
    Attached,
    Moved(Option<Hit>),
}

/// Everything a ball can collide with besides its peers
pub struct Surroundings<'a> {
    pub barrier: &'a Barrier,
    pub paddle: &'a Paddle,
    /// Safety bricks first, then regular bricks
    pub bricks: &'a mut [Brick],
    /// A ball whose top edge passes this is out of play
    pub field_height: f32,
    /// Per-axis speed ceiling
    pub max_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center of the ball
    pub pos: Vec2,
    pub radius: f32,
    vel: Vec2,
    state: BallState,
    /// Flipped once per frame, after collision checks
    pub parity: bool,
    /// Set when the ball leaves the field; the owner removes it
    pub delete: bool,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            vel,
            state: BallState::Free,
            parity: false,
            delete: false,
        }
    }

    /// A ball resting on `anchor`
    pub fn attached(anchor: Vec2, radius: f32) -> Self {
        let mut ball = Self::new(anchor, Vec2::ZERO, radius);
        ball.attach(anchor);
        ball
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// Replace the velocity of a free ball; attached balls stay at rest
    pub fn set_velocity(&mut self, vel: Vec2) {
        debug_assert!(!self.is_attached(), "velocity set on an attached ball");
        if !self.is_attached() {
            self.vel = vel;
        }
    }

    pub fn state(&self) -> BallState {
        self.state
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state == BallState::Attached
    }

    pub fn attach(&mut self, anchor: Vec2) {
        self.state = BallState::Attached;
        self.vel = Vec2::ZERO;
        self.snap_to(anchor);
    }

    fn snap_to(&mut self, anchor: Vec2) {
        self.pos = Vec2::new(anchor.x, anchor.y - self.radius);
    }

    /// Launch an attached ball
    ///
    /// The ball is fired downward and pulled back one step, so on the next
    /// frame it strikes the paddle and bounces off at the paddle's angle. A
    /// small random sideways drift keeps launches from repeating exactly.
    pub fn detach(&mut self, max_speed: f32, rng: &mut impl Rng) -> bool {
        if !self.is_attached() {
            return false;
        }
        self.vel.y = max_speed * DETACH_SPEED_RATIO;
        self.pos.y -= self.vel.y;
        self.vel.x = (rng.random_range(0..10) - 5) as f32 / 20.0;
        self.state = BallState::Free;
        true
    }

    /// Advance one frame: collide, flip parity, damp, translate
    pub fn advance<'p>(
        &mut self,
        env: &mut Surroundings<'_>,
        peers: impl IntoIterator<Item = &'p mut Ball>,
    ) -> Step {
        let bounds = self.bounds();

        if bounds.top > env.field_height {
            self.delete = true;
            return Step::Lost;
        }

        if self.is_attached() {
            self.parity = !self.parity;
            self.snap_to(env.paddle.anchor());
            return Step::Attached;
        }

        let hit = self.resolve(&bounds, env, peers);
        if hit.is_some() {
            // Extra half step to clear the surface we just left
            self.pos += self.vel * 0.5;
        }

        self.parity = !self.parity;
        self.clamp_speed(env.max_speed);
        self.pos += self.vel;

        Step::Moved(hit)
    }

    /// Run the collision chain, stopping at the first contact
    fn resolve<'p>(
        &mut self,
        bounds: &Aabb,
        env: &mut Surroundings<'_>,
        peers: impl IntoIterator<Item = &'p mut Ball>,
    ) -> Option<Hit> {
        if self.respond(&env.barrier.collision(bounds)) {
            return Some(Hit::Barrier);
        }

        if self.respond(&env.paddle.collision(bounds)) {
            return Some(Hit::Paddle);
        }

        for (i, brick) in env.bricks.iter_mut().enumerate() {
            let contact = brick.collision(bounds);
            if contact.is_hit() {
                brick.delete = true;
            }
            if self.respond(&contact) {
                return Some(Hit::Brick(i));
            }
        }

        for peer in peers {
            // A peer whose parity already flipped has checked against us
            if peer.parity != self.parity {
                continue;
            }
            if let Contact::BallContact { center, velocity } = peer.collision(bounds) {
                let (mine, theirs) = exchange(self.pos, self.vel, center, velocity);
                log::trace!("Ball contact at {:?}: {:?} <-> {:?}", self.pos, mine, theirs);
                self.vel = mine;
                peer.set_velocity(theirs);
                return Some(Hit::Ball);
            }
        }

        None
    }

    /// Apply a surface contact to our velocity; false if nothing to do
    fn respond(&mut self, contact: &Contact) -> bool {
        if let Some(vel) = reflect(self.vel, contact) {
            self.vel = vel;
            return true;
        }

        let vel = match *contact {
            Contact::Vertical {
                surface: Some(surface),
            } => deflect(self.vel, surface.velocity, -surface.angle, SURFACE_KICK),
            Contact::Side { center, velocity } => {
                deflect(self.vel, velocity, contact_angle(self.pos, center), SURFACE_KICK)
            }
            Contact::Corner { point } => {
                deflect(self.vel, Vec2::ZERO, contact_angle(self.pos, point), SURFACE_KICK)
            }
            _ => return false,
        };
        log::trace!("Deflected {:?} -> {:?} off {:?}", self.vel, vel, contact);
        self.vel = vel;
        true
    }

    /// Damp both axes when either one exceeds the ceiling
    fn clamp_speed(&mut self, max_speed: f32) {
        if self.vel.x.abs() > max_speed || self.vel.y.abs() > max_speed {
            self.vel *= BALL_DAMPING;
        }
    }
}

impl Collidable for Ball {
    fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }

    fn collision(&self, incoming: &Aabb) -> Contact {
        if self.is_attached() {
            return Contact::None;
        }

        let distance = self.pos.distance(incoming.center());
        let reach = incoming.width / 2.0 + self.radius;
        if distance < reach && distance > self.radius * PEER_EPSILON_RATIO {
            Contact::BallContact {
                center: self.pos,
                velocity: self.vel,
            }
        } else {
            Contact::None
        }
    }
}
