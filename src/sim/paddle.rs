//! The player's paddle: a tilting capsule that slides along the bottom
//!
//! The paddle is a rectangle pivoting around its top-center point, with a
//! circular cap on each end. The top-center point is also where attached
//! balls sit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::barrier::Barrier;
use super::collision::{Collidable, Contact, Surface};
use super::geom::{Aabb, Rotation};
use crate::Tuning;
use crate::consts::{PADDLE_FRICTION_DIVISOR, PADDLE_ROTATION_STEP, PADDLE_WALL_NUDGE};

/// Horizontal steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-center of the rectangle (pivot and ball anchor)
    pub pos: Vec2,
    /// Current rectangle width, excluding the caps
    pub width: f32,
    /// Thickness, also the cap diameter
    pub height: f32,
    /// Horizontal velocity (pixels/frame)
    pub vel: f32,
    /// Horizontal acceleration currently applied
    pub accel: f32,
    /// Tilt in degrees, clockwise positive
    pub rotation: f32,
    nominal_width: f32,
    acceleration: f32,
    max_rotation: f32,
    elongation_factor: f32,
    elongation_time: f64,
    /// When the current elongation runs out
    elongated_until: Option<f64>,
    left_cap: Vec2,
    right_cap: Vec2,
}

impl Paddle {
    pub fn new(center_x: f32, top: f32, tuning: &Tuning) -> Self {
        let mut paddle = Self {
            pos: Vec2::new(center_x, top),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            vel: 0.0,
            accel: 0.0,
            rotation: 0.0,
            nominal_width: tuning.paddle_width,
            acceleration: tuning.paddle_acceleration,
            max_rotation: tuning.paddle_max_rotation,
            elongation_factor: tuning.paddle_elongation_factor,
            elongation_time: tuning.paddle_elongation_time,
            elongated_until: None,
            left_cap: Vec2::ZERO,
            right_cap: Vec2::ZERO,
        };
        paddle.sync_caps();
        paddle
    }

    /// Paddle centered near the bottom of the field
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.field_width / 2.0,
            tuning.field_height - tuning.paddle_offset,
            tuning,
        )
    }

    /// Where an attached ball rests
    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vel, 0.0)
    }

    #[inline]
    pub fn cap_radius(&self) -> f32 {
        self.height / 2.0
    }

    pub fn caps(&self) -> (Vec2, Vec2) {
        (self.left_cap, self.right_cap)
    }

    pub fn is_elongated(&self) -> bool {
        self.elongated_until.is_some()
    }

    /// Corners of the rotated rectangle
    pub fn corners(&self) -> [Vec2; 4] {
        let rotation = Rotation::degrees(self.rotation);
        let half = self.width / 2.0;
        [
            Vec2::new(-half, 0.0),
            Vec2::new(half, 0.0),
            Vec2::new(half, self.height),
            Vec2::new(-half, self.height),
        ]
        .map(|local| self.pos + rotation.apply(local))
    }

    pub fn rect_bounds(&self) -> Aabb {
        Aabb::enclosing(&self.corners())
    }

    fn cap_bounds(&self, cap: Vec2) -> Aabb {
        Aabb::around_circle(cap, self.cap_radius())
    }

    /// Put the caps back on the ends of the rectangle's long axis
    fn sync_caps(&mut self) {
        let rotation = Rotation::degrees(self.rotation);
        let half = self.width / 2.0;
        let mid = self.height / 2.0;
        self.left_cap = self.pos + rotation.apply(Vec2::new(-half, mid));
        self.right_cap = self.pos + rotation.apply(Vec2::new(half, mid));
    }

    /// Start accelerating in a direction
    pub fn steer(&mut self, direction: Steer) {
        self.accel = self.acceleration * direction.sign();
    }

    /// Stop accelerating, if still accelerating in `direction`
    pub fn release(&mut self, direction: Steer) {
        if self.accel * direction.sign() > 0.0 {
            self.accel = 0.0;
        }
    }

    /// Tilt one step, clockwise or counter-clockwise, up to the limit
    pub fn rotate(&mut self, clockwise: bool) {
        let step = if clockwise {
            PADDLE_ROTATION_STEP
        } else {
            -PADDLE_ROTATION_STEP
        };
        self.rotation = (self.rotation + step).clamp(-self.max_rotation, self.max_rotation);
        self.sync_caps();
    }

    /// Lengthen the paddle until `now + elongation_time`
    ///
    /// Does nothing while an earlier elongation is still running.
    pub fn elongate(&mut self, now: f64, barrier: &Barrier) -> bool {
        if self.elongated_until.is_some_and(|until| now < until) {
            return false;
        }
        self.elongated_until = Some(now + self.elongation_time);
        self.set_width(self.nominal_width * self.elongation_factor, barrier);
        log::debug!("Paddle elongated until t={:.1}", now + self.elongation_time);
        true
    }

    /// Return to nominal width once the elongation has expired
    pub fn update_length(&mut self, now: f64, barrier: &Barrier) -> bool {
        match self.elongated_until {
            Some(until) if now >= until => {
                self.elongated_until = None;
                self.set_width(self.nominal_width, barrier);
                log::debug!("Paddle back to nominal width");
                true
            }
            _ => false,
        }
    }

    fn set_width(&mut self, width: f32, barrier: &Barrier) {
        self.width = width;
        self.keep_inside(barrier);
        self.sync_caps();
    }

    /// Slide the paddle back inside the side walls if its ends poke through
    fn keep_inside(&mut self, barrier: &Barrier) {
        let (inner_left, inner_right) = barrier.inner_span();
        let reach = self.width / 2.0 * self.rotation.to_radians().cos()
            + self.cap_radius()
            + PADDLE_WALL_NUDGE;
        let (min_x, max_x) = (inner_left + reach, inner_right - reach);
        if min_x <= max_x {
            self.pos.x = self.pos.x.clamp(min_x, max_x);
        }
    }

    fn touches(&self, barrier: &Barrier) -> bool {
        barrier.collision(&self.cap_bounds(self.left_cap)).is_hit()
            || barrier.collision(&self.cap_bounds(self.right_cap)).is_hit()
            || barrier.collision(&self.rect_bounds()).is_hit()
    }

    /// Advance one frame: expire elongation, bounce off walls, integrate
    pub fn advance(&mut self, barrier: &Barrier, now: f64) {
        self.update_length(now, barrier);

        if self.touches(barrier) {
            // Step back toward the middle and stop dead
            if self.pos.x < barrier.center_x() {
                self.pos.x += PADDLE_WALL_NUDGE;
            } else {
                self.pos.x -= PADDLE_WALL_NUDGE;
            }
            self.accel = 0.0;
            self.vel = 0.0;
        }

        self.vel += self.accel;
        self.vel -= self.vel / PADDLE_FRICTION_DIVISOR;
        self.pos.x += self.vel;

        self.sync_caps();
    }
}

impl Collidable for Paddle {
    fn bounds(&self) -> Aabb {
        let r = self.cap_radius();
        let rect = self.rect_bounds();
        let caps = Aabb::enclosing(&[
            self.left_cap - Vec2::splat(r),
            self.left_cap + Vec2::splat(r),
            self.right_cap - Vec2::splat(r),
            self.right_cap + Vec2::splat(r),
        ]);
        Aabb::enclosing(&[
            Vec2::new(rect.left, rect.top),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(caps.left, caps.top),
            Vec2::new(caps.right(), caps.bottom()),
        ])
    }

    fn collision(&self, incoming: &Aabb) -> Contact {
        let center = incoming.center();
        let radius = incoming.width / 2.0;

        // Flat face: distance from the ball to the long axis, measured
        // perpendicular to the (possibly tilted) axis
        if self.rect_bounds().intersects(incoming)
            && center.x > self.left_cap.x
            && center.x < self.right_cap.x
        {
            let a = center - self.left_cap;
            let b = self.right_cap - self.left_cap;
            let projected = b * (a.dot(b) / b.length_squared());
            if (a - projected).length() < radius + self.height / 2.0 {
                return Contact::Vertical {
                    surface: Some(Surface {
                        angle: self.rotation,
                        velocity: self.velocity(),
                    }),
                };
            }
        }

        let left_hit = self.cap_bounds(self.left_cap).intersects(incoming);
        if left_hit || self.cap_bounds(self.right_cap).intersects(incoming) {
            let cap = if left_hit { self.left_cap } else { self.right_cap };
            if cap.distance(center) < radius + self.cap_radius() {
                return Contact::Side {
                    center: cap,
                    velocity: self.velocity(),
                };
            }
        }

        Contact::None
    }
}
