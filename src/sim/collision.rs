//! Collision queries and response
//!
//! Every entity answers the same question: given the bounding box of an
//! incoming ball, are we touching, and if so what kind of contact is it?
//! The answer is a [`Contact`], which carries whatever the ball needs to
//! resolve the hit (a corner point, a peer's velocity, the paddle's tilt).
//!
//! Angled contacts are resolved by rotating velocities into a frame where the
//! contact normal is the y-axis, acting on the y component there, and rotating
//! back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Aabb, Rotation};

/// A moving surface reported by the paddle's flat face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Tilt of the surface in degrees (clockwise positive)
    pub angle: f32,
    /// Velocity of the surface
    pub velocity: Vec2,
}

/// Result of a collision query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Contact {
    /// No contact
    #[default]
    None,
    /// Hit a vertical wall: reflect x
    Horizontal,
    /// Hit a horizontal face: reflect y, or deflect off `surface` when it
    /// is a tilted, moving face
    Vertical { surface: Option<Surface> },
    /// Hit a rounded edge centered at `center`, moving at `velocity`
    Side { center: Vec2, velocity: Vec2 },
    /// Hit a rectangle corner at `point`
    Corner { point: Vec2 },
    /// Hit another ball centered at `center`, moving at `velocity`
    BallContact { center: Vec2, velocity: Vec2 },
}

/// The bare tag of a [`Contact`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    None,
    Horizontal,
    Vertical,
    Side,
    Corner,
    BallContact,
}

impl Contact {
    pub fn kind(&self) -> ContactKind {
        match self {
            Contact::None => ContactKind::None,
            Contact::Horizontal => ContactKind::Horizontal,
            Contact::Vertical { .. } => ContactKind::Vertical,
            Contact::Side { .. } => ContactKind::Side,
            Contact::Corner { .. } => ContactKind::Corner,
            Contact::BallContact { .. } => ContactKind::BallContact,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        !matches!(self, Contact::None)
    }
}

/// Anything a ball can bump into
pub trait Collidable {
    /// Bounding box of the whole shape
    fn bounds(&self) -> Aabb;

    /// Test a ball, described by its bounding box, against this shape
    fn collision(&self, incoming: &Aabb) -> Contact;
}

/// Angle in degrees between the vertical and the line joining `from` to `to`
///
/// Two points at the same height are exactly 90 degrees apart.
pub fn contact_angle(from: Vec2, to: Vec2) -> f32 {
    let dy = from.y - to.y;
    if dy == 0.0 {
        90.0
    } else {
        ((from.x - to.x) / dy).atan().to_degrees()
    }
}

/// Flip the velocity component named by a flat contact
///
/// Returns `None` for contacts that need angle-based resolution.
pub fn reflect(velocity: Vec2, contact: &Contact) -> Option<Vec2> {
    match contact {
        Contact::Horizontal => Some(Vec2::new(-velocity.x, velocity.y)),
        Contact::Vertical { surface: None } => Some(Vec2::new(velocity.x, -velocity.y)),
        _ => None,
    }
}

/// Bounce a velocity off a surface whose normal is `angle` degrees from the
/// vertical, adding the surface's own normal velocity times `kick`
pub fn deflect(velocity: Vec2, surface_velocity: Vec2, angle: f32, kick: f32) -> Vec2 {
    let rotation = Rotation::degrees(angle);
    let mut v = rotation.apply(velocity);
    let other = rotation.apply(surface_velocity);

    v.y = -v.y + other.y * kick;

    rotation.then(-2.0 * angle).apply(v)
}

/// Elastic collision of two equal-mass balls
///
/// Both velocities are rotated into the contact frame, their normal
/// components are swapped, and both are rotated back. Returns the new
/// velocities of `a` and `b`.
pub fn exchange(a_center: Vec2, a_vel: Vec2, b_center: Vec2, b_vel: Vec2) -> (Vec2, Vec2) {
    let angle = contact_angle(a_center, b_center);
    let rotation = Rotation::degrees(angle);
    let mut a = rotation.apply(a_vel);
    let mut b = rotation.apply(b_vel);

    std::mem::swap(&mut a.y, &mut b.y);

    let back = rotation.then(-2.0 * angle);
    (back.apply(a), back.apply(b))
}
