//! Axis-aligned boxes and rotation transforms
//!
//! Screen coordinates: x grows to the right, y grows downward, and positive
//! rotations turn clockwise on screen.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use crate::normalize_degrees;

/// An axis-aligned bounding box stored as its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box tightly enclosing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius)
    }

    /// Smallest box enclosing every point
    pub fn enclosing(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .skip(1)
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right(), self.top),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left, self.bottom()),
        ]
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// Boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left.max(other.left) < self.right().min(other.right())
            && self.top.max(other.top) < self.bottom().min(other.bottom())
    }
}

/// A composable 2D rotation, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    degrees: f32,
}

impl Rotation {
    pub fn degrees(degrees: f32) -> Self {
        Self {
            degrees: normalize_degrees(degrees),
        }
    }

    pub fn angle(&self) -> f32 {
        self.degrees
    }

    /// Compose with a further rotation
    pub fn rotate(&mut self, degrees: f32) -> &mut Self {
        self.degrees = normalize_degrees(self.degrees + degrees);
        self
    }

    pub fn then(self, degrees: f32) -> Self {
        Self::degrees(self.degrees + degrees)
    }

    pub fn inverse(self) -> Self {
        Self::degrees(-self.degrees)
    }

    pub fn matrix(&self) -> Mat2 {
        Mat2::from_angle(self.degrees.to_radians())
    }

    #[inline]
    pub fn apply(&self, v: Vec2) -> Vec2 {
        self.matrix() * v
    }
}
