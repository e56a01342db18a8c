//! Bricks: static rectangles that break when hit

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collidable, Contact};
use super::geom::Aabb;

/// What happens when a brick breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Special {
    #[default]
    None,
    /// Spawns a new ball on the paddle
    ExtraBall,
    /// Temporarily lengthens the paddle
    Extender,
    /// Part of the bottom safety row; does not count toward clearing the level
    Safety,
}

impl Special {
    /// Specials that can be rolled for a random special brick
    pub const RANDOM: [Special; 2] = [Special::ExtraBall, Special::Extender];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Aabb,
    pub special: Special,
    /// Set when hit; the owner removes the brick between frames
    pub delete: bool,
}

impl Brick {
    pub fn new(left: f32, top: f32, width: f32, height: f32, special: Special) -> Self {
        Self {
            rect: Aabb::new(left, top, width, height),
            special,
            delete: false,
        }
    }

    pub fn is_safety(&self) -> bool {
        self.special == Special::Safety
    }
}

impl Collidable for Brick {
    fn bounds(&self) -> Aabb {
        self.rect
    }

    fn collision(&self, incoming: &Aabb) -> Contact {
        let rect = &self.rect;
        if !rect.intersects(incoming) {
            return Contact::None;
        }

        let center = incoming.center();
        let radius = incoming.width / 2.0;

        // Top or bottom midpoint of the ball inside the brick
        if rect.contains(Vec2::new(center.x, incoming.top))
            || rect.contains(Vec2::new(center.x, incoming.bottom()))
        {
            return Contact::Vertical { surface: None };
        }

        // Left or right midpoint inside
        if rect.contains(Vec2::new(incoming.left, center.y))
            || rect.contains(Vec2::new(incoming.right(), center.y))
        {
            return Contact::Horizontal;
        }

        // Boxes overlap near a corner; only a hit if the circle reaches it
        rect.corners()
            .into_iter()
            .find(|corner| center.distance(*corner) < radius)
            .map_or(Contact::None, |point| Contact::Corner { point })
    }
}
