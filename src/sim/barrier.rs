//! The open-bottomed wall around the play field

use serde::{Deserialize, Serialize};

use super::collision::{Collidable, Contact};
use super::geom::Aabb;
use crate::Tuning;

/// Three walls (left, top, right) framing the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub left: Aabb,
    pub top: Aabb,
    pub right: Aabb,
}

impl Barrier {
    /// Build the frame for a field of the given size
    ///
    /// `thickness` is the wall width, `buffer` the gap to the field edge and
    /// `banner` the height reserved above the frame.
    pub fn new(field_width: f32, field_height: f32, thickness: f32, buffer: f32, banner: f32) -> Self {
        let top_y = buffer + banner;
        let side_height = field_height - buffer - banner;
        Self {
            left: Aabb::new(buffer, top_y, thickness, side_height),
            top: Aabb::new(buffer, top_y, field_width - 2.0 * buffer - thickness, thickness),
            right: Aabb::new(field_width - buffer - thickness, top_y, thickness, side_height),
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.field_width,
            tuning.field_height,
            tuning.barrier_width,
            tuning.barrier_buffer,
            tuning.banner_height,
        )
    }

    /// Horizontal midpoint between the side walls
    pub fn center_x(&self) -> f32 {
        (self.left.right() + self.right.left) / 2.0
    }

    /// Inner faces of the side walls
    pub fn inner_span(&self) -> (f32, f32) {
        (self.left.right(), self.right.left)
    }
}

impl Collidable for Barrier {
    fn bounds(&self) -> Aabb {
        Aabb::new(
            self.left.left,
            self.top.top,
            self.right.right() - self.left.left,
            self.left.height,
        )
    }

    fn collision(&self, incoming: &Aabb) -> Contact {
        if self.left.intersects(incoming) || self.right.intersects(incoming) {
            Contact::Horizontal
        } else if self.top.intersects(incoming) {
            Contact::Vertical { surface: None }
        } else {
            Contact::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::ContactKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn barrier() -> Barrier {
        Barrier::new(800.0, 600.0, 10.0, 5.0, 40.0)
    }

    #[test]
    fn test_layout() {
        let b = barrier();
        assert_eq!(b.left, Aabb::new(5.0, 45.0, 10.0, 555.0));
        assert_eq!(b.top, Aabb::new(5.0, 45.0, 780.0, 10.0));
        assert_eq!(b.right, Aabb::new(785.0, 45.0, 10.0, 555.0));
        assert_eq!(b.inner_span(), (15.0, 785.0));
        assert_eq!(b.center_x(), 400.0);
    }

    #[test]
    fn test_side_walls_are_horizontal() {
        let b = barrier();
        let left = Aabb::around_circle(Vec2::new(18.0, 300.0), 5.0);
        let right = Aabb::around_circle(Vec2::new(782.0, 300.0), 5.0);
        assert_eq!(b.collision(&left).kind(), ContactKind::Horizontal);
        assert_eq!(b.collision(&right).kind(), ContactKind::Horizontal);
    }

    #[test]
    fn test_top_wall_is_vertical() {
        let b = barrier();
        let ball = Aabb::around_circle(Vec2::new(400.0, 58.0), 5.0);
        assert_eq!(b.collision(&ball), Contact::Vertical { surface: None });
    }

    #[test]
    fn test_top_corner_prefers_side() {
        let b = barrier();
        let ball = Aabb::around_circle(Vec2::new(18.0, 58.0), 5.0);
        assert_eq!(b.collision(&ball), Contact::Horizontal);
    }

    #[test]
    fn test_open_field_and_open_bottom() {
        let b = barrier();
        let middle = Aabb::around_circle(Vec2::new(400.0, 300.0), 5.0);
        let below = Aabb::around_circle(Vec2::new(400.0, 700.0), 5.0);
        assert_eq!(b.collision(&middle), Contact::None);
        assert_eq!(b.collision(&below), Contact::None);
    }

    proptest! {
        #[test]
        fn prop_clear_of_every_wall_no_contact(
            x in -100.0f32..900.0,
            y in -100.0f32..750.0,
            r in 1.0f32..20.0,
        ) {
            let b = barrier();
            let incoming = Aabb::around_circle(Vec2::new(x, y), r);
            // Covers boxes outside the whole frame as well as inside it
            prop_assume!(
                !b.left.intersects(&incoming)
                    && !b.top.intersects(&incoming)
                    && !b.right.intersects(&incoming)
            );
            prop_assert_eq!(b.collision(&incoming), Contact::None);
        }

        #[test]
        fn prop_outside_bounds_no_contact(
            x in -300.0f32..1100.0,
            y in -300.0f32..900.0,
            r in 1.0f32..20.0,
        ) {
            let b = barrier();
            let incoming = Aabb::around_circle(Vec2::new(x, y), r);
            prop_assume!(!b.bounds().intersects(&incoming));
            prop_assert_eq!(b.collision(&incoming), Contact::None);
        }
    }
}
