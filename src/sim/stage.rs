//! Stage layouts
//!
//! Level 1 is a random wall of bricks; later levels come from built-in
//! text patterns. Every level also gets a row of safety bricks along the
//! bottom of the stage, one fewer each level.

use glam::Vec2;
use rand::Rng;

use super::brick::{Brick, Special};
use crate::Tuning;

/// Built-in patterns for levels 2 and up
///
/// `-` is a regular brick, `~` a brick with a random special and anything
/// else an empty slot. The first line sets the number of columns.
pub const LEVEL_PATTERNS: &[&[&str]] = &[&[
    "~                  ~",
    "~                  ~",
    "~                  ~",
    "--------------------",
    "--------------------",
]];

#[derive(Debug, Clone, PartialEq)]
pub struct StageBuilder {
    /// Top-left of the area inside the barrier
    origin: Vec2,
    size: Vec2,
    brick_height: f32,
    separation: f32,
    bricks_per_line: u32,
    rows: u32,
    empty_rows: u32,
    special_bricks: u32,
    safety_bricks: u32,
}

impl StageBuilder {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let (ox, oy) = tuning.stage_origin();
        let (w, h) = tuning.stage_size();
        Self {
            origin: Vec2::new(ox, oy),
            size: Vec2::new(w, h),
            brick_height: tuning.brick_height,
            separation: tuning.brick_separation,
            bricks_per_line: tuning.bricks_per_line,
            rows: tuning.brick_rows,
            empty_rows: tuning.empty_rows,
            special_bricks: tuning.special_bricks,
            safety_bricks: tuning.safety_bricks,
        }
    }

    /// Number of levels available
    pub fn level_count(&self) -> u32 {
        1 + LEVEL_PATTERNS.len() as u32
    }

    /// Bricks and safety row for a level, or `None` past the last level
    pub fn build(&self, level: u32, rng: &mut impl Rng) -> Option<Vec<Brick>> {
        let mut bricks = self.level(level, rng)?;
        bricks.extend(self.safety_row(self.safety_count(level)));
        Some(bricks)
    }

    /// Regular bricks for a level (1-based)
    pub fn level(&self, level: u32, rng: &mut impl Rng) -> Option<Vec<Brick>> {
        match level {
            0 => None,
            1 => Some(self.random_level(rng)),
            n => LEVEL_PATTERNS
                .get(n as usize - 2)
                .map(|lines| self.pattern_level(lines, rng)),
        }
    }

    fn random_level(&self, rng: &mut impl Rng) -> Vec<Brick> {
        let columns = self.bricks_per_line;
        let slots = columns * self.rows;
        // Picks may repeat, so a level can have fewer specials than asked for
        let specials: Vec<u32> = (0..self.special_bricks)
            .map(|_| rng.random_range(0..slots.max(1)))
            .collect();

        let width = self.column_width(columns as usize);
        let mut bricks = Vec::with_capacity(slots as usize);
        for row in 0..self.rows {
            for col in 0..columns {
                let special = if specials.contains(&(row * columns + col)) {
                    random_special(rng)
                } else {
                    Special::None
                };
                bricks.push(self.brick_at(width, col, self.empty_rows + row, special));
            }
        }
        bricks
    }

    /// Lay out bricks from a text pattern
    ///
    /// Lines longer than the first are cut to its width.
    pub fn pattern_level(&self, lines: &[&str], rng: &mut impl Rng) -> Vec<Brick> {
        let Some(first) = lines.first() else {
            return Vec::new();
        };
        let columns = first.chars().count();
        if columns == 0 {
            return Vec::new();
        }
        let width = self.column_width(columns);

        let mut bricks = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            for (col, c) in line.chars().take(columns).enumerate() {
                let special = match c {
                    '-' => Special::None,
                    '~' => random_special(rng),
                    _ => continue,
                };
                bricks.push(self.brick_at(width, col as u32, row as u32, special));
            }
        }
        bricks
    }

    /// Safety bricks on a given level
    pub fn safety_count(&self, level: u32) -> u32 {
        (self.safety_bricks + 1).saturating_sub(level)
    }

    /// A row of half-height safety bricks along the bottom of the stage
    pub fn safety_row(&self, count: u32) -> Vec<Brick> {
        if count == 0 {
            return Vec::new();
        }
        let sep = self.separation;
        let width = (self.size.x - 2.0 * sep) / count as f32;
        let height = self.brick_height * 0.5;
        let top = self.origin.y + self.size.y - height - sep;
        (0..count)
            .map(|col| {
                Brick::new(
                    2.0 * sep + self.origin.x + width * col as f32,
                    top,
                    width - 2.0 * sep,
                    height,
                    Special::Safety,
                )
            })
            .collect()
    }

    /// Horizontal pitch of one brick slot, separation included
    fn column_width(&self, columns: usize) -> f32 {
        (self.size.x - self.separation) / columns as f32
    }

    fn brick_at(&self, pitch: f32, col: u32, row: u32, special: Special) -> Brick {
        let sep = self.separation;
        Brick::new(
            self.origin.x + sep + pitch * col as f32,
            self.origin.y + sep + row as f32 * (self.brick_height + sep),
            pitch - sep,
            self.brick_height,
            special,
        )
    }
}

fn random_special(rng: &mut impl Rng) -> Special {
    Special::RANDOM[rng.random_range(0..Special::RANDOM.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Collidable;
    use crate::sim::geom::Aabb;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn builder() -> StageBuilder {
        StageBuilder::from_tuning(&Tuning::default())
    }

    fn inside_stage(b: &Brick) -> bool {
        let stage = Aabb::new(15.0, 55.0, 770.0, 585.0);
        let r = b.bounds();
        r.left >= stage.left
            && r.top >= stage.top
            && r.right() <= stage.right() + 1e-3
            && r.bottom() <= stage.bottom() + 1e-3
    }

    #[test]
    fn test_random_level_fills_the_grid() {
        let mut rng = Pcg32::seed_from_u64(42);
        let bricks = builder().level(1, &mut rng).unwrap();
        assert_eq!(bricks.len(), 60);
        let specials = bricks.iter().filter(|b| b.special != Special::None).count();
        assert!((1..=6).contains(&specials));
        assert!(bricks.iter().all(|b| !b.is_safety()));
        assert!(bricks.iter().all(inside_stage));

        // Three empty rows above the first brick row
        let first = &bricks[0];
        assert_eq!(first.rect.top, 55.0 + 4.0 + 3.0 * 24.0);
        assert_eq!(first.rect.left, 19.0);
    }

    #[test]
    fn test_random_level_is_seeded() {
        let a = builder().level(1, &mut Pcg32::seed_from_u64(7)).unwrap();
        let b = builder().level(1, &mut Pcg32::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pattern_level() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bricks = builder().level(2, &mut rng).unwrap();
        let specials = bricks.iter().filter(|b| b.special != Special::None).count();
        assert_eq!(specials, 6);
        assert_eq!(bricks.len(), 46);
        assert!(bricks.iter().all(inside_stage));
        // Pattern rows start right under the top of the stage
        assert_eq!(bricks[0].rect.top, 59.0);
    }

    #[test]
    fn test_pattern_truncates_long_lines() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bricks = builder().pattern_level(&["--", "-----", " -"], &mut rng);
        assert_eq!(bricks.len(), 5);
        assert!(bricks.iter().all(inside_stage));
        assert!(builder().pattern_level(&[], &mut rng).is_empty());
    }

    #[test]
    fn test_no_level_past_the_last() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(builder().level_count(), 2);
        assert!(builder().level(3, &mut rng).is_none());
        assert!(builder().level(0, &mut rng).is_none());
        assert!(builder().build(3, &mut rng).is_none());
    }

    #[test]
    fn test_safety_row_shrinks_each_level() {
        let b = builder();
        assert_eq!(b.safety_count(1), 12);
        assert_eq!(b.safety_count(2), 11);
        assert_eq!(b.safety_count(40), 0);
        assert!(b.safety_row(0).is_empty());

        let row = b.safety_row(12);
        assert_eq!(row.len(), 12);
        assert!(row.iter().all(Brick::is_safety));
        assert!(row.iter().all(inside_stage));
        assert_eq!(row[0].rect.top, 626.0);
        assert_eq!(row[0].rect.height, 10.0);
        assert_eq!(row[0].rect.left, 23.0);
    }

    #[test]
    fn test_build_appends_safety_row() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bricks = builder().build(2, &mut rng).unwrap();
        assert_eq!(bricks.iter().filter(|b| b.is_safety()).count(), 11);
        assert_eq!(bricks.len(), 46 + 11);
    }
}
