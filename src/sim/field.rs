//! The play field: owner of every entity
//!
//! Entities never add or remove each other. Bricks and balls only raise
//! their `delete` flag; [`Field::sweep`] removes them between frames and
//! applies whatever the broken bricks were carrying.

use glam::Vec2;
use rand::Rng;

use super::ball::{Ball, Step, Surroundings};
use super::barrier::Barrier;
use super::brick::{Brick, Special};
use super::collision::{Collidable, Contact};
use super::geom::Aabb;
use super::paddle::Paddle;
use crate::Tuning;

/// Something the sweep removed or triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepEvent {
    /// A regular brick broke, carrying this special
    BrickDestroyed(Special),
    SafetyBrickLost,
    BallSpawned,
    PaddleExtended,
    BallLost,
}

/// A borrowed entity of any kind, for walking the whole field
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Paddle(&'a Paddle),
    Barrier(&'a Barrier),
    Brick(&'a Brick),
    Ball(&'a Ball),
}

impl Collidable for EntityRef<'_> {
    fn bounds(&self) -> Aabb {
        match self {
            EntityRef::Paddle(p) => p.bounds(),
            EntityRef::Barrier(b) => b.bounds(),
            EntityRef::Brick(b) => b.bounds(),
            EntityRef::Ball(b) => b.bounds(),
        }
    }

    fn collision(&self, incoming: &Aabb) -> Contact {
        match self {
            EntityRef::Paddle(p) => p.collision(incoming),
            EntityRef::Barrier(b) => b.collision(incoming),
            EntityRef::Brick(b) => b.collision(incoming),
            EntityRef::Ball(b) => b.collision(incoming),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub paddle: Paddle,
    pub barrier: Barrier,
    /// Safety bricks first, then regular bricks
    pub bricks: Vec<Brick>,
    pub balls: Vec<Ball>,
    field_height: f32,
    ball_radius: f32,
    max_speed: f32,
    safety_remaining: usize,
    bricks_remaining: usize,
}

impl Field {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            paddle: Paddle::from_tuning(tuning),
            barrier: Barrier::from_tuning(tuning),
            bricks: Vec::new(),
            balls: Vec::new(),
            field_height: tuning.field_height,
            ball_radius: tuning.ball_radius,
            max_speed: tuning.ball_max_speed,
            safety_remaining: 0,
            bricks_remaining: 0,
        }
    }

    /// Replace the bricks, keeping safety bricks at the front
    pub fn load_bricks(&mut self, mut bricks: Vec<Brick>) {
        bricks.sort_by_key(|b| !b.is_safety());
        self.safety_remaining = bricks.iter().filter(|b| b.is_safety()).count();
        self.bricks_remaining = bricks.len() - self.safety_remaining;
        self.bricks = bricks;
    }

    /// Drop every brick and ball
    pub fn clear(&mut self) {
        self.bricks.clear();
        self.balls.clear();
        self.safety_remaining = 0;
        self.bricks_remaining = 0;
    }

    /// Regular bricks still standing (safety bricks excluded)
    pub fn bricks_remaining(&self) -> usize {
        self.bricks_remaining
    }

    pub fn safety_remaining(&self) -> usize {
        self.safety_remaining
    }

    /// Add a ball resting on the paddle
    pub fn spawn_attached_ball(&mut self) {
        self.balls
            .push(Ball::attached(self.paddle.anchor(), self.ball_radius));
    }

    /// Add a free ball
    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.balls.push(Ball::new(pos, vel, self.ball_radius));
    }

    /// Launch the first ball riding the paddle
    pub fn release_ball(&mut self, rng: &mut impl Rng) -> bool {
        let max_speed = self.max_speed;
        self.balls
            .iter_mut()
            .find(|b| b.is_attached())
            .is_some_and(|b| b.detach(max_speed, rng))
    }

    /// Remove everything marked for deletion and apply brick specials
    pub fn sweep(&mut self, now: f64) -> Vec<SweepEvent> {
        let mut events = Vec::new();

        let (broken, standing): (Vec<Brick>, Vec<Brick>) =
            std::mem::take(&mut self.bricks).into_iter().partition(|b| b.delete);
        self.bricks = standing;

        for brick in broken {
            match brick.special {
                Special::Safety => {
                    self.safety_remaining = self.safety_remaining.saturating_sub(1);
                    events.push(SweepEvent::SafetyBrickLost);
                    continue;
                }
                Special::ExtraBall => {
                    self.spawn_attached_ball();
                    log::debug!("Extra ball brick: {} balls", self.balls.len());
                    events.push(SweepEvent::BallSpawned);
                }
                Special::Extender => {
                    if self.paddle.elongate(now, &self.barrier) {
                        events.push(SweepEvent::PaddleExtended);
                    }
                }
                Special::None => {}
            }
            self.bricks_remaining = self.bricks_remaining.saturating_sub(1);
            events.push(SweepEvent::BrickDestroyed(brick.special));
        }

        let before = self.balls.len();
        self.balls.retain(|b| !b.delete);
        for _ in self.balls.len()..before {
            events.push(SweepEvent::BallLost);
        }
        if self.balls.len() < before {
            log::debug!("{} ball(s) lost, {} left", before - self.balls.len(), self.balls.len());
        }

        events
    }

    /// Advance the paddle, then every ball in order
    pub fn step(&mut self, now: f64) -> Vec<Step> {
        self.paddle.advance(&self.barrier, now);

        let mut steps = Vec::with_capacity(self.balls.len());
        for i in 0..self.balls.len() {
            let (before, rest) = self.balls.split_at_mut(i);
            let Some((ball, after)) = rest.split_first_mut() else {
                break;
            };
            let mut env = Surroundings {
                barrier: &self.barrier,
                paddle: &self.paddle,
                bricks: &mut self.bricks,
                field_height: self.field_height,
                max_speed: self.max_speed,
            };
            steps.push(ball.advance(&mut env, before.iter_mut().chain(after.iter_mut())));
        }
        steps
    }

    /// Every entity in layout order: paddle, barrier, bricks, balls
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        [EntityRef::Paddle(&self.paddle), EntityRef::Barrier(&self.barrier)]
            .into_iter()
            .chain(self.bricks.iter().map(EntityRef::Brick))
            .chain(self.balls.iter().map(EntityRef::Ball))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Hit;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Field {
        Field::new(&Tuning::default())
    }

    #[test]
    fn test_load_puts_safety_first() {
        let mut f = field();
        f.load_bricks(vec![
            Brick::new(100.0, 100.0, 40.0, 20.0, Special::None),
            Brick::new(100.0, 620.0, 40.0, 10.0, Special::Safety),
            Brick::new(200.0, 100.0, 40.0, 20.0, Special::ExtraBall),
            Brick::new(200.0, 620.0, 40.0, 10.0, Special::Safety),
        ]);
        assert!(f.bricks[0].is_safety());
        assert!(f.bricks[1].is_safety());
        assert!(!f.bricks[2].is_safety());
        assert_eq!(f.safety_remaining(), 2);
        assert_eq!(f.bricks_remaining(), 2);
    }

    #[test]
    fn test_sweep_counts_and_specials() {
        let mut f = field();
        f.load_bricks(vec![
            Brick::new(100.0, 620.0, 40.0, 10.0, Special::Safety),
            Brick::new(100.0, 100.0, 40.0, 20.0, Special::None),
            Brick::new(200.0, 100.0, 40.0, 20.0, Special::ExtraBall),
            Brick::new(300.0, 100.0, 40.0, 20.0, Special::Extender),
        ]);
        for brick in &mut f.bricks {
            brick.delete = true;
        }
        let events = f.sweep(5.0);

        assert!(f.bricks.is_empty());
        assert_eq!(f.bricks_remaining(), 0);
        assert_eq!(f.safety_remaining(), 0);
        assert_eq!(f.balls.len(), 1);
        assert!(f.balls[0].is_attached());
        assert!(f.paddle.is_elongated());
        assert!(events.contains(&SweepEvent::SafetyBrickLost));
        assert!(events.contains(&SweepEvent::BallSpawned));
        assert!(events.contains(&SweepEvent::PaddleExtended));
        assert!(events.contains(&SweepEvent::BrickDestroyed(Special::Extender)));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SweepEvent::BrickDestroyed(_)))
                .count(),
            3
        );
    }

    #[test]
    fn test_sweep_removes_lost_balls() {
        let mut f = field();
        f.spawn_ball(Vec2::new(100.0, 300.0), Vec2::ZERO);
        f.spawn_ball(Vec2::new(200.0, 700.0), Vec2::new(0.0, 3.0));
        f.step(0.0);
        assert!(f.balls[1].delete);
        // Still present until the sweep
        assert_eq!(f.balls.len(), 2);
        let events = f.sweep(0.0);
        assert_eq!(events, vec![SweepEvent::BallLost]);
        assert_eq!(f.balls.len(), 1);
    }

    #[test]
    fn test_step_resolves_ball_pair_once() {
        let mut f = field();
        f.spawn_ball(Vec2::new(100.0, 300.0), Vec2::new(0.0, -2.0));
        f.spawn_ball(Vec2::new(100.0, 308.0), Vec2::new(0.0, 3.0));
        let steps = f.step(0.0);
        assert_eq!(steps[0], Step::Moved(Some(Hit::Ball)));
        // The second ball sees the first already flipped and skips it
        assert_eq!(steps[1], Step::Moved(None));
        assert!((f.balls[0].velocity() - Vec2::new(0.0, 3.0)).length() < 1e-4);
        assert!((f.balls[1].velocity() - Vec2::new(0.0, -2.0)).length() < 1e-4);
        assert_eq!(f.balls[0].parity, f.balls[1].parity);
    }

    #[test]
    fn test_brick_stays_until_sweep() {
        let mut f = field();
        f.load_bricks(vec![Brick::new(90.0, 280.0, 40.0, 20.0, Special::None)]);
        f.spawn_ball(Vec2::new(100.0, 304.0), Vec2::new(0.0, -2.0));
        f.spawn_ball(Vec2::new(120.0, 304.0), Vec2::new(0.0, -2.0));
        let steps = f.step(0.0);
        // Both balls hit the same brick this frame; it is only removed once
        assert_eq!(steps, vec![Step::Moved(Some(Hit::Brick(0))); 2]);
        assert_eq!(f.bricks.len(), 1);
        let events = f.sweep(0.0);
        assert_eq!(events, vec![SweepEvent::BrickDestroyed(Special::None)]);
        assert_eq!(f.bricks_remaining(), 0);
    }

    #[test]
    fn test_release_first_attached() {
        let mut f = field();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(!f.release_ball(&mut rng));
        f.spawn_attached_ball();
        f.spawn_attached_ball();
        assert!(f.release_ball(&mut rng));
        assert!(!f.balls[0].is_attached());
        assert!(f.balls[1].is_attached());
    }

    #[test]
    fn test_attached_ball_follows_paddle() {
        let mut f = field();
        f.spawn_attached_ball();
        f.paddle.vel = 5.0;
        f.step(0.0);
        let anchor = f.paddle.anchor();
        assert_eq!(f.balls[0].pos, Vec2::new(anchor.x, anchor.y - 6.0));
    }

    #[test]
    fn test_entities_in_layout_order() {
        let mut f = field();
        f.load_bricks(vec![
            Brick::new(100.0, 100.0, 40.0, 20.0, Special::None),
            Brick::new(100.0, 620.0, 40.0, 10.0, Special::Safety),
        ]);
        f.spawn_attached_ball();
        let kinds: Vec<&str> = f
            .entities()
            .map(|e| match e {
                EntityRef::Paddle(_) => "paddle",
                EntityRef::Barrier(_) => "barrier",
                EntityRef::Brick(b) if b.is_safety() => "safety",
                EntityRef::Brick(_) => "brick",
                EntityRef::Ball(_) => "ball",
            })
            .collect();
        assert_eq!(kinds, ["paddle", "barrier", "safety", "brick", "ball"]);

        let probe = Aabb::around_circle(Vec2::new(110.0, 104.0), 5.0);
        let hits = f.entities().filter(|e| e.collision(&probe).is_hit()).count();
        assert_eq!(hits, 1);
    }
}
