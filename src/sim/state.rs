//! Game state and level progression
//!
//! Everything the host loop needs between frames lives here. Time is never
//! read from the system; every method that cares takes `now` in seconds.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::brick::Special;
use super::field::{Field, SweepEvent};
use super::stage::StageBuilder;
use crate::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level done, waiting out the break before the next one
    LevelCleared,
    /// Run ended; `won` if the last level was cleared
    GameOver { won: bool },
}

/// Something the host may want to show or log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted(u32),
    LevelCleared {
        level: u32,
        /// Seconds spent on the level, pauses excluded
        time: f64,
        /// Beat the previous best for this level
        new_best: bool,
    },
    GameOver {
        won: bool,
    },
    BrickDestroyed(Special),
    SafetyBrickLost,
    BallSpawned,
    BallLost,
    PaddleExtended,
    Paused,
    Resumed,
}

impl From<SweepEvent> for GameEvent {
    fn from(event: SweepEvent) -> Self {
        match event {
            SweepEvent::BrickDestroyed(special) => GameEvent::BrickDestroyed(special),
            SweepEvent::SafetyBrickLost => GameEvent::SafetyBrickLost,
            SweepEvent::BallSpawned => GameEvent::BallSpawned,
            SweepEvent::PaddleExtended => GameEvent::PaddleExtended,
            SweepEvent::BallLost => GameEvent::BallLost,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    pub field: Field,
    /// Frames simulated while playing
    pub frames: u64,
    pub(crate) rng: Pcg32,
    tuning: Tuning,
    builder: StageBuilder,
    level_started_at: f64,
    paused_at: Option<f64>,
    paused_seconds: f64,
    /// When the break after a cleared level ends
    break_until: Option<f64>,
    /// Best clear time per level, index 0 is level 1
    best_times: Vec<Option<f64>>,
}

impl GameState {
    /// Create a new game on level 1
    pub fn new(tuning: Tuning, seed: u64, now: f64) -> Self {
        let mut state = Self {
            seed,
            level: 0,
            phase: GamePhase::Playing,
            field: Field::new(&tuning),
            frames: 0,
            rng: Pcg32::seed_from_u64(seed),
            builder: StageBuilder::from_tuning(&tuning),
            tuning,
            level_started_at: now,
            paused_at: None,
            paused_seconds: 0.0,
            break_until: None,
            best_times: Vec::new(),
        };
        state.start_level(1, now);
        state
    }

    /// Seconds spent on the current level, pauses excluded
    pub fn level_time(&self, now: f64) -> f64 {
        let paused = self.paused_seconds + self.paused_at.map_or(0.0, |at| now - at);
        (now - self.level_started_at - paused).max(0.0)
    }

    pub fn best_time(&self, level: u32) -> Option<f64> {
        let index = level.checked_sub(1)? as usize;
        self.best_times.get(index).copied().flatten()
    }

    /// Load `level` onto a fresh field
    ///
    /// Past the last level the run ends as a win.
    pub fn start_level(&mut self, level: u32, now: f64) -> GameEvent {
        let Some(bricks) = self.builder.build(level, &mut self.rng) else {
            log::info!("No level {level}, game won");
            self.phase = GamePhase::GameOver { won: true };
            return GameEvent::GameOver { won: true };
        };

        self.field = Field::new(&self.tuning);
        self.field.load_bricks(bricks);
        self.field.spawn_attached_ball();

        self.level = level;
        self.phase = GamePhase::Playing;
        self.level_started_at = now;
        self.paused_at = None;
        self.paused_seconds = 0.0;
        self.break_until = None;

        log::info!(
            "Level {} started: {} bricks, {} safety bricks",
            level,
            self.field.bricks_remaining(),
            self.field.safety_remaining()
        );
        GameEvent::LevelStarted(level)
    }

    /// Start over from level 1, keeping best times and the RNG stream
    pub fn restart(&mut self, now: f64) -> GameEvent {
        log::info!("Restarting run");
        self.frames = 0;
        self.start_level(1, now)
    }

    pub fn pause(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.paused_at = Some(now);
        true
    }

    pub fn resume(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        if let Some(at) = self.paused_at.take() {
            self.paused_seconds += now - at;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Record the clear time and start the break before the next level
    pub(crate) fn clear_level(&mut self, now: f64) -> GameEvent {
        let time = self.level_time(now);
        let new_best = self.record_time(self.level, time);
        log::info!("Level {} cleared in {:.2}s{}", self.level, time, if new_best { " (best)" } else { "" });

        self.field.clear();
        self.phase = GamePhase::LevelCleared;
        self.break_until = Some(now + self.tuning.level_break_time);
        GameEvent::LevelCleared {
            level: self.level,
            time,
            new_best,
        }
    }

    /// Whether the break after a cleared level is over
    pub(crate) fn break_over(&self, now: f64) -> bool {
        self.break_until.is_some_and(|until| now >= until)
    }

    pub(crate) fn lose(&mut self) -> GameEvent {
        log::info!("Game over on level {} after {} frames", self.level, self.frames);
        self.phase = GamePhase::GameOver { won: false };
        GameEvent::GameOver { won: false }
    }

    /// Keep the faster time; true if this one is an improvement
    fn record_time(&mut self, level: u32, time: f64) -> bool {
        let Some(index) = level.checked_sub(1).map(|i| i as usize) else {
            return false;
        };
        if self.best_times.len() <= index {
            self.best_times.resize(index + 1, None);
        }
        match self.best_times[index] {
            Some(best) if best <= time => false,
            _ => {
                self.best_times[index] = Some(time);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_starts_level_one() {
        let state = GameState::new(Tuning::default(), 12345, 0.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.field.bricks_remaining(), 60);
        assert_eq!(state.field.safety_remaining(), 12);
        assert_eq!(state.field.balls.len(), 1);
        assert!(state.field.balls[0].is_attached());
    }

    #[test]
    fn test_level_time_excludes_pauses() {
        let mut state = GameState::new(Tuning::default(), 1, 10.0);
        assert!(state.pause(12.0));
        assert!(!state.pause(13.0));
        assert_eq!(state.level_time(14.0), 2.0);
        assert!(state.resume(15.0));
        assert_eq!(state.level_time(20.0), 7.0);
    }

    #[test]
    fn test_best_times_only_improve() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        assert!(state.record_time(1, 30.0));
        assert!(!state.record_time(1, 45.0));
        assert!(state.record_time(1, 20.0));
        assert_eq!(state.best_time(1), Some(20.0));
        assert_eq!(state.best_time(2), None);
        assert_eq!(state.best_time(0), None);
    }

    #[test]
    fn test_clear_level_starts_break() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        let event = state.clear_level(25.0);
        assert_eq!(
            event,
            GameEvent::LevelCleared {
                level: 1,
                time: 25.0,
                new_best: true
            }
        );
        assert_eq!(state.phase, GamePhase::LevelCleared);
        assert!(state.field.balls.is_empty());
        assert!(!state.break_over(27.0));
        assert!(state.break_over(28.0));
    }

    #[test]
    fn test_past_last_level_is_a_win() {
        let mut state = GameState::new(Tuning::default(), 1, 0.0);
        assert_eq!(state.start_level(2, 0.0), GameEvent::LevelStarted(2));
        assert_eq!(state.field.safety_remaining(), 11);
        assert_eq!(state.start_level(3, 0.0), GameEvent::GameOver { won: true });
        assert_eq!(state.phase, GamePhase::GameOver { won: true });
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(Tuning::default(), 99, 0.0);
        let b = GameState::new(Tuning::default(), 99, 0.0);
        assert_eq!(a.field.bricks, b.field.bricks);
    }
}
