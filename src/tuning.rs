//! Data-driven field layout and game balance
//!
//! Loaded from JSON; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Field dimensions and balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    /// Width of the play field (window) in pixels
    pub field_width: f32,
    /// Height of the play field; a ball whose top passes this is lost
    pub field_height: f32,
    /// Height reserved above the barrier for the HUD banner
    pub banner_height: f32,
    /// Thickness of the barrier walls
    pub barrier_width: f32,
    /// Gap between the barrier and the field edge
    pub barrier_buffer: f32,

    // === Paddle ===
    /// Nominal paddle width (end-caps extend half the height past each end)
    pub paddle_width: f32,
    /// Paddle thickness, also the end-cap diameter
    pub paddle_height: f32,
    /// Distance from the bottom of the field to the paddle's top edge
    pub paddle_offset: f32,
    /// Horizontal acceleration per frame while steering
    pub paddle_acceleration: f32,
    /// Maximum tilt either side of level, in degrees
    pub paddle_max_rotation: f32,
    /// Seconds an extender brick keeps the paddle long
    pub paddle_elongation_time: f64,
    /// Width multiplier while elongated
    pub paddle_elongation_factor: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Per-axis speed ceiling in pixels per frame
    pub ball_max_speed: f32,

    // === Bricks ===
    pub brick_height: f32,
    pub brick_separation: f32,
    pub bricks_per_line: u32,
    pub brick_rows: u32,
    /// Empty rows left above the first brick row
    pub empty_rows: u32,
    /// Special bricks placed at random on the first level
    pub special_bricks: u32,
    /// Safety bricks on level one; one fewer each level after
    pub safety_bricks: u32,

    // === Timing ===
    /// Seconds between a cleared level and the next one
    pub level_break_time: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 640.0,
            banner_height: 40.0,
            barrier_width: 10.0,
            barrier_buffer: 5.0,

            paddle_width: 80.0,
            paddle_height: 12.0,
            paddle_offset: 40.0,
            paddle_acceleration: 0.8,
            paddle_max_rotation: 15.0,
            paddle_elongation_time: 10.0,
            paddle_elongation_factor: 1.6,

            ball_radius: 6.0,
            ball_max_speed: 8.0,

            brick_height: 20.0,
            brick_separation: 4.0,
            bricks_per_line: 12,
            brick_rows: 5,
            empty_rows: 3,
            special_bricks: 6,
            safety_bricks: 12,

            level_break_time: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that the values describe a playable field
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("barrier_width", self.barrier_width)?;
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("paddle_acceleration", self.paddle_acceleration)?;
        positive("ball_radius", self.ball_radius)?;
        positive("ball_max_speed", self.ball_max_speed)?;
        positive("brick_height", self.brick_height)?;

        if !(0.0..90.0).contains(&self.paddle_max_rotation) {
            return Err(TuningError::Invalid {
                field: "paddle_max_rotation",
                reason: format!("must be in [0, 90), got {}", self.paddle_max_rotation),
            });
        }
        if self.paddle_elongation_factor < 1.0 {
            return Err(TuningError::Invalid {
                field: "paddle_elongation_factor",
                reason: format!("must be at least 1, got {}", self.paddle_elongation_factor),
            });
        }
        if self.bricks_per_line == 0 {
            return Err(TuningError::Invalid {
                field: "bricks_per_line",
                reason: "must be at least 1".to_string(),
            });
        }

        let inner_width = self.field_width - 2.0 * (self.barrier_buffer + self.barrier_width);
        if self.paddle_width * self.paddle_elongation_factor + self.paddle_height >= inner_width {
            return Err(TuningError::Invalid {
                field: "paddle_width",
                reason: format!("elongated paddle does not fit inside the barrier ({inner_width})"),
            });
        }
        Ok(())
    }

    /// Top-left corner of the area inside the barrier where bricks are placed
    pub fn stage_origin(&self) -> (f32, f32) {
        let inset = self.barrier_buffer + self.barrier_width;
        (inset, self.banner_height + inset)
    }

    /// Size of the area inside the barrier where bricks are placed
    pub fn stage_size(&self) -> (f32, f32) {
        let inset = self.barrier_buffer + self.barrier_width;
        (
            self.field_width - 2.0 * inset,
            self.field_height - self.banner_height - inset,
        )
    }
}
