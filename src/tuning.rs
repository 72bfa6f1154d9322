//! Data-driven game balance
//!
//! Loaded from JSON by the host. Every field has a default so a partial file
//! only overrides what it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ObstacleCounts;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    /// Horizontal extent of the track
    pub track_width: f32,
    /// Furthest y an obstacle may be placed at
    pub course_length: u32,
    /// Nearest y an obstacle may be placed at
    pub obstacle_y_min: u32,
    /// Run is won once the player passes this y
    pub goal_distance: f32,

    // === Player ===
    /// Home position for every new run (centred on the track when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_start: Option<Vec2>,
    /// Unscaled side length of the player's footprint
    pub player_size: f32,
    /// Vertical units per tick while going straight down
    pub base_speed: f32,
    /// Applied to `base_speed` while steering (1.0 disables the penalty)
    pub steer_speed_multiplier: f32,
    /// Airtime per jump, in ticks
    pub jump_duration_ticks: u32,
    /// Maximum trail points retained
    pub trail_capacity: usize,

    // === Rendering contract ===
    /// Shared sprite/hitbox scale
    pub render_scale: f32,

    // === Course ===
    pub obstacles: ObstacleCounts,
    /// Seed for the first run
    pub seed: u64,
    /// Lay out a fresh course on every restart
    pub reseed_on_restart: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            track_width: TRACK_WIDTH,
            course_length: COURSE_LENGTH,
            obstacle_y_min: OBSTACLE_Y_MIN,
            goal_distance: GOAL_DISTANCE,

            player_start: None,
            player_size: PLAYER_SIZE,
            base_speed: BASE_SPEED,
            steer_speed_multiplier: STEER_SPEED_MULTIPLIER,
            jump_duration_ticks: JUMP_DURATION_TICKS,
            trail_capacity: TRAIL_CAPACITY,

            render_scale: RENDER_SCALE,

            obstacles: ObstacleCounts {
                trees: TREE_COUNT,
                rocks: ROCK_COUNT,
            },
            seed: 0,
            reseed_on_restart: true,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Rightmost x the player may occupy
    #[inline]
    pub fn player_max_x(&self) -> f32 {
        self.track_width - self.player_size
    }

    /// Where every new run begins
    pub fn start_position(&self) -> Vec2 {
        self.player_start
            .unwrap_or_else(|| Vec2::new(self.track_width / 2.0, PLAYER_START_Y))
    }

    /// Reject geometry the simulation cannot run on
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if !(self.player_size > 0.0) {
            return invalid(format!("player_size must be positive, got {}", self.player_size));
        }
        if !(self.track_width > self.player_size) {
            return invalid(format!(
                "track_width {} must exceed player_size {}",
                self.track_width, self.player_size
            ));
        }
        let start = self.start_position();
        if start.x < 0.0 || start.x > self.player_max_x() {
            return invalid(format!(
                "player_start.x {} outside [0, {}]",
                start.x,
                self.player_max_x()
            ));
        }
        if !(self.render_scale > 0.0) {
            return invalid(format!("render_scale must be positive, got {}", self.render_scale));
        }
        if !(self.base_speed >= 0.0) || !(self.steer_speed_multiplier >= 0.0) {
            return invalid("speeds must be non-negative".to_string());
        }
        if self.trail_capacity == 0 {
            return invalid("trail_capacity must be at least 1".to_string());
        }
        if !self.goal_distance.is_finite() {
            return invalid("goal_distance must be finite".to_string());
        }
        Ok(())
    }
}
