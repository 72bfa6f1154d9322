//! Downhill - A vertically scrolling skiing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, obstacles, collisions, scenes)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input polling and audio belong to the host. The core only
//! consumes per-tick input and exposes read-only snapshots.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Host frame rate; one simulation tick per rendered frame
    pub const FPS: u32 = 60;

    /// Track dimensions (unscaled world units)
    pub const TRACK_WIDTH: f32 = 320.0;
    pub const COURSE_LENGTH: u32 = 2400; // 10 screens of 240
    pub const GOAL_DISTANCE: f32 = 1200.0;
    /// Obstacles never spawn above this line so the run starts clear
    pub const OBSTACLE_Y_MIN: u32 = 100;

    /// Player defaults; the start x is the track centre
    pub const PLAYER_START_Y: f32 = 30.0;
    /// Player footprint is square
    pub const PLAYER_SIZE: f32 = 8.0;
    pub const BASE_SPEED: f32 = 1.0;
    /// Vertical speed multiplier while steering
    pub const STEER_SPEED_MULTIPLIER: f32 = 0.8;
    pub const JUMP_DURATION_TICKS: u32 = 50;

    /// Sprites and hitboxes are both drawn at this scale
    pub const RENDER_SCALE: f32 = 2.0;

    /// Trail points kept for rendering
    pub const TRAIL_CAPACITY: usize = 40;

    /// Obstacle counts per run
    pub const TREE_COUNT: u32 = 100;
    pub const ROCK_COUNT: u32 = 30;
}
