//! The skier: steering, jumping and descent
//!
//! The controller runs the per-tick player state machine. It only moves the
//! skier; crashing and winning are decided by the game state machine.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;
use super::tick::TickInput;
use crate::Tuning;

/// Lane-steering bias, ordered left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Direction {
    Left = -1,
    Down = 0,
    Right = 1,
}

impl Direction {
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }

    /// Inverse of `value`, saturating outside [-1, 1]
    pub fn from_value(value: i8) -> Self {
        match value {
            i8::MIN..=-1 => Direction::Left,
            0 => Direction::Down,
            1..=i8::MAX => Direction::Right,
        }
    }

    /// One step toward Left, stopping there
    pub fn steer_left(self) -> Self {
        Self::from_value(self.value() - 1)
    }

    /// One step toward Right, stopping there
    pub fn steer_right(self) -> Self {
        Self::from_value(self.value() + 1)
    }
}

/// Whether the skis are on the snow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Moving,
    Jumping,
}

/// Sprite the renderer should use for the skier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPose {
    Down,
    Left,
    Right,
    Jumping,
    Crashed,
}

/// Player entity state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the footprint, unscaled track units
    pub pos: Vec2,
    /// Unscaled side length of the square footprint
    pub size: f32,
    pub direction: Direction,
    pub motion: MotionState,
    /// Airtime left; zero whenever `motion` is `Moving`
    pub jump_frames_remaining: u32,
}

impl Player {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            direction: Direction::Down,
            motion: MotionState::Moving,
            jump_frames_remaining: 0,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.motion == MotionState::Jumping
    }

    pub fn pose(&self) -> PlayerPose {
        match (self.motion, self.direction) {
            (MotionState::Jumping, _) => PlayerPose::Jumping,
            (MotionState::Moving, Direction::Down) => PlayerPose::Down,
            (MotionState::Moving, Direction::Left) => PlayerPose::Left,
            (MotionState::Moving, Direction::Right) => PlayerPose::Right,
        }
    }
}

/// What an update did to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Progress {
    Descending,
    ReachedGoal,
}

/// Owns the player and advances it each tick
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    player: Player,
    trail: VecDeque<Vec2>,
    /// Rightmost x the footprint may occupy
    max_x: f32,
    goal_distance: f32,
    base_speed: f32,
    steer_speed_multiplier: f32,
    jump_duration_ticks: u32,
    trail_capacity: usize,
}

impl PlayerController {
    /// Player at the home position, going straight down
    pub fn new(tuning: &Tuning) -> Self {
        Self::at(tuning, tuning.start_position())
    }

    /// Player at an arbitrary starting point, pulled onto the track if needed
    pub fn at(tuning: &Tuning, pos: Vec2) -> Self {
        let max_x = tuning.player_max_x().max(0.0);
        let pos = Vec2::new(pos.x.clamp(0.0, max_x), pos.y);
        Self {
            player: Player::new(pos, tuning.player_size),
            trail: VecDeque::with_capacity(tuning.trail_capacity),
            max_x,
            goal_distance: tuning.goal_distance,
            base_speed: tuning.base_speed,
            steer_speed_multiplier: tuning.steer_speed_multiplier,
            jump_duration_ticks: tuning.jump_duration_ticks,
            trail_capacity: tuning.trail_capacity,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Recent positions, oldest first
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    /// Whole units travelled down the course
    pub fn distance(&self) -> u32 {
        self.player.pos.y.max(0.0) as u32
    }

    /// Vertical units per tick; steering costs speed
    pub fn speed(&self) -> f32 {
        if self.player.direction == Direction::Down {
            self.base_speed
        } else {
            self.base_speed * self.steer_speed_multiplier
        }
    }

    /// Advance the skier by `delta_frames` elapsed ticks
    pub fn update(&mut self, delta_frames: u32, input: &TickInput, state: GameState) -> Progress {
        let player = &mut self.player;
        player.jump_frames_remaining = player.jump_frames_remaining.saturating_sub(delta_frames);

        // Jumping is only allowed while going straight down
        if input.jump && player.motion == MotionState::Moving && player.direction == Direction::Down {
            player.motion = MotionState::Jumping;
            player.jump_frames_remaining = self.jump_duration_ticks;
            log::debug!("Jump at y={}", player.pos.y);
        }

        if player.jump_frames_remaining == 0 && player.motion == MotionState::Jumping {
            player.motion = MotionState::Moving;
        }

        if player.motion == MotionState::Moving {
            if input.steer_left {
                player.direction = player.direction.steer_left();
            } else if input.steer_right {
                player.direction = player.direction.steer_right();
            }
        }

        let max_x = self.max_x;
        let player = &mut self.player;
        match player.direction {
            Direction::Left => player.pos.x = (player.pos.x - 1.0).max(0.0),
            Direction::Right => player.pos.x = (player.pos.x + 1.0).min(max_x),
            Direction::Down => {}
        }

        // Track edges bounce the skier back to straight descent
        if player.pos.x <= 0.0 || player.pos.x >= max_x {
            player.direction = Direction::Down;
        }

        if state == GameState::Playing {
            let speed = self.speed();
            self.player.pos.y += speed;
            if self.trail.len() >= self.trail_capacity {
                self.trail.pop_front();
            }
            self.trail.push_back(self.player.pos);
        }

        if self.player.pos.y > self.goal_distance {
            Progress::ReachedGoal
        } else {
            Progress::Descending
        }
    }
}
