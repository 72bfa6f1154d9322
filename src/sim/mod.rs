//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed frames come from the host, never from a wall clock
//! - Seeded RNG only
//! - Stable iteration order (placement order for obstacles)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;

pub use clock::{ClockError, FrameTimer};
pub use collision::{Aabb, CollisionOutcome, check};
pub use obstacle::{Obstacle, ObstacleCounts, ObstacleField, ObstacleKind, SpriteRect};
pub use player::{Direction, MotionState, Player, PlayerController, PlayerPose, Progress};
pub use state::{GameEvent, GameState, GameStateMachine, Run, RunSummary, Scene, Snapshot};
pub use tick::{TickInput, tick, tick_at};
