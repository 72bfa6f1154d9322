//! Collision detection between the skier and static obstacles
//!
//! Everything is an axis-aligned box. Obstacle hitboxes are offset into their
//! sprite and scaled with it; the player's hitbox is its whole footprint.

use glam::Vec2;

use super::obstacle::{Obstacle, ObstacleKind, SpriteRect};
use super::player::{MotionState, Player};

/// Axis-aligned bounding box in absolute track units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Half-open overlap test: touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Absolute hitbox of a sprite-relative rectangle placed at `origin`
///
/// The offset and size scale with the sprite; the origin does not.
pub fn scaled_hitbox(origin: Vec2, rect: SpriteRect, scale: f32) -> Aabb {
    let offset = Vec2::new(rect.x as f32, rect.y as f32) * scale;
    let size = Vec2::new(rect.w as f32, rect.h as f32) * scale;
    Aabb::new(origin + offset, size)
}

pub fn obstacle_hitbox(obstacle: &Obstacle, scale: f32) -> Aabb {
    scaled_hitbox(obstacle.pos, obstacle.kind.hitbox(), scale)
}

pub fn player_hitbox(player: &Player, scale: f32) -> Aabb {
    Aabb::new(player.pos, Vec2::splat(player.size * scale))
}

/// Result of testing the player against obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// No contact that matters
    None,
    /// Run-ending contact with the obstacle at `index` (placement order)
    Blocked { index: usize, kind: ObstacleKind },
    /// Contact with a rock while airborne
    Survived,
}

impl CollisionOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, CollisionOutcome::Blocked { .. })
    }
}

/// Verdict for a single obstacle
pub fn resolve_contact(
    player: &Player,
    obstacle: &Obstacle,
    index: usize,
    scale: f32,
) -> CollisionOutcome {
    if !player_hitbox(player, scale).overlaps(&obstacle_hitbox(obstacle, scale)) {
        return CollisionOutcome::None;
    }
    if obstacle.kind.is_jumpable() && player.motion == MotionState::Jumping {
        CollisionOutcome::Survived
    } else {
        CollisionOutcome::Blocked {
            index,
            kind: obstacle.kind,
        }
    }
}

/// Scan obstacles in placement order; the first blocking contact wins.
///
/// Rocks cleared mid-jump do not stop the scan. Returns `None` unless some
/// obstacle blocks.
pub fn check(player: &Player, obstacles: &[Obstacle], scale: f32) -> CollisionOutcome {
    obstacles
        .iter()
        .enumerate()
        .map(|(index, obstacle)| resolve_contact(player, obstacle, index, scale))
        .find(CollisionOutcome::is_blocked)
        .unwrap_or(CollisionOutcome::None)
}
