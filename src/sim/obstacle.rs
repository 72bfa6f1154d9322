//! Static obstacles and course generation
//!
//! A course is laid out once per run from a seed and never changes afterwards.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Axis-aligned rectangle in unscaled sprite units, relative to a sprite origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: u8,
    pub y: u8,
    pub w: u8,
    pub h: u8,
}

impl SpriteRect {
    pub const fn new(x: u8, y: u8, w: u8, h: u8) -> Self {
        Self { x, y, w, h }
    }

    /// True if `other` lies entirely inside `self`
    pub fn contains(&self, other: &SpriteRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x as u16 + other.w as u16 <= self.x as u16 + self.w as u16
            && other.y as u16 + other.h as u16 <= self.y as u16 + self.h as u16
    }
}

/// Obstacle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    TreeGreen,
    TreeHalf,
    TreeWhite,
    RockSmall,
    RockWide,
}

/// Per-kind geometry
#[derive(Debug, Clone, Copy)]
struct KindGeometry {
    footprint: SpriteRect,
    hitbox: SpriteRect,
}

/// Trees only collide on the trunk and lower branches
const TREE_HITBOX: SpriteRect = SpriteRect::new(3, 0, 11, 12);

/// Indexed by `ObstacleKind as usize`
const KIND_GEOMETRY: [KindGeometry; 5] = [
    // TreeGreen
    KindGeometry {
        footprint: SpriteRect::new(0, 0, 16, 16),
        hitbox: TREE_HITBOX,
    },
    // TreeHalf
    KindGeometry {
        footprint: SpriteRect::new(0, 0, 16, 16),
        hitbox: TREE_HITBOX,
    },
    // TreeWhite
    KindGeometry {
        footprint: SpriteRect::new(0, 0, 16, 16),
        hitbox: TREE_HITBOX,
    },
    // RockSmall
    KindGeometry {
        footprint: SpriteRect::new(0, 0, 8, 8),
        hitbox: SpriteRect::new(1, 1, 7, 4),
    },
    // RockWide
    KindGeometry {
        footprint: SpriteRect::new(0, 0, 16, 8),
        hitbox: SpriteRect::new(3, 3, 11, 5),
    },
];

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::TreeGreen,
        ObstacleKind::TreeHalf,
        ObstacleKind::TreeWhite,
        ObstacleKind::RockSmall,
        ObstacleKind::RockWide,
    ];
    pub const TREES: [ObstacleKind; 3] = [
        ObstacleKind::TreeGreen,
        ObstacleKind::TreeHalf,
        ObstacleKind::TreeWhite,
    ];
    pub const ROCKS: [ObstacleKind; 2] = [ObstacleKind::RockSmall, ObstacleKind::RockWide];

    #[inline]
    fn geometry(self) -> &'static KindGeometry {
        &KIND_GEOMETRY[self as usize]
    }

    /// Full sprite extent, unscaled
    pub fn footprint(self) -> SpriteRect {
        self.geometry().footprint
    }

    /// Collision rectangle relative to the sprite origin, unscaled
    pub fn hitbox(self) -> SpriteRect {
        self.geometry().hitbox
    }

    /// Rocks can be cleared by jumping; trees cannot
    pub fn is_jumpable(self) -> bool {
        matches!(self, ObstacleKind::RockSmall | ObstacleKind::RockWide)
    }

    pub fn is_tree(self) -> bool {
        !self.is_jumpable()
    }
}

/// A placed obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Sprite origin (top-left), unscaled track units
    pub pos: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(pos: Vec2, kind: ObstacleKind) -> Self {
        Self { pos, kind }
    }
}

/// How many obstacles of each family a course gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleCounts {
    pub trees: u32,
    pub rocks: u32,
}

/// The fixed set of obstacles for one run (iteration order = placement order)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    /// Lay out a course. Same arguments, same course.
    ///
    /// Trees are placed first, then rocks. Obstacles may overlap each other.
    pub fn generate(
        seed: u64,
        track_width: f32,
        course_length: u32,
        y_min: u32,
        counts: ObstacleCounts,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let capacity = counts.trees as usize + counts.rocks as usize;
        let mut obstacles = Vec::with_capacity(capacity);

        for (count, family) in [
            (counts.trees, &ObstacleKind::TREES[..]),
            (counts.rocks, &ObstacleKind::ROCKS[..]),
        ] {
            for _ in 0..count {
                let kind = family[rng.random_range(0..family.len())];
                let max_x = (track_width - kind.footprint().w as f32).max(0.0) as u32;
                let x = rng.random_range(0..=max_x);
                let y = rng.random_range(y_min..=course_length.max(y_min));
                obstacles.push(Obstacle::new(Vec2::new(x as f32, y as f32), kind));
            }
        }

        log::debug!(
            "Generated course seed={} trees={} rocks={}",
            seed,
            counts.trees,
            counts.rocks
        );
        Self { obstacles }
    }

    /// Lay out the course described by `tuning`
    pub fn from_tuning(seed: u64, tuning: &Tuning) -> Self {
        Self::generate(
            seed,
            tuning.track_width,
            tuning.course_length,
            tuning.obstacle_y_min,
            tuning.obstacles,
        )
    }

    /// Build a field from an explicit obstacle list (hand-authored courses)
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts(trees: u32, rocks: u32) -> ObstacleCounts {
        ObstacleCounts { trees, rocks }
    }

    #[test]
    fn test_hitboxes_inside_footprints() {
        for kind in ObstacleKind::ALL {
            assert!(
                kind.footprint().contains(&kind.hitbox()),
                "{:?} hitbox escapes its footprint",
                kind
            );
        }
    }

    #[test]
    fn test_only_rocks_are_jumpable() {
        for kind in ObstacleKind::TREES {
            assert!(kind.is_tree());
            assert!(!kind.is_jumpable());
        }
        for kind in ObstacleKind::ROCKS {
            assert!(kind.is_jumpable());
        }
    }

    #[test]
    fn test_determinism() {
        let a = ObstacleField::generate(42, 320.0, 2400, 100, counts(100, 30));
        let b = ObstacleField::generate(42, 320.0, 2400, 100, counts(100, 30));
        assert_eq!(a, b);
        assert_eq!(a.len(), 130);
    }

    #[test]
    fn test_seed_changes_layout() {
        let a = ObstacleField::generate(1, 320.0, 2400, 100, counts(20, 5));
        let b = ObstacleField::generate(2, 320.0, 2400, 100, counts(20, 5));
        assert_ne!(a, b);
    }

    #[test]
    fn test_trees_then_rocks() {
        let field = ObstacleField::generate(7, 320.0, 2400, 100, counts(10, 4));
        let kinds: Vec<_> = field.obstacles().iter().map(|o| o.kind).collect();
        assert!(kinds[..10].iter().all(|k| k.is_tree()));
        assert!(kinds[10..].iter().all(|k| k.is_jumpable()));
    }

    #[test]
    fn test_zero_counts_is_empty() {
        let field = ObstacleField::generate(0, 320.0, 2400, 100, counts(0, 0));
        assert!(field.is_empty());
    }

    #[test]
    fn test_degenerate_ranges_do_not_panic() {
        // Track narrower than a tree, course shorter than the spawn margin
        let field = ObstacleField::generate(3, 10.0, 50, 100, counts(5, 5));
        assert_eq!(field.len(), 10);
        for obstacle in field.obstacles() {
            assert!(obstacle.pos.x <= 10.0);
            assert_eq!(obstacle.pos.y, 100.0);
        }
    }

    proptest! {
        #[test]
        fn prop_obstacles_stay_in_bounds(seed in any::<u64>(), trees in 0u32..40, rocks in 0u32..40) {
            let field = ObstacleField::generate(seed, 160.0, 1000, 100, counts(trees, rocks));
            prop_assert_eq!(field.len(), (trees + rocks) as usize);
            for obstacle in field.obstacles() {
                let width = obstacle.kind.footprint().w as f32;
                prop_assert!(obstacle.pos.x >= 0.0);
                prop_assert!(obstacle.pos.x + width <= 160.0);
                prop_assert!(obstacle.pos.y >= 100.0 && obstacle.pos.y <= 1000.0);
            }
        }
    }
}
