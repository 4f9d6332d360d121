//! Axis-aligned bounding boxes and the overlap sweep that turns them into collision events.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, Res};
use bevy_ecs::component::Component;
use glam::Vec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::events::GameEvent;
use crate::systems::components::CollisionLayer;
use crate::systems::transform::Transform;

/// A world-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let extents = size.abs() / 2.0;
        Self::new(center - extents, center + extents)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x && self.min.y < other.max.y && self.max.y > other.min.y
    }

    /// Inclusive containment; points on the edge are inside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Axis-aligned box collider, sized in world units and centered on its entity (plus an optional offset).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    offset: Vec2,
    size: Vec2,
    pub enabled: bool,
}

impl Aabb {
    pub fn new(size: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            size: size.abs(),
            enabled: true,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn extents(&self) -> Vec2 {
        self.size / 2.0
    }

    pub fn bounds(&self, position: Vec2) -> Bounds {
        Bounds::from_center(position + self.offset, self.size)
    }

    pub fn intersects(&self, position: Vec2, other: &Aabb, other_position: Vec2) -> bool {
        self.bounds(position).intersects(&other.bounds(other_position))
    }

    pub fn contains(&self, position: Vec2, point: Vec2) -> bool {
        self.bounds(position).contains(point)
    }

    pub fn closest_point(&self, position: Vec2, point: Vec2) -> Vec2 {
        self.bounds(position).closest_point(point)
    }

    /// Grows the box just enough to contain `point`, keeping its center.
    pub fn encapsulate(&mut self, position: Vec2, point: Vec2) {
        let reach = (point - (position + self.offset)).abs();
        self.size = self.size.max(reach * 2.0);
    }
}

/// Which layers are tested against each other.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum CollisionMatrix {
    /// Every enabled collider against every other.
    #[default]
    AllPairs,
    /// Only `(a, b)` pairs where `a` is on the first layer set of a rule and `b` on the second.
    /// Rules must not overlap, or a pair is reported once per matching rule.
    Rules(Vec<(CollisionLayer, CollisionLayer)>),
}

impl CollisionMatrix {
    /// Pac-Man against everything, and ghosts against portals.
    pub fn pacman() -> Self {
        CollisionMatrix::Rules(vec![
            (
                CollisionLayer::PACMAN,
                CollisionLayer::GHOST | CollisionLayer::COIN | CollisionLayer::WALL | CollisionLayer::PORTAL,
            ),
            (CollisionLayer::GHOST, CollisionLayer::PORTAL),
        ])
    }

    pub fn allows(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        match self {
            CollisionMatrix::AllPairs => true,
            CollisionMatrix::Rules(rules) => rules
                .iter()
                .any(|&(x, y)| (a.intersects(x) && b.intersects(y)) || (b.intersects(x) && a.intersects(y))),
        }
    }
}

struct Candidate {
    entity: Entity,
    layer: CollisionLayer,
    position: Vec2,
    aabb: Aabb,
}

impl Candidate {
    fn overlaps(&self, other: &Candidate) -> bool {
        self.aabb.intersects(self.position, &other.aabb, other.position)
    }
}

/// Reports every overlapping pair of enabled colliders the matrix allows as a `GameEvent::Collision`.
///
/// Each overlapping pair is reported once per frame.
pub fn collision_system(
    matrix: Res<CollisionMatrix>,
    colliders: Query<(Entity, &Transform, &Aabb, Option<&CollisionLayer>)>,
    mut events: EventWriter<GameEvent>,
) {
    let candidates: SmallVec<[Candidate; 64]> = colliders
        .iter()
        .filter(|(_, _, aabb, _)| aabb.enabled)
        .map(|(entity, transform, aabb, layer)| Candidate {
            entity,
            layer: layer.copied().unwrap_or_default(),
            position: transform.position(),
            aabb: *aabb,
        })
        .collect();

    let mut report = |a: &Candidate, b: &Candidate| {
        trace!(a = ?a.entity, b = ?b.entity, "Collision");
        events.write(GameEvent::Collision(a.entity, b.entity));
    };

    match &*matrix {
        CollisionMatrix::AllPairs => {
            for (i, a) in candidates.iter().enumerate() {
                for b in &candidates[i + 1..] {
                    if a.overlaps(b) {
                        report(a, b);
                    }
                }
            }
        }
        CollisionMatrix::Rules(rules) => {
            for &(first, second) in rules {
                for a in candidates.iter().filter(|c| c.layer.intersects(first)) {
                    for b in candidates
                        .iter()
                        .filter(|c| c.entity != a.entity && c.layer.intersects(second))
                    {
                        if a.overlaps(b) {
                            report(a, b);
                        }
                    }
                }
            }
        }
    }
}
