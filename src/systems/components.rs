use bevy_ecs::{bundle::Bundle, component::Component};
use bitflags::bitflags;
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::constants::{atlas, collider, layer};
use crate::systems::collision::Aabb;
use crate::systems::render::SpriteRenderer;
use crate::systems::transform::Transform;

/// A tag component denoting the type of entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Wall,
    Coin,
    Ghost,
    Pacman,
    Portal,
    Background,
}

impl EntityKind {
    /// Whether the kind may appear as a cell in a level file.
    pub fn is_placeable(&self) -> bool {
        !matches!(self, EntityKind::Background)
    }

    pub fn collision_layer(&self) -> CollisionLayer {
        match self {
            EntityKind::Pacman => CollisionLayer::PACMAN,
            EntityKind::Ghost => CollisionLayer::GHOST,
            EntityKind::Coin => CollisionLayer::COIN,
            EntityKind::Wall => CollisionLayer::WALL,
            EntityKind::Portal => CollisionLayer::PORTAL,
            EntityKind::Background => CollisionLayer::empty(),
        }
    }

    /// Collider size relative to the entity's scale.
    pub fn collider_ratio(&self) -> f32 {
        match self {
            EntityKind::Wall => collider::WALL,
            EntityKind::Coin => collider::COIN,
            EntityKind::Ghost => collider::GHOST,
            EntityKind::Pacman => collider::PACMAN,
            EntityKind::Portal => collider::PORTAL,
            EntityKind::Background => 0.0,
        }
    }

    pub fn render_layer(&self) -> u8 {
        match self {
            EntityKind::Background => layer::BACKGROUND,
            EntityKind::Wall => layer::WALL,
            EntityKind::Coin | EntityKind::Portal => layer::ITEM,
            EntityKind::Ghost => layer::GHOST,
            EntityKind::Pacman => layer::PACMAN,
        }
    }

    /// The atlas a level cell's `texture` name is looked up in.
    pub fn atlas(&self) -> &'static str {
        match self {
            EntityKind::Wall => atlas::WALLS,
            EntityKind::Coin => atlas::COINS,
            EntityKind::Ghost => atlas::GHOSTS,
            EntityKind::Pacman => atlas::PACMANS,
            EntityKind::Portal => atlas::PORTALS,
            EntityKind::Background => atlas::BACKGROUND,
        }
    }
}

bitflags! {
    #[derive(Component, Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CollisionLayer: u8 {
        const PACMAN = 1 << 0;
        const GHOST = 1 << 1;
        const COIN = 1 << 2;
        const WALL = 1 << 3;
        const PORTAL = 1 << 4;
    }
}

/// Marker for maze walls. Walls only block movement through the grid; they have no behavior.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Wall;

/// Marker for the full-grid backdrop entity.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Background;

/// Components shared by every entity placed on the grid.
#[derive(Bundle)]
pub struct PlacedBundle {
    pub kind: EntityKind,
    pub transform: Transform,
    pub layer: CollisionLayer,
    pub aabb: Aabb,
    pub renderer: SpriteRenderer,
}

impl PlacedBundle {
    pub fn new(kind: EntityKind, transform: Transform, renderer: SpriteRenderer) -> Self {
        let aabb = Aabb::new(transform.scale().abs() * kind.collider_ratio());
        Self {
            kind,
            layer: kind.collision_layer(),
            transform,
            aabb,
            renderer,
        }
    }
}
