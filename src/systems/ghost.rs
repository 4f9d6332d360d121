use bevy_ecs::{
    component::Component,
    entity::Entity,
    query::Without,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use strum_macros::{Display, EnumString, IntoStaticStr};
use tracing::{trace, warn};

use crate::{
    animation::Animator,
    clock::Clock,
    constants::{ghost, speed},
    map::{
        direction::{Direction, NEIGHBOR_ORDER},
        grid::Grid,
    },
    systems::{player::Pacman, state::WorldContext, transform::Transform},
};

/// Chase personality of a ghost, selected by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GhostKind {
    /// Chases Pac-Man's cell.
    Blinky,
    /// Aims four cells ahead of Pac-Man.
    Pinky,
    /// Reflects Blinky through a point two cells ahead of Pac-Man.
    Inky,
    /// Chases only while far away; scatters when close.
    Clyde,
}

/// Everything a ghost's targeting rule may look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetContext {
    pub ghost_cell: IVec2,
    pub pacman_cell: IVec2,
    pub pacman_direction: Direction,
    pub blinky_cell: Option<IVec2>,
    pub range: f32,
    pub scatter: IVec2,
}

pub fn grid_distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

impl TargetContext {
    pub fn pacman_in_range(&self) -> bool {
        grid_distance(self.ghost_cell, self.pacman_cell) <= self.range
    }

    /// The cell `spaces` cells ahead of Pac-Man along its heading.
    pub fn ahead_of_pacman(&self, spaces: i32) -> IVec2 {
        self.pacman_cell + self.pacman_direction.as_ivec2() * spaces
    }
}

impl GhostKind {
    /// Resolves a ghost name; unknown names chase like Blinky.
    pub fn from_name(name: &str) -> GhostKind {
        name.parse().unwrap_or_else(|_| {
            warn!(name, "Unknown ghost name, defaulting to blinky");
            GhostKind::Blinky
        })
    }

    pub fn target(&self, context: &TargetContext) -> IVec2 {
        let in_range = context.pacman_in_range();
        match self {
            GhostKind::Blinky if in_range => context.pacman_cell,
            GhostKind::Pinky if in_range => context.ahead_of_pacman(ghost::PINKY_LOOKAHEAD),
            GhostKind::Inky if in_range => {
                let pivot = context.ahead_of_pacman(ghost::INKY_PIVOT_LOOKAHEAD);
                match context.blinky_cell {
                    Some(blinky) => pivot + (pivot - blinky),
                    None => pivot,
                }
            }
            GhostKind::Clyde if !in_range => context.pacman_cell,
            _ => context.scatter,
        }
    }
}

/// Where Pac-Man is, as seen by the ghosts this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacmanSnapshot {
    pub cell: IVec2,
    pub direction: Direction,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Ghost {
    name: String,
    kind: GhostKind,
    speed: f32,
    range: f32,
    scatter_target: IVec2,
    direction: Option<Direction>,
    move_delta: Vec2,
    pub enabled: bool,
}

/// Builds a fully configured [`Ghost`].
#[derive(Debug, Clone)]
pub struct GhostBuilder {
    name: String,
    kind: Option<GhostKind>,
    speed: f32,
    range: f32,
    scatter_target: IVec2,
}

impl GhostBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            speed: speed::GHOST,
            range: ghost::DEFAULT_RANGE,
            scatter_target: IVec2::ZERO,
        }
    }

    /// Overrides the personality otherwise derived from the name.
    pub fn kind(mut self, kind: GhostKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn scatter_target(mut self, cell: IVec2) -> Self {
        self.scatter_target = cell;
        self
    }

    pub fn build(self) -> Ghost {
        let kind = self.kind.unwrap_or_else(|| GhostKind::from_name(&self.name));
        Ghost {
            name: self.name,
            kind,
            speed: self.speed,
            range: self.range,
            scatter_target: self.scatter_target,
            direction: None,
            move_delta: Vec2::ZERO,
            enabled: true,
        }
    }
}

impl Ghost {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn scatter_target(&self) -> IVec2 {
        self.scatter_target
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Open neighbours of `cell`, in neighbour order, excluding the way back unless it is the only way.
    pub fn possible_moves(&self, grid: &Grid, cell: IVec2) -> SmallVec<[Direction; 4]> {
        let open: SmallVec<[Direction; 4]> = NEIGHBOR_ORDER
            .into_iter()
            .filter(|d| {
                let next = cell + d.as_ivec2();
                grid.is_cell_in_range(next) && !grid.is_wall(next)
            })
            .collect();

        let reverse = self.direction.map(|d| d.opposite());
        let forward: SmallVec<[Direction; 4]> = open.iter().copied().filter(|d| Some(*d) != reverse).collect();
        if forward.is_empty() {
            open
        } else {
            forward
        }
    }

    /// Picks the heading for the next cell. Ties go to the earliest move in neighbour order.
    ///
    /// Returns the new heading, or `None` (and stops) when the ghost is walled in.
    pub fn choose_direction(&mut self, grid: &Grid, cell: IVec2, target: impl FnOnce() -> IVec2) -> Option<Direction> {
        let moves = self.possible_moves(grid, cell);
        self.direction = match moves.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => {
                let target = target();
                let mut best: Option<(Direction, f32)> = None;
                for &candidate in &moves {
                    let distance = grid_distance(cell + candidate.as_ivec2(), target);
                    if best.is_none_or(|(_, d)| distance < d) {
                        best = Some((candidate, distance));
                    }
                }
                best.map(|(direction, _)| direction)
            }
        };
        self.direction
    }

    /// Re-evaluates the heading from the ghost's current position.
    pub fn retarget(
        &mut self,
        transform: &Transform,
        grid: &Grid,
        pacman: &PacmanSnapshot,
        blinky_cell: Option<IVec2>,
    ) -> Option<Direction> {
        let cell = grid.convert_point(transform.position(), transform.scale());
        let context = TargetContext {
            ghost_cell: cell,
            pacman_cell: pacman.cell,
            pacman_direction: pacman.direction,
            blinky_cell,
            range: self.range,
            scatter: self.scatter_target,
        };
        let kind = self.kind;
        let direction = self.choose_direction(grid, cell, || kind.target(&context));
        trace!(ghost = %self.name, ?cell, ?direction, "Ghost retargeted");
        direction
    }

    /// One movement step. Returns the new heading when the ghost re-decided this step.
    pub fn step(
        &mut self,
        transform: &mut Transform,
        grid: &Grid,
        dt: f32,
        pacman: &PacmanSnapshot,
        blinky_cell: Option<IVec2>,
    ) -> Option<Option<Direction>> {
        let cell_size = grid.cell_size();
        let mut decided = None;
        if self.move_delta.x.abs() >= cell_size.x || self.move_delta.y.abs() >= cell_size.y {
            decided = Some(self.retarget(transform, grid, pacman, blinky_cell));
            let snapped = grid.snap_to_grid(transform.position(), transform.scale());
            transform.move_towards(snapped, dt * self.speed * speed::SNAP_FACTOR);
            self.move_delta = Vec2::ZERO;
        }

        let velocity = self.direction.map_or(Vec2::ZERO, |d| d.as_vec2()) * dt * self.speed;
        self.move_delta += velocity;
        transform.translate(velocity);
        decided
    }
}

fn pacman_snapshot(grid: &Grid, pacman: &Pacman, transform: &Transform) -> PacmanSnapshot {
    PacmanSnapshot {
        cell: grid.convert_point(transform.position(), transform.scale()),
        direction: pacman.last_direction(),
    }
}

fn set_walk_trigger(animator: &mut Animator, direction: Option<Direction>) {
    if let Some(direction) = direction {
        animator.set_trigger(direction.walk_trigger());
    }
}

/// Registers every ghost by name and picks each one's first heading.
pub fn ghost_start_system(
    grid: Res<Grid>,
    mut context: ResMut<WorldContext>,
    pacman: Query<(&Pacman, &Transform), Without<Ghost>>,
    mut ghosts: Query<(Entity, &mut Ghost, &Transform, &mut Animator)>,
) {
    for (entity, ghost, _, _) in ghosts.iter() {
        context.register_ghost(ghost.name(), entity);
    }

    let Ok((pacman, pacman_transform)) = pacman.single() else {
        return;
    };
    let snapshot = pacman_snapshot(&grid, pacman, pacman_transform);
    let blinky_cell = context
        .ghost(ghost::BLINKY_NAME)
        .and_then(|entity| ghosts.get(entity).ok())
        .map(|(_, _, transform, _)| grid.convert_point(transform.position(), transform.scale()));

    for (_, mut ghost, transform, mut animator) in ghosts.iter_mut() {
        let direction = ghost.retarget(transform, &grid, &snapshot, blinky_cell);
        set_walk_trigger(&mut animator, Some(direction.unwrap_or(Direction::Right)));
    }
}

pub fn ghost_movement_system(
    clock: Res<Clock>,
    grid: Res<Grid>,
    context: Res<WorldContext>,
    pacman: Query<(&Pacman, &Transform), Without<Ghost>>,
    mut ghosts: Query<(&mut Ghost, &mut Transform, &mut Animator)>,
) {
    let Ok((pacman, pacman_transform)) = pacman.single() else {
        return;
    };
    let snapshot = pacman_snapshot(&grid, pacman, pacman_transform);
    let blinky_cell = context
        .ghost(ghost::BLINKY_NAME)
        .and_then(|entity| ghosts.get(entity).ok())
        .map(|(_, transform, _)| grid.convert_point(transform.position(), transform.scale()));

    let dt = clock.delta();
    for (mut ghost, mut transform, mut animator) in ghosts.iter_mut() {
        if !ghost.enabled {
            continue;
        }
        if let Some(direction) = ghost.step(&mut transform, &grid, dt, &snapshot, blinky_cell) {
            set_walk_trigger(&mut animator, direction);
        }
    }
}
