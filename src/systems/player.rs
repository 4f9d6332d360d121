use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use tracing::{debug, info};

use crate::{
    animation::{presets, Animator},
    audio::Sound,
    clock::Clock,
    constants::speed,
    events::{GameCommand, GameEvent},
    map::{direction::Direction, grid::Grid},
    systems::{
        audio::{AudioEvent, AudioListener},
        components::EntityKind,
        state::WorldContext,
        transform::Transform,
    },
};

/// The player's lane-bound movement state.
///
/// `buffered` is the direction last requested by input; `heading` is the direction actually
/// travelled. A buffered turn is taken once a full cell has been covered and the next cell that
/// way is open.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Pacman {
    buffered: Direction,
    heading: Direction,
    move_delta: Vec2,
    coins: u32,
    speed: f32,
    pub enabled: bool,
}

impl Default for Pacman {
    fn default() -> Self {
        Self::new(speed::PACMAN)
    }
}

impl Pacman {
    pub fn new(speed: f32) -> Self {
        Self {
            buffered: Direction::Right,
            heading: Direction::Right,
            move_delta: Vec2::ZERO,
            coins: 0,
            speed,
            enabled: true,
        }
    }

    pub fn buffered_direction(&self) -> Direction {
        self.buffered
    }

    pub fn set_buffered_direction(&mut self, direction: Direction) {
        self.buffered = direction;
    }

    pub fn last_direction(&self) -> Direction {
        self.heading
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// One movement step: settle the heading, accumulate distance, then move along the heading.
    pub fn step(&mut self, transform: &mut Transform, grid: &Grid, dt: f32) {
        self.update_direction(transform, grid, dt);
        self.move_delta += self.buffered.as_vec2() * dt * self.speed;
        self.update_movement(transform, grid, dt);
    }

    fn update_direction(&mut self, transform: &mut Transform, grid: &Grid, dt: f32) {
        let cell = grid.cell_size();
        if self.move_delta.x.abs() < cell.x && self.move_delta.y.abs() < cell.y {
            return;
        }

        if is_direction_open(grid, transform, self.buffered.as_ivec2()) {
            self.heading = self.buffered;
        }
        if !is_direction_open(grid, transform, self.heading.as_ivec2()) {
            let turned = self.heading.turned();
            self.heading = if is_direction_open(grid, transform, turned.as_ivec2()) {
                turned
            } else {
                turned.opposite()
            };
            self.buffered = self.heading;
        }

        let snapped = grid.snap_to_grid(transform.position(), transform.scale());
        transform.move_towards(snapped, dt * self.speed * speed::SNAP_FACTOR);
        self.move_delta = Vec2::ZERO;
    }

    fn update_movement(&mut self, transform: &mut Transform, grid: &Grid, dt: f32) {
        let step = self.heading.as_vec2() * dt * self.speed;
        transform.translate(step);
        if !is_direction_open(grid, transform, IVec2::ZERO) {
            transform.translate(-step);
        }
        transform.set_rotation(self.heading.rotation_degrees());
    }
}

/// Whether the cell `offset` away from the entity's current cell is open.
///
/// An entity outside the grid has no open directions, and cells beyond the edge count as blocked.
pub fn is_direction_open(grid: &Grid, transform: &Transform, offset: IVec2) -> bool {
    let cell = grid.convert_point(transform.position(), transform.scale());
    if !grid.is_cell_in_range(cell) {
        return false;
    }
    let target = cell + offset;
    grid.is_cell_in_range(target) && !grid.is_wall(target)
}

pub fn pacman_start_system(
    mut pacmen: Query<(Entity, &mut Animator), With<Pacman>>,
    mut context: ResMut<WorldContext>,
) {
    for (entity, mut animator) in pacmen.iter_mut() {
        animator.set_trigger(presets::WALK);
        context.set_pacman(entity);
    }
}

/// Buffers movement commands for Pac-Man.
pub fn pacman_control_system(mut events: EventReader<GameEvent>, mut pacmen: Query<&mut Pacman>) {
    for event in events.read() {
        if let GameEvent::Command(GameCommand::MovePlayer(direction)) = event {
            for mut pacman in pacmen.iter_mut() {
                if pacman.enabled {
                    pacman.set_buffered_direction(*direction);
                }
            }
        }
    }
}

pub fn pacman_movement_system(clock: Res<Clock>, grid: Res<Grid>, mut pacmen: Query<(&mut Pacman, &mut Transform)>) {
    let dt = clock.delta();
    for (mut pacman, mut transform) in pacmen.iter_mut() {
        if pacman.enabled {
            pacman.step(&mut transform, &grid, dt);
        }
    }
}

/// Counts collected coins and kills Pac-Man on contact with a ghost.
pub fn pacman_collision_system(
    mut events: EventReader<GameEvent>,
    mut pacmen: Query<(&mut Pacman, &mut Transform, &mut Animator, Option<&AudioListener>)>,
    kinds: Query<&EntityKind>,
    mut audio: EventWriter<AudioEvent>,
) {
    for event in events.read() {
        let GameEvent::Collision(a, b) = *event else { continue };
        let (pacman_entity, other) = if pacmen.contains(a) {
            (a, b)
        } else if pacmen.contains(b) {
            (b, a)
        } else {
            continue;
        };
        let Ok(&kind) = kinds.get(other) else { continue };
        let Ok((mut pacman, mut transform, mut animator, listener)) = pacmen.get_mut(pacman_entity) else {
            continue;
        };

        match kind {
            EntityKind::Coin => {
                pacman.coins += 1;
                debug!(coins = pacman.coins, "Coin collected");
            }
            EntityKind::Ghost if pacman.enabled => {
                animator.set_trigger(presets::DEATH);
                transform.set_rotation(0.0);
                pacman.enabled = false;
                if let Some(listener) = listener {
                    audio.write(listener.play(Sound::Death));
                }
                info!(ghost = ?other, "Pac-Man caught");
            }
            _ => {}
        }
    }
}
