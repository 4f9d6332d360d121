#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::{IVec2, Vec2};
use pacman_engine::{
    audio::RecordingAudio,
    clock::Clock,
    constants::LOOP_TIME,
    events::{GameEvent, GameSignal},
    game::{Scene, SceneState},
    graphics::headless::RecordingBackend,
    map::{
        builder::load_pacman_scene,
        grid::{CellOccupant, Grid},
        level::LevelData,
    },
    systems::{
        audio::{AudioEvent, AudioState},
        collision::CollisionMatrix,
        components::EntityKind,
        state::WorldContext,
    },
};
use serde_json::{json, Value};

pub const CELL: f32 = 16.0;

/// A grid centered on the origin with 16x16 cells and walls at the given `(column, row)` cells.
pub fn grid_with_walls(rows: usize, columns: usize, walls: &[(i32, i32)]) -> Grid {
    let mut grid = Grid::new(Vec2::ZERO, rows, columns, Vec2::splat(CELL)).unwrap();
    for (i, &(column, row)) in walls.iter().enumerate() {
        grid.set_cell(
            row,
            column,
            CellOccupant {
                entity: Entity::from_raw(1000 + i as u32),
                kind: EntityKind::Wall,
            },
        )
        .unwrap();
    }
    grid
}

/// A three-row corridor: rows 0 and 2 are walls, row 1 is open.
pub fn corridor_grid(columns: usize) -> Grid {
    let walls: Vec<(i32, i32)> = (0..columns as i32).flat_map(|x| [(x, 0), (x, 2)]).collect();
    grid_with_walls(3, columns, &walls)
}

pub fn cell_position(grid: &Grid, column: i32, row: i32) -> Vec2 {
    grid.cell_to_world(IVec2::new(column, row), Vec2::splat(CELL))
}

/// Creates a basic test world with the resources game systems expect.
pub fn create_test_world(grid: Grid) -> World {
    let mut world = World::new();
    world.insert_resource(grid);
    world.insert_resource(Clock::default());
    world.insert_resource(WorldContext::default());
    world.insert_resource(AudioState::default());
    world.insert_resource(CollisionMatrix::pacman());
    world.init_resource::<Events<GameEvent>>();
    world.init_resource::<Events<GameSignal>>();
    world.init_resource::<Events<AudioEvent>>();
    world
}

pub fn send_collision_event(world: &mut World, a: Entity, b: Entity) {
    world.resource_mut::<Events<GameEvent>>().send(GameEvent::Collision(a, b));
}

pub fn drain<E: bevy_ecs::event::Event>(world: &mut World) -> Vec<E> {
    world.resource_mut::<Events<E>>().drain().collect()
}

fn texture_for(kind: &str) -> &'static str {
    match kind {
        "wall" => "walls_0",
        "coin" => "coins_0",
        "pacman" => "pacmans_11",
        "ghost" => "ghosts_0",
        "portal" => "portals_0",
        _ => "missing",
    }
}

/// A level cell of the given type at `(column, row)`.
pub fn cell(kind: &str, column: i32, row: i32) -> Value {
    json!({
        "position": { "x": column, "y": row },
        "scale": { "x": CELL, "y": CELL },
        "texture": texture_for(kind),
        "type": kind,
    })
}

pub fn cell_with(kind: &str, column: i32, row: i32, additional: Value) -> Value {
    let mut value = cell(kind, column, row);
    value["additional"] = additional;
    value
}

pub fn ghost_cell(name: &str, column: i32, row: i32) -> Value {
    cell_with(
        "ghost",
        column,
        row,
        json!({ "name": name, "scatterTarget": { "x": 0, "y": 0 } }),
    )
}

pub fn portal_cell(column: i32, row: i32, link_id: i64) -> Value {
    cell_with("portal", column, row, json!({ "linkId": link_id }))
}

/// Walls along rows 0 and 2 of a three-row level.
pub fn corridor_walls(columns: i32) -> Vec<Value> {
    (0..columns).flat_map(|x| [cell("wall", x, 0), cell("wall", x, 2)]).collect()
}

pub fn level_json(rows: usize, columns: usize, cells: Vec<Value>) -> Value {
    json!({
        "size": { "width": columns as f32 * CELL, "height": rows as f32 * CELL },
        "grid": {
            "offset": { "x": 0, "y": 0 },
            "rows": rows,
            "columns": columns,
            "cells": { "size": { "width": CELL, "height": CELL }, "data": cells },
            "background": { "color": { "r": 0, "g": 0, "b": 0 } },
        },
    })
}

pub fn level(rows: usize, columns: usize, cells: Vec<Value>) -> LevelData {
    LevelData::from_json(&level_json(rows, columns, cells).to_string()).unwrap()
}

/// A loaded and started scene with every signal and sound recorded.
pub struct TestScene {
    pub scene: Scene,
    pub backend: RecordingBackend,
    pub audio: RecordingAudio,
    pub signals: Rc<RefCell<Vec<GameSignal>>>,
    pub frame: u32,
}

impl TestScene {
    pub fn load(level: &LevelData) -> Self {
        let mut backend = RecordingBackend::discarding();
        let mut scene = load_pacman_scene(level, &mut backend).unwrap();
        let audio = RecordingAudio::new();
        scene.set_audio_sink(audio.clone());

        let signals = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&signals);
        scene.on_signal(move |signal| recorded.borrow_mut().push(signal));

        scene.run(Duration::ZERO).unwrap();
        Self {
            scene,
            backend,
            audio,
            signals,
            frame: 0,
        }
    }

    /// Runs one frame, one loop period after the previous one.
    pub fn step(&mut self) -> SceneState {
        self.frame += 1;
        self.scene.frame(LOOP_TIME * self.frame, &mut self.backend).unwrap()
    }

    /// Runs up to `frames` frames, stopping early once the scene ends.
    pub fn run(&mut self, frames: u32) -> SceneState {
        for _ in 0..frames {
            if !self.step().is_live() {
                break;
            }
        }
        self.scene.state()
    }

    pub fn signal_count(&self, signal: GameSignal) -> usize {
        self.signals.borrow().iter().filter(|s| **s == signal).count()
    }
}
