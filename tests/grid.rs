use bevy_ecs::entity::Entity;
use glam::{IVec2, Vec2};
use pacman_engine::error::LevelError;
use pacman_engine::map::grid::{CellOccupant, Grid};
use pacman_engine::systems::components::EntityKind;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

const SCALE: Vec2 = Vec2::splat(common::CELL);

#[test]
fn test_grid_rejects_non_positive_cell_size() {
    let result = Grid::new(Vec2::ZERO, 3, 3, Vec2::new(0.0, 16.0));
    assert!(matches!(result, Err(LevelError::InvalidGrid(_))));
}

#[test]
fn test_grid_extent() {
    let grid = common::grid_with_walls(3, 4, &[]);
    assert_eq!(grid.extent(), Vec2::new(64.0, 48.0));
}

#[test]
fn test_cell_to_world_is_centered_on_offset() {
    let grid = common::grid_with_walls(3, 4, &[]);

    assert_eq!(grid.cell_to_world(IVec2::new(0, 0), SCALE), Vec2::new(-24.0, -16.0));
    assert_eq!(grid.cell_to_world(IVec2::new(3, 2), SCALE), Vec2::new(24.0, 16.0));
}

#[test]
fn test_cell_to_world_respects_offset() {
    let grid = Grid::new(Vec2::new(100.0, -50.0), 3, 4, SCALE).unwrap();
    assert_eq!(grid.cell_to_world(IVec2::new(0, 0), SCALE), Vec2::new(76.0, -66.0));
}

#[test]
fn test_convert_point_inverts_cell_to_world() {
    let grid = common::grid_with_walls(3, 4, &[]);
    for row in 0..3 {
        for column in 0..4 {
            let cell = IVec2::new(column, row);
            assert_eq!(grid.convert_point(grid.cell_to_world(cell, SCALE), SCALE), cell);
        }
    }
}

#[test]
fn test_convert_point_rounds_halves_up() {
    let grid = common::grid_with_walls(3, 4, &[]);

    // Exactly between columns 0 and 1.
    assert_eq!(grid.convert_point(Vec2::new(-16.0, -16.0), SCALE), IVec2::new(1, 0));
    // Slightly short of the halfway point stays in column 0.
    assert_eq!(grid.convert_point(Vec2::new(-17.0, -16.0), SCALE), IVec2::new(0, 0));
}

#[test]
fn test_snap_to_grid() {
    let grid = common::grid_with_walls(3, 4, &[]);
    assert_eq!(grid.snap_to_grid(Vec2::new(-21.0, -13.5), SCALE), Vec2::new(-24.0, -16.0));
}

#[test]
fn test_range_checks() {
    let grid = common::grid_with_walls(3, 4, &[]);

    assert_that(&grid.is_coord_in_range(2, 3)).is_true();
    assert_that(&grid.is_coord_in_range(3, 0)).is_false();
    assert_that(&grid.is_coord_in_range(0, -1)).is_false();
    assert_that(&grid.is_cell_in_range(IVec2::new(3, 2))).is_true();
    assert_that(&grid.is_point_in_range(Vec2::new(100.0, 0.0), SCALE)).is_false();
}

#[test]
fn test_set_cell_out_of_range() {
    let mut grid = common::grid_with_walls(3, 4, &[]);
    let occupant = CellOccupant {
        entity: Entity::from_raw(1),
        kind: EntityKind::Coin,
    };

    let result = grid.set_cell(3, 0, occupant);
    assert!(matches!(result, Err(LevelError::CellOutOfRange { row: 3, column: 0 })));
}

#[test]
fn test_get_cell_of_filters_by_kind() {
    let mut grid = common::grid_with_walls(3, 4, &[(0, 0)]);
    let coin = Entity::from_raw(7);
    grid.set_cell(1, 2, CellOccupant { entity: coin, kind: EntityKind::Coin }).unwrap();

    assert_eq!(grid.get_cell_of(1, 2, EntityKind::Coin), Some(coin));
    assert_eq!(grid.get_cell_of(1, 2, EntityKind::Wall), None);
    assert_eq!(grid.get_cell(2, 2), None);
    assert_that(&grid.is_wall(IVec2::new(0, 0))).is_true();
    assert_that(&grid.is_wall(IVec2::new(2, 1))).is_false();
    assert_eq!(grid.occupants().count(), 2);
}
