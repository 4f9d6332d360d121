//! The lane grid: a fixed rows × columns table of cells laid over world space.
//!
//! Cell coordinates are `IVec2 { x: column, y: row }`. The grid is centered on its offset and
//! row indices grow with world Y.

use bevy_ecs::{entity::Entity, resource::Resource};
use glam::{IVec2, Vec2};

use crate::error::LevelError;
use crate::systems::components::EntityKind;

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellOccupant {
    pub entity: Entity,
    pub kind: EntityKind,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Grid {
    offset: Vec2,
    rows: usize,
    columns: usize,
    cell_size: Vec2,
    cells: Vec<Option<CellOccupant>>,
}

/// Rounds to the nearest integer with halves rounding toward positive infinity.
fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl Grid {
    pub fn new(offset: Vec2, rows: usize, columns: usize, cell_size: Vec2) -> Result<Self, LevelError> {
        if cell_size.x <= 0.0 || cell_size.y <= 0.0 {
            return Err(LevelError::InvalidGrid(format!("cell size must be positive, got {cell_size}")));
        }

        Ok(Self {
            offset,
            rows,
            columns,
            cell_size,
            cells: vec![None; rows * columns],
        })
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Total world-space extent of the grid.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.columns as f32 * self.cell_size.x, self.rows as f32 * self.cell_size.y)
    }

    fn index(&self, row: i32, column: i32) -> Option<usize> {
        self.is_coord_in_range(row, column)
            .then(|| row as usize * self.columns + column as usize)
    }

    pub fn is_coord_in_range(&self, row: i32, column: i32) -> bool {
        row >= 0 && column >= 0 && (row as usize) < self.rows && (column as usize) < self.columns
    }

    pub fn is_cell_in_range(&self, cell: IVec2) -> bool {
        self.is_coord_in_range(cell.y, cell.x)
    }

    pub fn set_cell(&mut self, row: i32, column: i32, occupant: CellOccupant) -> Result<(), LevelError> {
        let index = self.index(row, column).ok_or(LevelError::CellOutOfRange { row, column })?;
        self.cells[index] = Some(occupant);
        Ok(())
    }

    pub fn get_cell(&self, row: i32, column: i32) -> Option<&CellOccupant> {
        self.index(row, column).and_then(|index| self.cells[index].as_ref())
    }

    /// The entity stored in a cell, only if it is of the requested kind.
    pub fn get_cell_of(&self, row: i32, column: i32, kind: EntityKind) -> Option<Entity> {
        self.get_cell(row, column)
            .filter(|occupant| occupant.kind == kind)
            .map(|occupant| occupant.entity)
    }

    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.get_cell_of(cell.y, cell.x, EntityKind::Wall).is_some()
    }

    /// Maps a world position to the nearest cell, accounting for the entity's scale.
    pub fn convert_point(&self, world: Vec2, scale: Vec2) -> IVec2 {
        let Vec2 { x: cw, y: ch } = self.cell_size;
        let column = (world.x - self.offset.x) / cw + (cw * self.columns as f32 - scale.x.abs()) / (2.0 * cw);
        let row = (world.y - self.offset.y) / ch + (ch * self.rows as f32 - scale.y.abs()) / (2.0 * ch);
        IVec2::new(round_half_up(column), round_half_up(row))
    }

    pub fn is_point_in_range(&self, world: Vec2, scale: Vec2) -> bool {
        self.is_cell_in_range(self.convert_point(world, scale))
    }

    /// World position of an entity of the given scale placed in `cell`.
    pub fn cell_to_world(&self, cell: IVec2, scale: Vec2) -> Vec2 {
        let half_count = Vec2::new(self.columns as f32, self.rows as f32) / 2.0;
        self.offset + (cell.as_vec2() - half_count) * self.cell_size + scale.abs() / 2.0
    }

    /// The world position of the cell nearest to `world`.
    pub fn snap_to_grid(&self, world: Vec2, scale: Vec2) -> Vec2 {
        self.cell_to_world(self.convert_point(world, scale), scale)
    }

    pub fn occupants(&self) -> impl Iterator<Item = (IVec2, &CellOccupant)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(index, occupant)| {
            occupant.as_ref().map(|occupant| {
                let cell = IVec2::new((index % self.columns) as i32, (index / self.columns) as i32);
                (cell, occupant)
            })
        })
    }
}
