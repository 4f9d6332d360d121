//! Level files: the JSON document describing a Pac-Man grid and every entity placed on it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{GameResult, LevelError};
use crate::graphics::Color;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A cell coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct CellPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    /// Viewport size used for the orthographic projection.
    pub size: Size,
    pub grid: GridData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridData {
    pub offset: Point,
    pub rows: usize,
    pub columns: usize,
    pub cells: CellsData,
    pub background: BackgroundData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CellsData {
    pub size: Size,
    pub data: Vec<CellData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundData {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CellData {
    pub position: CellPosition,
    pub scale: Point,
    #[serde(default)]
    pub rotation: f32,
    /// Sprite name within the atlas that matches the entity type.
    pub texture: String,
    #[serde(default)]
    pub color: Color,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub additional: Additional,
}

/// Per-type extras. Ghosts use `name`, `scatterTarget` and `range`; portals use `linkId`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Additional {
    pub name: Option<String>,
    pub scatter_target: Option<CellPosition>,
    pub range: Option<f32>,
    pub link_id: Option<i64>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GameResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}
