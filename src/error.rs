//! Centralized error types for the engine and the game.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use std::io;

use bevy_ecs::event::Event;

/// Main error type for the engine.
///
/// This is the primary error type that should be used in public APIs.
/// Systems report runtime failures by writing it as an event; the scene
/// stops on the first one it sees.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("Graphics error: {0}")]
    Graphics(#[from] GraphicsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Structural problems found while loading a level.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    #[error("Level JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing pacman")]
    MissingPacman,

    #[error("More than one pacman is not allowed")]
    DuplicatePacman,

    #[error("Unrecognized entity type: {0}")]
    UnknownEntityType(String),

    #[error("Entity of type {entity} is missing `additional.{field}`")]
    MissingField { entity: &'static str, field: &'static str },

    #[error("Cell ({row}, {column}) is outside of the grid")]
    CellOutOfRange { row: i32, column: i32 },

    #[error("Invalid grid configuration: {0}")]
    InvalidGrid(String),
}

/// Errors raised by the animator state machine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Transition `{transition}` targets unknown animation `{animation}`")]
    UnknownAnimation { transition: String, animation: String },

    #[error("Animation not found: {0}")]
    AnimationNotFound(String),

    #[error("Transition not found: {0}")]
    TransitionNotFound(String),
}

/// Errors related to graphics resources.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    #[error("Shader `{name}` failed to compile: {log}")]
    ShaderCompile { name: String, log: String },

    #[error("Failed to load texture `{source_path}`: {reason}")]
    TextureLoad { source_path: String, reason: String },

    #[error("Sprite shader has not been loaded")]
    ShaderNotLoaded,

    #[error("Atlas not found: {0}")]
    UnknownAtlas(String),

    #[error("Sprite `{sprite}` not found in atlas `{atlas}`")]
    UnknownSprite { atlas: String, sprite: String },
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
