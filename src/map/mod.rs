//! The lane grid, level files, and the code that turns a level into a populated scene.

pub mod builder;
pub mod direction;
pub mod grid;
pub mod level;
