//! A small 2D sprite engine and the grid-based Pac-Man game built on top of it.

pub mod animation;
pub mod app;
pub mod audio;
pub mod clock;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod graphics;
pub mod input;
pub mod map;
pub mod platform;
pub mod systems;
pub mod texture;
