//! The Entity-Component-System (ECS) module.
//!
//! Engine-level components and systems (transforms, colliders, animators, rendering, audio) live
//! next to the Pac-Man game systems built on them.

pub mod animation;
pub mod audio;
pub mod collision;
pub mod components;
pub mod ghost;
pub mod item;
pub mod player;
pub mod portal;
pub mod render;
pub mod state;
pub mod transform;
