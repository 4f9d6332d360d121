//! Sprite sheets cut into named sprites, and the quad geometry each sprite is drawn with.

pub mod quad;
pub mod sprite;
