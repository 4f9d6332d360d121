//! The seam between the engine and the GPU.
//!
//! The engine never talks to a graphics API directly; it drives a [`GraphicsBackend`] through
//! [`GraphicsContext`](context::GraphicsContext). A browser host implements the trait over WebGL,
//! while [`RecordingBackend`](headless::RecordingBackend) records commands for headless runs and tests.

pub mod context;
pub mod headless;

use glam::{Mat4, Vec4};
use serde::Deserialize;

use crate::error::GraphicsError;
use crate::texture::quad::QuadGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// A shader uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Int(i32),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Everything a backend needs to upload a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor<'a> {
    pub source: &'a str,
    pub width: u32,
    pub height: u32,
    pub alpha: bool,
    pub premultiply_alpha: bool,
}

/// Minimal GPU surface the sprite pipeline draws through.
pub trait GraphicsBackend {
    fn load_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, GraphicsError>;

    /// Compiles and links a program. Failures carry the driver's info log.
    fn compile_shader(&mut self, name: &str, vertex: &str, fragment: &str) -> Result<ShaderId, GraphicsError>;

    fn clear(&mut self, color: Color);

    fn bind_shader(&mut self, shader: ShaderId);

    fn set_uniform(&mut self, name: &str, value: Uniform);

    fn bind_texture(&mut self, texture: TextureId);

    fn bind_geometry(&mut self, geometry: &QuadGeometry);

    fn draw_indexed(&mut self, index_count: usize);

    /// Releases every resource created through this backend.
    fn release(&mut self);
}
