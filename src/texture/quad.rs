use crate::systems::collision::Bounds;
use glam::Vec2;

/// Vertex order shared by every quad: bottom-left, top-left, top-right, bottom-right.
const VERTICES: [f32; 12] = [-0.5, -0.5, 0.0, -0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 0.5, -0.5, 0.0];
const TRIANGLES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// A unit quad centered on the origin, with per-vertex colors and texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    colors: [f32; 16],
    uvs: [f32; 8],
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::with_uv_rect(0.0, 0.0, 1.0, 1.0)
    }
}

impl QuadGeometry {
    /// Quad sampling the texture region `[u0, u1] × [v0, v1]`.
    pub fn with_uv_rect(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self {
            colors: [1.0; 16],
            uvs: [u0, v0, u0, v1, u1, v1, u1, v0],
        }
    }

    pub fn vertices(&self) -> &[f32; 12] {
        &VERTICES
    }

    pub fn triangles(&self) -> &[u16; 6] {
        &TRIANGLES
    }

    pub fn colors(&self) -> &[f32; 16] {
        &self.colors
    }

    pub fn uvs(&self) -> &[f32; 8] {
        &self.uvs
    }

    pub fn index_count(&self) -> usize {
        TRIANGLES.len()
    }

    /// Model-space bounds of the quad.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Vec2::splat(-0.5), Vec2::splat(0.5))
    }
}
