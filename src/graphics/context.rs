use glam::Mat4;
use tracing::{debug, trace};

use crate::constants::shader;
use crate::error::GraphicsError;
use crate::graphics::{Color, GraphicsBackend, ShaderId, TextureId, Uniform};
use crate::texture::quad::QuadGeometry;

/// Per-scene graphics state: camera matrices, clear color, the sprite shader, and what is bound.
///
/// Shader and texture binds are skipped when the requested object is already bound.
#[derive(Debug, Clone)]
pub struct GraphicsContext {
    projection: Mat4,
    view: Mat4,
    clear_color: Color,
    sprite_shader: Option<ShaderId>,
    bound_shader: Option<ShaderId>,
    bound_texture: Option<TextureId>,
}

impl GraphicsContext {
    /// Orthographic camera centered on the origin covering `width` × `height` world units.
    pub fn new(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self {
            projection: Mat4::orthographic_rh_gl(-hw, hw, -hh, hh, -1.0, 1.0),
            view: Mat4::IDENTITY,
            clear_color: Color::BLACK,
            sprite_shader: None,
            bound_shader: None,
            bound_texture: None,
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn sprite_shader(&self) -> Result<ShaderId, GraphicsError> {
        self.sprite_shader.ok_or(GraphicsError::ShaderNotLoaded)
    }

    pub fn load_sprite_shader(&mut self, backend: &mut dyn GraphicsBackend) -> Result<ShaderId, GraphicsError> {
        if let Some(id) = self.sprite_shader {
            return Ok(id);
        }
        let id = backend.compile_shader(shader::SPRITE, shader::SPRITE_VERTEX, shader::SPRITE_FRAGMENT)?;
        debug!(shader = shader::SPRITE, id = id.0, "Sprite shader compiled");
        self.sprite_shader = Some(id);
        Ok(id)
    }

    pub fn begin_frame(&mut self, backend: &mut dyn GraphicsBackend) {
        backend.clear(self.clear_color);
    }

    pub fn bind_shader(&mut self, backend: &mut dyn GraphicsBackend, shader: ShaderId) {
        if self.bound_shader != Some(shader) {
            backend.bind_shader(shader);
            self.bound_shader = Some(shader);
        }
    }

    pub fn bind_texture(&mut self, backend: &mut dyn GraphicsBackend, texture: TextureId) {
        if self.bound_texture != Some(texture) {
            backend.bind_texture(texture);
            self.bound_texture = Some(texture);
        }
    }

    /// Issues one textured, tinted quad.
    pub fn draw_sprite(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        texture: TextureId,
        geometry: &QuadGeometry,
        model: Mat4,
        color: Color,
    ) -> Result<(), GraphicsError> {
        let shader = self.sprite_shader()?;
        self.bind_shader(backend, shader);
        self.bind_texture(backend, texture);
        backend.bind_geometry(geometry);

        let mvp = self.projection * self.view * model;
        backend.set_uniform(shader::UNIFORM_TEXTURE, Uniform::Int(0));
        backend.set_uniform(shader::UNIFORM_TEXTURE_SET, Uniform::Int(1));
        backend.set_uniform(shader::UNIFORM_MVP, Uniform::Mat4(mvp));
        backend.set_uniform(shader::UNIFORM_COLOR, Uniform::Vec4(color.to_vec4()));
        backend.draw_indexed(geometry.index_count());
        trace!(texture = texture.0, "Sprite drawn");
        Ok(())
    }

    /// Forgets every bound object and asks the backend to release its resources.
    pub fn teardown(&mut self, backend: &mut dyn GraphicsBackend) {
        self.sprite_shader = None;
        self.bound_shader = None;
        self.bound_texture = None;
        backend.release();
        debug!("Graphics context torn down");
    }
}
