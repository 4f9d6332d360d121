use std::collections::HashSet;

use tracing::trace;

use crate::error::GraphicsError;
use crate::graphics::{Color, GraphicsBackend, ShaderId, TextureDescriptor, TextureId, Uniform};
use crate::texture::quad::QuadGeometry;

/// A single call made against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    BindShader(ShaderId),
    SetUniform(String, Uniform),
    BindTexture(TextureId),
    BindGeometry,
    DrawIndexed(usize),
    Release,
}

/// Backend with no GPU behind it. Records every command so runs can be inspected afterwards.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
    textures: Vec<String>,
    shaders: Vec<String>,
    failing_shaders: HashSet<String>,
    missing_textures: HashSet<String>,
    draws: usize,
    record: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            record: true,
            ..Default::default()
        }
    }

    /// Backend that keeps counters but drops the command log, for long headless runs.
    pub fn discarding() -> Self {
        Self::default()
    }

    /// Makes compiling the named shader fail.
    pub fn fail_shader(mut self, name: impl Into<String>) -> Self {
        self.failing_shaders.insert(name.into());
        self
    }

    /// Makes loading the texture at `source` fail.
    pub fn missing_texture(mut self, source: impl Into<String>) -> Self {
        self.missing_textures.insert(source.into());
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Total draw calls issued, recorded or not.
    pub fn draw_calls(&self) -> usize {
        self.draws
    }

    pub fn textures_loaded(&self) -> usize {
        self.textures.len()
    }

    pub fn shaders_compiled(&self) -> usize {
        self.shaders.len()
    }

    fn push(&mut self, command: DrawCommand) {
        trace!(?command, "Backend command");
        if self.record {
            self.commands.push(command);
        }
    }
}

impl GraphicsBackend for RecordingBackend {
    fn load_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, GraphicsError> {
        if self.missing_textures.contains(descriptor.source) {
            return Err(GraphicsError::TextureLoad {
                source_path: descriptor.source.to_string(),
                reason: "file not found".to_string(),
            });
        }
        self.textures.push(descriptor.source.to_string());
        Ok(TextureId(self.textures.len() as u32))
    }

    fn compile_shader(&mut self, name: &str, vertex: &str, fragment: &str) -> Result<ShaderId, GraphicsError> {
        if self.failing_shaders.contains(name) || vertex.is_empty() || fragment.is_empty() {
            return Err(GraphicsError::ShaderCompile {
                name: name.to_string(),
                log: "ERROR: 0:1: compilation rejected".to_string(),
            });
        }
        self.shaders.push(name.to_string());
        Ok(ShaderId(self.shaders.len() as u32))
    }

    fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    fn bind_shader(&mut self, shader: ShaderId) {
        self.push(DrawCommand::BindShader(shader));
    }

    fn set_uniform(&mut self, name: &str, value: Uniform) {
        self.push(DrawCommand::SetUniform(name.to_string(), value));
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.push(DrawCommand::BindTexture(texture));
    }

    fn bind_geometry(&mut self, _geometry: &QuadGeometry) {
        self.push(DrawCommand::BindGeometry);
    }

    fn draw_indexed(&mut self, index_count: usize) {
        self.draws += 1;
        self.push(DrawCommand::DrawIndexed(index_count));
    }

    fn release(&mut self) {
        self.push(DrawCommand::Release);
        self.textures.clear();
        self.shaders.clear();
    }
}
