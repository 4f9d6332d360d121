use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use tracing::debug;

use crate::constants::atlas::SheetLayout;
use crate::error::GraphicsError;
use crate::graphics::TextureId;
use crate::texture::quad::QuadGeometry;

/// Names a sprite: the atlas it lives in and its name within that atlas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub atlas: String,
    pub name: String,
}

impl SpriteKey {
    pub fn new(atlas: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            atlas: atlas.into(),
            name: name.into(),
        }
    }
}

/// A drawable region of a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub geometry: QuadGeometry,
}

/// One texture cut into named rectangular sprites.
///
/// Crop coordinates are in pixels with the origin at the bottom-left corner of the texture.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    texture: TextureId,
    width: u32,
    height: u32,
    sprites: HashMap<String, Sprite>,
}

impl SpriteAtlas {
    pub fn new(texture: TextureId, width: u32, height: u32) -> Self {
        Self {
            texture,
            width,
            height,
            sprites: HashMap::new(),
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Registers the sprite `name` covering the given pixel rectangle.
    pub fn crop(&mut self, name: impl Into<String>, x: u32, y: u32, width: u32, height: u32) -> &mut Self {
        let (tw, th) = (self.width.max(1) as f32, self.height.max(1) as f32);
        let geometry = QuadGeometry::with_uv_rect(
            x as f32 / tw,
            y as f32 / th,
            (x + width) as f32 / tw,
            (y + height) as f32 / th,
        );
        self.sprites.insert(
            name.into(),
            Sprite {
                texture: self.texture,
                geometry,
            },
        );
        self
    }

    /// Registers the whole texture as a single sprite.
    pub fn crop_whole(&mut self, name: impl Into<String>) -> &mut Self {
        let (width, height) = (self.width, self.height);
        self.crop(name, 0, 0, width, height)
    }

    /// Cuts the sheet into `rows × columns` sprites named `{prefix}{index}`.
    ///
    /// Indices run left to right starting from the top row.
    pub fn crop_evenly(&mut self, layout: &SheetLayout) -> &mut Self {
        let count = layout.rows * layout.columns;
        for index in 0..count {
            let column = index % layout.columns;
            let row_from_top = index / layout.columns;
            let x = column * (layout.sprite_width + layout.spacing) + layout.border;
            let y = (layout.rows - 1 - row_from_top) * (layout.sprite_height + layout.spacing) + layout.border;
            self.crop(
                format!("{}{}", layout.prefix, index),
                x,
                y,
                layout.sprite_width,
                layout.sprite_height,
            );
        }
        debug!(prefix = layout.prefix, count, "Sheet cropped");
        self
    }

    pub fn get_sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Every atlas loaded for the current scene, by name.
#[derive(Resource, Debug, Default)]
pub struct AtlasStore {
    atlases: HashMap<String, SpriteAtlas>,
}

impl AtlasStore {
    pub fn insert(&mut self, name: impl Into<String>, atlas: SpriteAtlas) {
        self.atlases.insert(name.into(), atlas);
    }

    pub fn get(&self, name: &str) -> Option<&SpriteAtlas> {
        self.atlases.get(name)
    }

    pub fn sprite(&self, key: &SpriteKey) -> Result<&Sprite, GraphicsError> {
        let atlas = self
            .atlases
            .get(&key.atlas)
            .ok_or_else(|| GraphicsError::UnknownAtlas(key.atlas.clone()))?;
        atlas.get_sprite(&key.name).ok_or_else(|| GraphicsError::UnknownSprite {
            atlas: key.atlas.clone(),
            sprite: key.name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    pub fn clear(&mut self) {
        self.atlases.clear();
    }
}
