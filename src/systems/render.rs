use bevy_ecs::{component::Component, world::World};
use tracing::warn;

use crate::error::GraphicsError;
use crate::graphics::{context::GraphicsContext, Color, GraphicsBackend};
use crate::systems::transform::Transform;
use crate::texture::sprite::{AtlasStore, SpriteKey};

/// Draws a sprite at the entity's transform, tinted by `color`.
///
/// Renderers are drawn by ascending `layer`; within a layer, in entity order.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SpriteRenderer {
    pub sprite: Option<SpriteKey>,
    pub color: Color,
    pub layer: u8,
    pub enabled: bool,
}

impl SpriteRenderer {
    pub fn new(sprite: Option<SpriteKey>, color: Color, layer: u8) -> Self {
        Self {
            sprite,
            color,
            layer,
            enabled: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.enabled && self.sprite.is_some()
    }
}

/// Clears the frame and draws every visible sprite. Returns the number of sprites drawn.
///
/// Sprites missing from the atlas store are skipped with a warning.
pub fn draw_world(
    world: &mut World,
    context: &mut GraphicsContext,
    backend: &mut dyn GraphicsBackend,
) -> Result<usize, GraphicsError> {
    context.begin_frame(backend);

    let mut query = world.query::<(&Transform, &SpriteRenderer)>();
    let mut visible: Vec<(&Transform, &SpriteRenderer)> =
        query.iter(world).filter(|(_, renderer)| renderer.is_visible()).collect();
    visible.sort_by_key(|(_, renderer)| renderer.layer);

    let Some(atlases) = world.get_resource::<AtlasStore>() else {
        return Ok(0);
    };

    let mut drawn = 0;
    for (transform, renderer) in visible {
        let Some(key) = &renderer.sprite else { continue };
        let sprite = match atlases.sprite(key) {
            Ok(sprite) => sprite,
            Err(error) => {
                warn!(%error, "Skipping sprite");
                continue;
            }
        };
        context.draw_sprite(backend, sprite.texture, &sprite.geometry, *transform.model_matrix(), renderer.color)?;
        drawn += 1;
    }
    Ok(drawn)
}
