//! Timed frame sequences and the trigger-driven state machine that switches between them.

pub mod animator;
pub mod presets;
pub mod sequence;

pub use animator::{Animator, Transition, IDLE_ANIMATION};
pub use sequence::{Animation, AnimationFrame};

use crate::events::GameSignal;
use crate::texture::sprite::SpriteKey;

/// What happens when a frame's time is reached.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    /// Show this sprite on the entity's renderer.
    SetSprite(SpriteKey),
    /// Hide the entity's sprite.
    ClearSprite,
    /// Emit a scene-wide signal.
    Signal(GameSignal),
    Noop,
}
