//! Ready-made animators for the Pac-Man cast.
//!
//! Frame times are cumulative seconds from the start of each animation.

use crate::animation::{Animation, AnimationFrame, Animator, FrameAction, IDLE_ANIMATION};
use crate::constants::atlas;
use crate::error::AnimationError;
use crate::events::GameSignal;
use crate::map::direction::Direction;
use crate::texture::sprite::SpriteKey;

pub const WALK: &str = "walk";
pub const DEATH: &str = "death";
pub const SHINE: &str = "shine";

fn sprite(atlas: &str, prefix: &str, index: usize) -> FrameAction {
    FrameAction::SetSprite(SpriteKey::new(atlas, format!("{prefix}{index}")))
}

/// Frames at `step`, `2 * step`, ... showing the given sprites in order.
fn timed_sprites(atlas: &str, prefix: &str, step: f32, indices: &[usize]) -> Vec<AnimationFrame> {
    indices
        .iter()
        .enumerate()
        .map(|(i, &index)| AnimationFrame::new(step * (i + 1) as f32, sprite(atlas, prefix, index)))
        .collect()
}

/// Adds a source-less transition that fires when each listed trigger holds its value.
fn wildcard(animator: &mut Animator, to: &str, triggers: &[(&str, bool)]) -> Result<(), AnimationError> {
    animator.add_transition(to, None, to);
    for &(trigger, value) in triggers {
        animator.use_trigger(to, trigger, value)?;
    }
    Ok(())
}

/// Idle, a four-frame chomp, and an uninterruptible death that ends by signalling game over.
pub fn pacman_animator() -> Result<Animator, AnimationError> {
    let mut animator = Animator::new();

    animator.add_animation(
        Animation::new(WALK, timed_sprites(atlas::PACMANS, atlas::PACMANS_PREFIX, 0.1, &[11, 12, 13, 14])),
        false,
    );

    let mut death = timed_sprites(atlas::PACMANS, atlas::PACMANS_PREFIX, 0.1, &(0..=10).collect::<Vec<_>>());
    death.push(AnimationFrame::new(1.2, FrameAction::ClearSprite));
    death.push(AnimationFrame::new(1.3, FrameAction::Signal(GameSignal::GameOver)));
    animator.add_animation(Animation::new(DEATH, death).with_repeat(false).with_atomic(true), false);

    wildcard(&mut animator, IDLE_ANIMATION, &[(IDLE_ANIMATION, true)])?;
    wildcard(&mut animator, WALK, &[(WALK, true), (DEATH, false)])?;
    wildcard(&mut animator, DEATH, &[(DEATH, true)])?;

    Ok(animator)
}

/// Idle plus a two-frame walk per heading.
pub fn ghost_animator() -> Result<Animator, AnimationError> {
    let mut animator = Animator::new();

    let walks = [
        (Direction::Down, [6, 7]),
        (Direction::Up, [2, 3]),
        (Direction::Left, [4, 5]),
        (Direction::Right, [0, 1]),
    ];
    for (direction, frames) in walks {
        animator.add_animation(
            Animation::new(
                direction.walk_trigger(),
                timed_sprites(atlas::GHOSTS, atlas::GHOSTS_PREFIX, 0.1, &frames),
            ),
            false,
        );
    }

    wildcard(&mut animator, IDLE_ANIMATION, &[(IDLE_ANIMATION, true)])?;
    for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
        let name = direction.walk_trigger();
        wildcard(&mut animator, name, &[(name, true)])?;
    }

    Ok(animator)
}

/// A looping four-frame shine that starts playing immediately.
pub fn coin_animator() -> Result<Animator, AnimationError> {
    let mut animator = Animator::new();

    animator.add_animation(
        Animation::new(SHINE, timed_sprites(atlas::COINS, atlas::COINS_PREFIX, 0.15, &[0, 1, 2, 1])),
        true,
    );

    wildcard(&mut animator, IDLE_ANIMATION, &[(IDLE_ANIMATION, true)])?;
    wildcard(&mut animator, SHINE, &[(SHINE, true)])?;

    Ok(animator)
}
