use bevy_ecs::{
    change_detection::Mut,
    entity::Entity,
    event::EventWriter,
    system::{Query, Res},
};
use tracing::{trace, warn};

use crate::animation::{Animator, FrameAction};
use crate::clock::Clock;
use crate::error::GameError;
use crate::events::GameSignal;
use crate::systems::render::SpriteRenderer;

/// Selects each animator's idle state and reports transitions that point nowhere.
pub fn animator_start_system(mut animators: Query<(Entity, &mut Animator)>) {
    for (entity, mut animator) in animators.iter_mut() {
        animator.start();
        for (transition, target) in animator.dangling_transitions() {
            warn!(?entity, transition, target, "Transition targets a missing animation");
        }
    }
}

/// Ticks every enabled animator and applies the frame that fired, if any.
pub fn animator_system(
    clock: Res<Clock>,
    mut animators: Query<(Entity, &mut Animator, Option<&mut SpriteRenderer>)>,
    mut signals: EventWriter<GameSignal>,
    mut errors: EventWriter<GameError>,
) {
    let dt = clock.delta();
    for (entity, mut animator, renderer) in animators.iter_mut() {
        if !animator.enabled {
            continue;
        }
        match animator.tick(dt) {
            Ok(Some(action)) => apply_frame_action(entity, action, renderer, &mut signals),
            Ok(None) => {}
            Err(error) => {
                errors.write(error.into());
            }
        }
    }
}

fn apply_frame_action(
    entity: Entity,
    action: FrameAction,
    renderer: Option<Mut<SpriteRenderer>>,
    signals: &mut EventWriter<GameSignal>,
) {
    match action {
        FrameAction::SetSprite(key) => {
            if let Some(mut renderer) = renderer {
                renderer.sprite = Some(key);
            }
        }
        FrameAction::ClearSprite => {
            if let Some(mut renderer) = renderer {
                renderer.sprite = None;
            }
        }
        FrameAction::Signal(signal) => {
            trace!(?entity, %signal, "Animation frame signalled");
            signals.write(signal);
        }
        FrameAction::Noop => {}
    }
}
