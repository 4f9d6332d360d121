use pacman_engine::animation::{
    presets::{coin_animator, ghost_animator, pacman_animator, DEATH, SHINE, WALK},
    Animation, AnimationFrame, Animator, FrameAction, IDLE_ANIMATION,
};
use pacman_engine::error::AnimationError;
use pacman_engine::events::GameSignal;
use pacman_engine::map::direction::Direction;
use pacman_engine::texture::sprite::SpriteKey;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn sprite(name: &str) -> FrameAction {
    FrameAction::SetSprite(SpriteKey::new("test", name))
}

fn two_frames(name: &str) -> Animation {
    Animation::new(
        name,
        [
            AnimationFrame::new(0.5, sprite(&format!("{name}_0"))),
            AnimationFrame::new(1.0, sprite(&format!("{name}_1"))),
        ],
    )
}

#[test]
fn test_animation_fires_frames_at_their_time() {
    let mut animation = two_frames("walk");

    assert_eq!(animation.advance(0.25), None);
    assert_eq!(animation.advance(0.25), Some(sprite("walk_0")));
    assert_eq!(animation.advance(0.25), None);
    assert_eq!(animation.advance(0.25), Some(sprite("walk_1")));
    assert_that(&animation.is_finished()).is_true();
}

#[test]
fn test_animation_fires_at_most_one_frame_per_advance() {
    let mut animation = two_frames("walk");

    assert_eq!(animation.advance(2.0), Some(sprite("walk_0")));
    assert_eq!(animation.frame_index(), 1);
    assert_eq!(animation.advance(0.0), Some(sprite("walk_1")));
}

#[test]
fn test_repeating_animation_restarts_after_finishing() {
    let mut animation = two_frames("walk");
    animation.advance(0.5);
    animation.advance(0.5);
    assert_that(&animation.is_finished()).is_true();

    // The restart consumes the advance that noticed the end.
    assert_eq!(animation.advance(0.25), None);
    assert_eq!(animation.frames_completed(), 0);
    assert_eq!(animation.advance(0.5), Some(sprite("walk_0")));
}

#[test]
fn test_non_repeating_animation_stays_finished() {
    let mut animation = two_frames("once").with_repeat(false);
    animation.advance(0.5);
    animation.advance(0.5);

    assert_eq!(animation.advance(10.0), None);
    assert_that(&animation.is_finished()).is_true();

    animation.reset();
    assert_eq!(animation.advance(0.5), Some(sprite("once_0")));
}

fn trigger_animator() -> Animator {
    let mut animator = Animator::new();
    animator.add_animation(two_frames("a"), false);
    animator.add_animation(two_frames("b"), false);
    animator.add_transition("to_b", None, "b");
    animator.use_trigger("to_b", "go", true).unwrap();
    animator.start();
    animator
}

#[test]
fn test_animator_starts_idle() {
    let animator = trigger_animator();

    assert_eq!(animator.current_name(), Some(IDLE_ANIMATION));
    assert_that(&animator.animation(IDLE_ANIMATION).is_some()).is_true();
    assert_eq!(animator.get_trigger("go"), Some(false));
}

#[test]
fn test_trigger_fires_transition_and_is_consumed() {
    let mut animator = trigger_animator();

    assert_eq!(animator.tick(0.25).unwrap(), None);
    assert_eq!(animator.current_name(), Some(IDLE_ANIMATION));

    animator.set_trigger("go");
    assert_eq!(animator.tick(0.5).unwrap(), Some(sprite("b_0")));
    assert_eq!(animator.current_name(), Some("b"));
    assert_eq!(animator.get_trigger("go"), Some(false));
}

#[test]
fn test_firing_transition_leaves_other_triggers_and_bools() {
    let mut animator = trigger_animator();
    animator.set_trigger("other");
    animator.set_bool("flag", true);

    animator.set_trigger("go");
    animator.tick(0.1).unwrap();

    assert_eq!(animator.current_name(), Some("b"));
    assert_eq!(animator.get_trigger("go"), Some(false));
    assert_eq!(animator.get_trigger("other"), Some(true));
    assert_eq!(animator.get_bool("flag"), Some(true));
}

#[test]
fn test_transition_from_specific_animation() {
    let mut animator = Animator::new();
    animator.add_animation(two_frames("a"), true);
    animator.add_animation(two_frames("b"), false);
    animator.add_transition("b_to_a", Some("b"), "a");
    animator.use_bool("b_to_a", "back", true).unwrap();
    animator.start();

    animator.set_bool("back", true);
    animator.tick(0.1).unwrap();
    assert_eq!(animator.current_name(), Some("a"));

    animator.set_current_animation("b").unwrap();
    animator.tick(0.1).unwrap();
    assert_eq!(animator.current_name(), Some("a"));
    // Bools are not consumed.
    assert_eq!(animator.get_bool("back"), Some(true));
}

#[test]
fn test_first_eligible_transition_wins() {
    let mut animator = Animator::new();
    animator.add_animation(two_frames("a"), false);
    animator.add_animation(two_frames("b"), false);
    animator.add_transition("to_a", None, "a");
    animator.use_trigger("to_a", "go", true).unwrap();
    animator.add_transition("to_b", None, "b");
    animator.use_trigger("to_b", "go", true).unwrap();
    animator.start();

    animator.set_trigger("go");
    animator.tick(0.1).unwrap();
    assert_eq!(animator.current_name(), Some("a"));
}

#[test]
fn test_re_adding_transition_keeps_original() {
    let mut animator = Animator::new();
    animator.add_transition("move", None, "a");
    animator.add_transition("move", Some("x"), "b");

    let transition = animator.transition("move").unwrap();
    assert_eq!(transition.to(), "a");
    assert_eq!(transition.from(), None);
}

#[test]
fn test_use_trigger_on_missing_transition() {
    let mut animator = Animator::new();
    let result = animator.use_trigger("nope", "go", true);

    assert_eq!(result, Err(AnimationError::TransitionNotFound("nope".to_string())));
}

#[test]
fn test_transition_to_unknown_animation_is_an_error() {
    let mut animator = Animator::new();
    animator.add_transition("broken", None, "missing");
    animator.use_trigger("broken", "go", true).unwrap();
    animator.start();
    assert_eq!(animator.dangling_transitions(), vec![("broken", "missing")]);

    animator.set_trigger("go");
    let result = animator.tick(0.1);

    assert_eq!(
        result,
        Err(AnimationError::UnknownAnimation {
            transition: "broken".to_string(),
            animation: "missing".to_string(),
        })
    );
    assert_eq!(animator.get_trigger("go"), Some(true));
    assert_eq!(animator.current_name(), Some(IDLE_ANIMATION));
}

#[test]
fn test_set_current_animation_unknown() {
    let mut animator = Animator::new();
    let result = animator.set_current_animation("ghost");

    assert_eq!(result, Err(AnimationError::AnimationNotFound("ghost".to_string())));
}

#[test]
fn test_pacman_death_is_atomic() {
    let mut animator = pacman_animator().unwrap();
    animator.start();
    animator.set_trigger(WALK);
    animator.tick(0.05).unwrap();
    assert_eq!(animator.current_name(), Some(WALK));

    animator.set_trigger(DEATH);
    animator.tick(0.05).unwrap();
    assert_eq!(animator.current_name(), Some(DEATH));

    animator.set_trigger(WALK);
    animator.tick(0.05).unwrap();
    assert_eq!(animator.current_name(), Some(DEATH));
}

#[test]
fn test_pacman_death_ends_with_game_over() {
    let mut animator = pacman_animator().unwrap();
    animator.start();
    animator.set_trigger(DEATH);

    let actions: Vec<FrameAction> = (0..40).filter_map(|_| animator.tick(0.05).unwrap()).collect();

    assert_eq!(actions.len(), 13);
    assert_eq!(actions[0], FrameAction::SetSprite(SpriteKey::new("pacmans", "pacmans_0")));
    assert_eq!(actions[11], FrameAction::ClearSprite);
    assert_eq!(actions[12], FrameAction::Signal(GameSignal::GameOver));
    assert_eq!(animator.current_name(), Some(DEATH));
}

#[test]
fn test_ghost_animator_follows_walk_triggers() {
    let mut animator = ghost_animator().unwrap();
    animator.start();

    for direction in [Direction::Left, Direction::Up, Direction::Down, Direction::Right] {
        animator.set_trigger(direction.walk_trigger());
        animator.tick(0.01).unwrap();
        assert_eq!(animator.current_name(), Some(direction.walk_trigger()));
    }
}

#[test]
fn test_coin_animator_shines_from_start() {
    let mut animator = coin_animator().unwrap();
    animator.start();
    assert_eq!(animator.current_name(), Some(SHINE));

    let first = animator.tick(0.15).unwrap();
    assert_eq!(first, Some(FrameAction::SetSprite(SpriteKey::new("coins", "coins_0"))));
}
