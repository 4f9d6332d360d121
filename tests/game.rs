use std::time::Duration;

use bevy_ecs::world::World;
use glam::Vec2;
use pacman_engine::animation::{Animation, Animator};
use pacman_engine::audio::Sound;
use pacman_engine::error::{AnimationError, GameError};
use pacman_engine::events::GameSignal;
use pacman_engine::game::{Scene, SceneState};
use pacman_engine::graphics::context::GraphicsContext;
use pacman_engine::graphics::headless::RecordingBackend;
use pacman_engine::input::Key;
use pacman_engine::map::direction::Direction;
use pacman_engine::systems::audio::AudioState;
use pacman_engine::systems::components::EntityKind;
use pacman_engine::systems::player::Pacman;
use pacman_engine::systems::transform::Transform;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

/// Pac-Man at (1, 1) facing a single coin at (2, 1), with a wall behind it.
fn single_coin_level() -> common::TestScene {
    let mut cells = common::corridor_walls(4);
    cells.push(common::cell("wall", 3, 1));
    cells.push(common::cell("pacman", 1, 1));
    cells.push(common::cell("coin", 2, 1));
    common::TestScene::load(&common::level(3, 4, cells))
}

/// Pac-Man at (1, 1) and Blinky at (5, 1) in the same corridor.
fn ghost_level() -> common::TestScene {
    let mut cells = common::corridor_walls(7);
    cells.push(common::cell("pacman", 1, 1));
    cells.push(common::ghost_cell("blinky", 5, 1));
    common::TestScene::load(&common::level(3, 7, cells))
}

fn pacman(world: &mut World) -> (Pacman, Vec2) {
    let mut query = world.query::<(&Pacman, &Transform)>();
    let (pacman, transform) = query.single(world).unwrap();
    (pacman.clone(), transform.position())
}

#[test]
fn test_scene_starts_running_and_plays_start_sound() {
    let scene = single_coin_level();

    assert_eq!(scene.scene.state(), SceneState::Running);
    assert_eq!(scene.audio.count(Sound::Start), 1);
}

#[test]
fn test_scene_cannot_start_twice() {
    let mut scene = single_coin_level();
    let result = scene.scene.run(Duration::ZERO);

    assert!(matches!(result, Err(GameError::InvalidState(_))));
    assert_eq!(scene.scene.state(), SceneState::Running);
}

#[test]
fn test_collecting_last_coin_wins_and_finalizes() {
    let mut scene = single_coin_level();

    let state = scene.run(60);

    assert_eq!(state, SceneState::Finalized);
    assert_eq!(scene.signal_count(GameSignal::GameWon), 1);
    assert_eq!(scene.signal_count(GameSignal::GameOver), 0);
    assert_eq!(scene.audio.count(Sound::Coin), 1);
    assert_that(&scene.frame).is_less_than(20);

    let world = scene.scene.world_mut();
    assert_eq!(world.query::<&EntityKind>().iter(world).count(), 0);
}

#[test]
fn test_finalized_scene_ignores_frames() {
    let mut scene = single_coin_level();
    scene.run(60);
    let signals = scene.signals.borrow().len();

    assert_eq!(scene.step(), SceneState::Finalized);
    assert_eq!(scene.signals.borrow().len(), signals);
}

#[test]
fn test_ghost_contact_ends_in_game_over() {
    let mut scene = ghost_level();

    let state = scene.run(300);

    assert_eq!(state, SceneState::Finalized);
    assert_eq!(scene.signal_count(GameSignal::GameOver), 1);
    assert_eq!(scene.signal_count(GameSignal::GameWon), 0);
    assert_eq!(scene.audio.count(Sound::Death), 1);
}

#[test]
fn test_pacman_stops_moving_once_caught() {
    let mut scene = ghost_level();
    let mut caught_at = None;
    for _ in 0..60 {
        scene.step();
        let (pacman, position) = pacman(scene.scene.world_mut());
        if !pacman.enabled {
            caught_at = Some(position);
            break;
        }
    }
    let caught_at = caught_at.expect("Pac-Man should be caught within a second");

    for _ in 0..10 {
        scene.step();
    }
    assert_eq!(pacman(scene.scene.world_mut()).1, caught_at);
}

#[test]
fn test_pause_freezes_and_resume_continues() {
    let mut scene = ghost_level();
    scene.run(2);

    scene.scene.key_down(Key::P);
    assert_eq!(scene.scene.state(), SceneState::Paused);
    assert_eq!(scene.signal_count(GameSignal::Pause), 1);
    assert_eq!(scene.audio.count(Sound::Pause), 1);

    let (_, before) = pacman(scene.scene.world_mut());
    for _ in 0..30 {
        assert_eq!(scene.step(), SceneState::Paused);
    }
    let (_, during) = pacman(scene.scene.world_mut());
    assert_eq!(before, during);

    scene.scene.key_down(Key::P);
    assert_eq!(scene.scene.state(), SceneState::Running);
    assert_eq!(scene.signal_count(GameSignal::Resume), 1);

    scene.step();
    let (_, after) = pacman(scene.scene.world_mut());
    // No catch-up after resuming: one frame moves one frame's worth.
    assert_that(&(after.x - during.x)).is_greater_than(0.0);
    assert_that(&(after.x - during.x)).is_less_than(2.0);
}

#[test]
fn test_movement_keys_buffer_a_direction() {
    let mut scene = ghost_level();
    scene.scene.key_down(Key::ArrowUp);
    scene.step();

    let (pacman, _) = pacman(scene.scene.world_mut());
    assert_eq!(pacman.buffered_direction(), Direction::Up);
}

#[test]
fn test_mute_key_silences_effects() {
    let mut scene = single_coin_level();
    scene.scene.key_down(Key::M);
    assert_that(&scene.scene.world().resource::<AudioState>().muted).is_true();

    scene.run(60);

    assert_eq!(scene.audio.count(Sound::Coin), 0);
    assert_eq!(scene.signal_count(GameSignal::GameWon), 1);
}

#[test]
fn test_exit_key_finalizes_on_next_frame() {
    let mut scene = ghost_level();
    scene.scene.key_down(Key::Escape);
    assert_eq!(scene.scene.state(), SceneState::Running);

    assert_eq!(scene.step(), SceneState::Finalized);
    assert_eq!(scene.signals.borrow().len(), 0);
}

#[test]
fn test_animation_error_fails_the_scene() {
    let mut scene = Scene::new(GraphicsContext::new(100.0, 100.0));
    let mut animator = Animator::new();
    animator.add_animation(Animation::empty("a"), true);
    animator.add_transition("broken", None, "missing");
    animator.use_trigger("broken", "go", true).unwrap();
    animator.set_trigger("go");
    scene.world_mut().spawn(animator);
    let mut backend = RecordingBackend::new();

    scene.run(Duration::ZERO).unwrap();
    let result = scene.frame(Duration::from_millis(16), &mut backend);

    assert!(matches!(
        result,
        Err(GameError::Animation(AnimationError::UnknownAnimation { .. }))
    ));
    assert_eq!(scene.state(), SceneState::Failed);
    assert_eq!(
        scene.frame(Duration::from_millis(32), &mut backend).unwrap(),
        SceneState::Failed
    );
}

#[test]
fn test_empty_scene_runs_and_clears_each_frame() {
    let mut scene = Scene::new(GraphicsContext::new(100.0, 100.0));
    let mut backend = RecordingBackend::new();
    let received = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&received);
    scene.on_signal(move |signal| sink.borrow_mut().push(signal));

    scene.run(Duration::ZERO).unwrap();
    for i in 1..=3 {
        scene.frame(Duration::from_millis(16 * i), &mut backend).unwrap();
    }
    scene.pause();
    scene.resume();

    assert_eq!(backend.draw_calls(), 0);
    assert_eq!(backend.commands().len(), 3);
    assert_eq!(*received.borrow(), vec![GameSignal::Pause, GameSignal::Resume]);
}

#[test]
fn test_each_sound_reaches_the_sink_once() {
    let mut scene = single_coin_level();
    assert_eq!(scene.audio.count(Sound::Start), 1);

    scene.run(60);

    assert_eq!(scene.audio.count(Sound::Start), 1);
    assert_eq!(scene.audio.count(Sound::Coin), 1);
}

#[test]
fn test_finalizing_stops_all_audio() {
    let mut scene = single_coin_level();
    assert_eq!(scene.audio.stop_count(), 0);

    assert_eq!(scene.run(60), SceneState::Finalized);
    assert_eq!(scene.audio.stop_count(), 1);

    scene.step();
    assert_eq!(scene.audio.stop_count(), 1);
}

#[test]
fn test_exit_stops_all_audio() {
    let mut scene = ghost_level();
    scene.scene.key_down(Key::Escape);

    scene.step();

    assert_eq!(scene.audio.stop_count(), 1);
}

#[test]
fn test_move_key_survives_a_pause_toggle() {
    let mut scene = ghost_level();
    scene.scene.key_down(Key::ArrowUp);
    scene.scene.key_down(Key::P);
    scene.scene.key_down(Key::P);

    assert_eq!(scene.step(), SceneState::Running);
    let (pacman, _) = pacman(scene.scene.world_mut());
    assert_eq!(pacman.buffered_direction(), Direction::Up);
}

#[test]
fn test_move_key_while_paused_applies_after_resume() {
    let mut scene = ghost_level();
    scene.scene.key_down(Key::P);
    scene.scene.key_down(Key::ArrowUp);
    assert_eq!(scene.step(), SceneState::Paused);

    scene.scene.key_down(Key::P);
    scene.step();

    let (pacman, _) = pacman(scene.scene.world_mut());
    assert_eq!(pacman.buffered_direction(), Direction::Up);
}
