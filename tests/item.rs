use bevy_ecs::{entity::Entity, system::RunSystemOnce, world::World};
use glam::Vec2;
use pacman_engine::audio::Sound;
use pacman_engine::events::GameSignal;
use pacman_engine::graphics::Color;
use pacman_engine::systems::audio::{AudioEvent, AudioListener};
use pacman_engine::systems::collision::Aabb;
use pacman_engine::systems::item::{coin_collision_system, coin_start_system, Coin};
use pacman_engine::systems::player::Pacman;
use pacman_engine::systems::render::SpriteRenderer;
use pacman_engine::systems::state::WorldContext;
use pacman_engine::texture::sprite::SpriteKey;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn spawn_coin(world: &mut World) -> Entity {
    world
        .spawn((
            Coin::default(),
            Aabb::new(Vec2::splat(9.6)),
            SpriteRenderer::new(Some(SpriteKey::new("coins", "coins_0")), Color::WHITE, 2),
            AudioListener::default(),
        ))
        .id()
}

fn setup(coins: usize) -> (World, Entity, Vec<Entity>) {
    let mut world = common::create_test_world(common::corridor_grid(5));
    let pacman = world.spawn(Pacman::default()).id();
    let coins = (0..coins).map(|_| spawn_coin(&mut world)).collect();
    world.run_system_once(coin_start_system).expect("System should run successfully");
    (world, pacman, coins)
}

#[test]
fn test_coin_start_system_counts_coins() {
    let (world, _, _) = setup(3);
    assert_eq!(world.resource::<WorldContext>().coins_remaining(), 3);
}

#[test]
fn test_collecting_a_coin_disables_it() {
    let (mut world, pacman, coins) = setup(2);

    common::send_collision_event(&mut world, coins[0], pacman);
    world.run_system_once(coin_collision_system).expect("System should run successfully");

    assert_that(&world.get::<Coin>(coins[0]).unwrap().enabled).is_false();
    assert_that(&world.get::<Aabb>(coins[0]).unwrap().enabled).is_false();
    assert_that(&world.get::<SpriteRenderer>(coins[0]).unwrap().is_visible()).is_false();
    assert_that(&world.get::<Coin>(coins[1]).unwrap().enabled).is_true();
    assert_eq!(world.resource::<WorldContext>().coins_remaining(), 1);

    let sounds = common::drain::<AudioEvent>(&mut world);
    assert_eq!(
        sounds,
        vec![AudioEvent::Play {
            sound: Sound::Coin,
            volume: 0.1
        }]
    );
    assert_that(&common::drain::<GameSignal>(&mut world)).is_empty();
}

#[test]
fn test_same_coin_is_collected_once() {
    let (mut world, pacman, coins) = setup(2);

    common::send_collision_event(&mut world, pacman, coins[0]);
    common::send_collision_event(&mut world, pacman, coins[0]);
    world.run_system_once(coin_collision_system).expect("System should run successfully");

    assert_eq!(world.resource::<WorldContext>().coins_remaining(), 1);
    assert_eq!(common::drain::<AudioEvent>(&mut world).len(), 1);
}

#[test]
fn test_last_coin_wins_exactly_once() {
    let (mut world, pacman, coins) = setup(2);

    for &coin in &coins {
        common::send_collision_event(&mut world, pacman, coin);
    }
    world.run_system_once(coin_collision_system).expect("System should run successfully");

    assert_eq!(common::drain::<GameSignal>(&mut world), vec![GameSignal::GameWon]);
    assert_that(&world.resource::<WorldContext>().is_won()).is_true();

    // A stray collision afterwards does not win again.
    common::send_collision_event(&mut world, pacman, coins[0]);
    world.run_system_once(coin_collision_system).expect("System should run successfully");
    assert_that(&common::drain::<GameSignal>(&mut world)).is_empty();
}

#[test]
fn test_coin_collision_without_pacman_is_ignored() {
    let (mut world, _, coins) = setup(2);

    common::send_collision_event(&mut world, coins[0], coins[1]);
    world.run_system_once(coin_collision_system).expect("System should run successfully");

    assert_eq!(world.resource::<WorldContext>().coins_remaining(), 2);
}
