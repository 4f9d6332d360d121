use bevy_ecs::{
    component::Component,
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, ResMut},
};
use tracing::{debug, info};

use crate::{
    audio::Sound,
    events::{GameEvent, GameSignal},
    systems::{
        audio::{AudioEvent, AudioListener},
        collision::Aabb,
        player::Pacman,
        render::SpriteRenderer,
        state::WorldContext,
    },
};

/// A collectible coin. Collecting the last one wins the level.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub enabled: bool,
}

impl Default for Coin {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Counts the coins the level starts with.
pub fn coin_start_system(coins: Query<&Coin>, mut context: ResMut<WorldContext>) {
    for _ in coins.iter().filter(|coin| coin.enabled) {
        context.add_coin();
    }
    debug!(coins = context.coins_remaining(), "Coins counted");
}

/// Removes coins Pac-Man touches and signals the win when none are left.
#[allow(clippy::type_complexity)]
pub fn coin_collision_system(
    mut events: EventReader<GameEvent>,
    pacmen: Query<(), With<Pacman>>,
    mut coins: Query<(&mut Coin, &mut Aabb, Option<&mut SpriteRenderer>, Option<&AudioListener>)>,
    mut context: ResMut<WorldContext>,
    mut signals: EventWriter<GameSignal>,
    mut audio: EventWriter<AudioEvent>,
) {
    for event in events.read() {
        let GameEvent::Collision(a, b) = *event else { continue };
        let coin_entity = if pacmen.contains(a) && coins.contains(b) {
            b
        } else if pacmen.contains(b) && coins.contains(a) {
            a
        } else {
            continue;
        };
        let Ok((mut coin, mut aabb, renderer, listener)) = coins.get_mut(coin_entity) else {
            continue;
        };
        if !coin.enabled {
            continue;
        }

        coin.enabled = false;
        aabb.enabled = false;
        if let Some(mut renderer) = renderer {
            renderer.enabled = false;
        }
        if let Some(listener) = listener {
            audio.write(listener.play(Sound::Coin));
        }

        if context.collect_coin() {
            info!("Last coin collected");
            signals.write(GameSignal::GameWon);
        }
    }
}
