use std::collections::HashMap;

use bevy_ecs::{entity::Entity, resource::Resource};
use tracing::debug;

/// Scene-wide game bookkeeping: the named ghost registry, the remaining coin count, and Pac-Man.
///
/// Lives in the scene's world, so it is created and dropped together with the scene.
#[derive(Resource, Debug, Default)]
pub struct WorldContext {
    ghosts: HashMap<String, Entity>,
    coins: u32,
    pacman: Option<Entity>,
    won: bool,
}

impl WorldContext {
    pub fn register_ghost(&mut self, name: &str, entity: Entity) {
        if self.ghosts.insert(name.to_string(), entity).is_some() {
            debug!(name, "Ghost name registered twice; keeping the latest");
        }
    }

    pub fn ghost(&self, name: &str) -> Option<Entity> {
        self.ghosts.get(name).copied()
    }

    pub fn set_pacman(&mut self, entity: Entity) {
        self.pacman = Some(entity);
    }

    pub fn pacman(&self) -> Option<Entity> {
        self.pacman
    }

    pub fn add_coin(&mut self) {
        self.coins += 1;
    }

    pub fn coins_remaining(&self) -> u32 {
        self.coins
    }

    /// Records a collected coin. Returns `true` exactly once: when the last coin is taken.
    pub fn collect_coin(&mut self) -> bool {
        self.coins = self.coins.saturating_sub(1);
        if self.coins == 0 && !self.won {
            self.won = true;
            return true;
        }
        false
    }

    pub fn is_won(&self) -> bool {
        self.won
    }
}
