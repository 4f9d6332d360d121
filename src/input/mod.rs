//! Keyboard keys and the bindings that map them to game commands.

use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use strum_macros::{Display, EnumString};

use crate::{events::GameCommand, map::direction::Direction};

/// Keys the game reacts to, named after the browser's `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowUp", serialize = "up")]
    ArrowUp,
    #[strum(serialize = "ArrowDown", serialize = "down")]
    ArrowDown,
    #[strum(serialize = "ArrowLeft", serialize = "left")]
    ArrowLeft,
    #[strum(serialize = "ArrowRight", serialize = "right")]
    ArrowRight,
    W,
    A,
    S,
    D,
    #[strum(serialize = "P", serialize = "pause")]
    P,
    M,
    #[strum(serialize = "Escape", serialize = "esc")]
    Escape,
    Q,
}

#[derive(Debug, Clone, Resource)]
pub struct Bindings {
    key_bindings: HashMap<Key, GameCommand>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();

        // Player movement
        key_bindings.insert(Key::ArrowUp, GameCommand::MovePlayer(Direction::Up));
        key_bindings.insert(Key::W, GameCommand::MovePlayer(Direction::Up));
        key_bindings.insert(Key::ArrowDown, GameCommand::MovePlayer(Direction::Down));
        key_bindings.insert(Key::S, GameCommand::MovePlayer(Direction::Down));
        key_bindings.insert(Key::ArrowLeft, GameCommand::MovePlayer(Direction::Left));
        key_bindings.insert(Key::A, GameCommand::MovePlayer(Direction::Left));
        key_bindings.insert(Key::ArrowRight, GameCommand::MovePlayer(Direction::Right));
        key_bindings.insert(Key::D, GameCommand::MovePlayer(Direction::Right));

        // Game actions
        key_bindings.insert(Key::P, GameCommand::TogglePause);
        key_bindings.insert(Key::M, GameCommand::MuteAudio);
        key_bindings.insert(Key::Escape, GameCommand::Exit);
        key_bindings.insert(Key::Q, GameCommand::Exit);

        Self { key_bindings }
    }
}

impl Bindings {
    pub fn command_for(&self, key: Key) -> Option<GameCommand> {
        self.key_bindings.get(&key).copied()
    }

    pub fn bind(&mut self, key: Key, command: GameCommand) {
        self.key_bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: Key) -> Option<GameCommand> {
        self.key_bindings.remove(&key)
    }
}
