use bevy_ecs::prelude::*;
use strum_macros::{Display, IntoStaticStr};

use crate::map::direction::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    MovePlayer(Direction),
    TogglePause,
    MuteAudio,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    /// Two enabled colliders overlap this frame.
    Collision(Entity, Entity),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Scene-wide signals, delivered synchronously at the end of a frame to the
/// callbacks registered on the scene.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum GameSignal {
    Pause,
    Resume,
    GameWon,
    GameOver,
}

impl GameSignal {
    /// Signals after which the scene tears itself down.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameSignal::GameWon | GameSignal::GameOver)
    }
}
