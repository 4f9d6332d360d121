use strum_macros::{Display, IntoStaticStr};

/// Lifecycle of a [`Scene`](super::Scene).
///
/// `Loaded → Running ⇄ Paused → Finalized`. A scene that hits a runtime error moves to `Failed`
/// and stops scheduling frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SceneState {
    Loaded,
    Running,
    Paused,
    Finalized,
    Failed,
}

impl SceneState {
    /// Whether the scene still accepts frames.
    pub fn is_live(self) -> bool {
        matches!(self, SceneState::Running | SceneState::Paused)
    }
}
