//! The scene: one world of entities, the schedules that drive it, and its frame loop.

use std::time::Duration;

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use tracing::{debug, error, info};

use crate::audio::{AudioSink, NullAudio};
use crate::clock::Clock;
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent, GameSignal};
use crate::formatter;
use crate::graphics::{context::GraphicsContext, GraphicsBackend};
use crate::input::{Bindings, Key};
use crate::systems::animation::{animator_start_system, animator_system};
use crate::systems::audio::{
    ambient_finalize_system, ambient_signal_system, ambient_start_system, audio_system, AudioEvent, AudioResource,
    AudioState,
};
use crate::systems::collision::{collision_system, CollisionMatrix};
use crate::systems::render::draw_world;
use crate::systems::state::WorldContext;
use crate::texture::sprite::AtlasStore;

pub mod state;

pub use state::SceneState;

/// Ordered phases of a frame. The start schedule uses the same phases.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Commands from the host are applied.
    Input,
    /// Entities move and decide.
    Logic,
    /// Animators advance.
    Animation,
    /// Overlaps are detected.
    Collision,
    /// Overlaps are reacted to.
    Reaction,
}

fn single_threaded() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule
}

fn phased_schedule() -> Schedule {
    let mut schedule = single_threaded();
    schedule.configure_sets(
        (
            FrameSet::Input,
            FrameSet::Logic,
            FrameSet::Animation,
            FrameSet::Collision,
            FrameSet::Reaction,
        )
            .chain(),
    );
    schedule
}

/// A running game world.
///
/// Each frame runs the update schedule (movement, animation, collision sweep, reactions), draws
/// every sprite, then delivers the signals raised during the frame to the registered callbacks and
/// plays the queued sounds. A `GameWon` or `GameOver` signal finalizes the scene once delivered.
///
/// Sounds are played from a single audio schedule so each `AudioEvent` reaches the sink once.
pub struct Scene {
    world: World,
    start_schedule: Schedule,
    update_schedule: Schedule,
    signal_schedule: Schedule,
    audio_schedule: Schedule,
    finalize_schedule: Schedule,
    graphics: GraphicsContext,
    bindings: Bindings,
    state: SceneState,
    listeners: Vec<Box<dyn FnMut(GameSignal)>>,
    exit_requested: bool,
}

impl Scene {
    pub fn new(graphics: GraphicsContext) -> Self {
        let mut world = World::default();

        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<GameSignal>(&mut world);
        EventRegistry::register_event::<AudioEvent>(&mut world);

        world.insert_resource(Clock::default());
        world.insert_resource(WorldContext::default());
        world.insert_resource(AtlasStore::default());
        world.insert_resource(AudioState::default());
        world.insert_resource(CollisionMatrix::default());
        world.insert_non_send_resource(AudioResource(Box::new(NullAudio)));

        let mut start_schedule = phased_schedule();
        start_schedule.add_systems((
            ambient_start_system.in_set(FrameSet::Logic),
            animator_start_system.in_set(FrameSet::Animation),
        ));

        let mut update_schedule = phased_schedule();
        update_schedule.add_systems((
            animator_system.in_set(FrameSet::Animation),
            collision_system.in_set(FrameSet::Collision),
        ));

        let mut signal_schedule = single_threaded();
        signal_schedule.add_systems(ambient_signal_system);

        let mut audio_schedule = single_threaded();
        audio_schedule.add_systems(audio_system);

        let mut finalize_schedule = single_threaded();
        finalize_schedule.add_systems(ambient_finalize_system);

        Self {
            world,
            start_schedule,
            update_schedule,
            signal_schedule,
            audio_schedule,
            finalize_schedule,
            graphics,
            bindings: Bindings::default(),
            state: SceneState::Loaded,
            listeners: Vec::new(),
            exit_requested: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn graphics(&self) -> &GraphicsContext {
        &self.graphics
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Systems run once when the scene starts.
    pub fn start_schedule_mut(&mut self) -> &mut Schedule {
        &mut self.start_schedule
    }

    /// Systems run every frame.
    pub fn update_schedule_mut(&mut self) -> &mut Schedule {
        &mut self.update_schedule
    }

    /// Systems run once when the scene is finalized, before its entities are dropped.
    pub fn finalize_schedule_mut(&mut self) -> &mut Schedule {
        &mut self.finalize_schedule
    }

    pub fn set_audio_sink(&mut self, sink: impl AudioSink + 'static) {
        self.world.insert_non_send_resource(AudioResource(Box::new(sink)));
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.world.resource_mut::<AudioState>().muted = muted;
    }

    /// Registers a callback receiving every signal the scene raises.
    pub fn on_signal(&mut self, listener: impl FnMut(GameSignal) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts the scene: anchors the clock at `now` and runs every start system once.
    pub fn run(&mut self, now: Duration) -> GameResult<()> {
        if self.state != SceneState::Loaded {
            return Err(GameError::InvalidState(format!("cannot start a scene that is {}", self.state)));
        }

        self.world.resource_mut::<Clock>().init(now);
        self.start_schedule.run(&mut self.world);
        self.state = SceneState::Running;
        self.check_errors()?;
        self.dispatch_signals();
        self.update_events();
        info!("Scene started");
        Ok(())
    }

    /// Advances the scene to the host timestamp `now` and draws it.
    ///
    /// Paused, finalized and failed scenes do nothing. Returns the state after the frame.
    pub fn frame(&mut self, now: Duration, backend: &mut dyn GraphicsBackend) -> GameResult<SceneState> {
        if !self.state.is_live() {
            return Ok(self.state);
        }
        if self.exit_requested {
            self.finalize(backend);
            return Ok(self.state);
        }

        self.world.resource_mut::<Clock>().tick(now);
        if self.state == SceneState::Paused {
            return Ok(self.state);
        }

        formatter::increment_frame();
        self.update_schedule.run(&mut self.world);
        self.check_errors()?;
        self.draw(backend)?;

        let terminal = self.dispatch_signals();
        self.update_events();
        if terminal {
            self.finalize(backend);
        }
        Ok(self.state)
    }

    /// Draws every visible sprite. Returns the number of sprites drawn.
    pub fn draw(&mut self, backend: &mut dyn GraphicsBackend) -> GameResult<usize> {
        Ok(draw_world(&mut self.world, &mut self.graphics, backend)?)
    }

    /// Feeds a key press through the bindings.
    pub fn key_down(&mut self, key: Key) {
        let Some(command) = self.bindings.command_for(key) else {
            return;
        };
        debug!(%key, ?command, "Key command");

        match command {
            GameCommand::TogglePause => match self.state {
                SceneState::Running => self.pause(),
                SceneState::Paused => self.resume(),
                _ => {}
            },
            GameCommand::MuteAudio => {
                let mut audio = self.world.resource_mut::<AudioState>();
                audio.muted = !audio.muted;
                info!(muted = audio.muted, "Audio toggled");
            }
            GameCommand::Exit => {
                info!("Exit requested");
                self.exit_requested = true;
            }
            GameCommand::MovePlayer(_) => {
                if self.state.is_live() {
                    self.world.resource_mut::<Events<GameEvent>>().send(GameEvent::Command(command));
                }
            }
        }
    }

    /// Freezes time and raises `Pause`.
    pub fn pause(&mut self) {
        if self.state != SceneState::Running {
            return;
        }
        self.world.resource_mut::<Clock>().set_scale(0.0);
        self.state = SceneState::Paused;
        self.raise(GameSignal::Pause);
        info!("Scene paused");
    }

    /// Restores the time scale and raises `Resume`.
    pub fn resume(&mut self) {
        if self.state != SceneState::Paused {
            return;
        }
        self.world.resource_mut::<Clock>().set_scale(1.0);
        self.state = SceneState::Running;
        self.raise(GameSignal::Resume);
        info!("Scene resumed");
    }

    fn raise(&mut self, signal: GameSignal) {
        self.world.resource_mut::<Events<GameSignal>>().send(signal);
        self.dispatch_signals();
    }

    /// Tears the scene down: finalize systems run, then every entity and atlas is dropped and the
    /// backend releases its resources.
    pub fn finalize(&mut self, backend: &mut dyn GraphicsBackend) {
        if self.state == SceneState::Finalized {
            return;
        }
        self.finalize_schedule.run(&mut self.world);
        self.play_audio();
        self.world.resource_mut::<Clock>().set_scale(0.0);
        self.world.clear_entities();
        self.world.resource_mut::<AtlasStore>().clear();
        self.world.insert_resource(WorldContext::default());
        self.graphics.teardown(backend);
        self.listeners.clear();
        self.state = SceneState::Finalized;
        info!("Scene finalized");
    }

    fn check_errors(&mut self) -> GameResult<()> {
        let mut errors: Vec<GameError> = self.world.resource_mut::<Events<GameError>>().drain().collect();
        if errors.is_empty() {
            return Ok(());
        }
        for error in &errors {
            error!(%error, "Scene error");
        }
        self.state = SceneState::Failed;
        Err(errors.swap_remove(0))
    }

    /// Delivers pending signals to the listeners and plays queued sounds. Returns whether a
    /// terminal signal was among them.
    fn dispatch_signals(&mut self) -> bool {
        self.signal_schedule.run(&mut self.world);
        self.play_audio();
        let signals: Vec<GameSignal> = self.world.resource_mut::<Events<GameSignal>>().drain().collect();

        let mut terminal = false;
        for signal in signals {
            info!(%signal, "Signal");
            for listener in self.listeners.iter_mut() {
                listener(signal);
            }
            terminal |= signal.is_terminal();
        }
        terminal
    }

    fn play_audio(&mut self) {
        self.audio_schedule.run(&mut self.world);
    }

    /// Rotates the event buffers. Only called once a frame (or the start) is complete.
    fn update_events(&mut self) {
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();
    }
}
