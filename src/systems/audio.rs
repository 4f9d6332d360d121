//! Audio events and the system that forwards them to the host's [`AudioSink`].
//!
//! The sink is stored as a non-send resource since host audio handles are usually tied to the
//! main thread.

use bevy_ecs::{
    component::Component,
    event::{Event, EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{NonSendMut, Query, Res},
};
use tracing::{debug, trace};

use crate::audio::{AudioSink, Sound};
use crate::constants::EFFECT_VOLUME;
use crate::events::GameSignal;

#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    pub muted: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    Play { sound: Sound, volume: f32 },
    StopAll,
}

/// Lets an entity emit sounds, at the given volume.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AudioListener {
    pub volume: f32,
}

impl Default for AudioListener {
    fn default() -> Self {
        Self { volume: EFFECT_VOLUME }
    }
}

impl AudioListener {
    pub fn play(&self, sound: Sound) -> AudioEvent {
        AudioEvent::Play {
            sound,
            volume: self.volume,
        }
    }
}

/// Marker for the entity that owns scene-wide sounds (start jingle, pause chime).
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Ambient;

pub struct AudioResource(pub Box<dyn AudioSink>);

/// Plays the start jingle when the scene starts.
pub fn ambient_start_system(ambient: Query<&AudioListener, With<Ambient>>, mut audio: EventWriter<AudioEvent>) {
    for listener in ambient.iter() {
        audio.write(listener.play(Sound::Start));
    }
}

/// Plays the pause chime whenever the scene is paused.
pub fn ambient_signal_system(
    mut signals: EventReader<GameSignal>,
    ambient: Query<&AudioListener, With<Ambient>>,
    mut audio: EventWriter<AudioEvent>,
) {
    for signal in signals.read() {
        if *signal == GameSignal::Pause {
            for listener in ambient.iter() {
                audio.write(listener.play(Sound::Pause));
            }
        }
    }
}

/// Silences everything still playing when the scene is torn down.
pub fn ambient_finalize_system(ambient: Query<(), With<Ambient>>, mut audio: EventWriter<AudioEvent>) {
    if !ambient.is_empty() {
        audio.write(AudioEvent::StopAll);
    }
}

/// Forwards queued audio events to the sink. Runs from one schedule only, so every event is
/// played exactly once.
pub fn audio_system(mut sink: NonSendMut<AudioResource>, state: Res<AudioState>, mut events: EventReader<AudioEvent>) {
    for event in events.read() {
        match *event {
            AudioEvent::Play { sound, volume } => {
                if state.muted {
                    debug!(%sound, "Skipping sound while muted");
                } else {
                    trace!(%sound, volume, "Playing sound");
                    sink.0.play(sound, volume);
                }
            }
            AudioEvent::StopAll => {
                debug!("Stopping all sounds");
                sink.0.stop_all();
            }
        }
    }
}
