//! Sound effects and the sink they are played through.
//!
//! Playback itself belongs to the host (the browser's audio elements, a mixer, ...). The engine
//! only decides which sound plays and how loud.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use strum_macros::Display;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Sound {
    Start,
    Pause,
    Coin,
    Death,
    Teleport,
}

/// Host-side audio output.
pub trait AudioSink {
    fn play(&mut self, sound: Sound, volume: f32);

    fn stop_all(&mut self);
}

/// Discards every sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, sound: Sound, volume: f32) {
        trace!(%sound, volume, "Sound dropped");
    }

    fn stop_all(&mut self) {}
}

/// Remembers what was played. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    played: Rc<RefCell<Vec<(Sound, f32)>>>,
    stops: Rc<Cell<usize>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<(Sound, f32)> {
        self.played.borrow().clone()
    }

    pub fn count(&self, sound: Sound) -> usize {
        self.played.borrow().iter().filter(|(s, _)| *s == sound).count()
    }

    /// How many times playback was stopped.
    pub fn stop_count(&self) -> usize {
        self.stops.get()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound, volume: f32) {
        self.played.borrow_mut().push((sound, volume));
    }

    fn stop_all(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}
