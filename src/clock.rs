//! Frame clock: scaled delta time with a pausable time scale.

use std::time::Duration;

use bevy_ecs::resource::Resource;

use crate::constants::MAX_FRAME_DELTA;

/// Time source shared by every system of a scene.
///
/// Deltas are in seconds. A scale of `0.0` freezes time, which is how a scene is paused.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Clock {
    delta: f32,
    elapsed: f32,
    scale: f32,
    max_delta: f32,
    last: Option<Duration>,
    frames: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            scale: 1.0,
            max_delta: MAX_FRAME_DELTA,
            last: None,
            frames: 0,
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the upper bound applied to a single tick's delta.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Anchors the clock at `now` without producing a delta.
    pub fn init(&mut self, now: Duration) {
        self.last = Some(now);
        self.delta = 0.0;
    }

    /// Derives this frame's delta from the host timestamp `now`.
    ///
    /// The first tick after construction yields a zero delta. Timestamps that go backwards are
    /// treated as zero elapsed time.
    pub fn tick(&mut self, now: Duration) {
        let raw = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        self.advance(raw);
    }

    /// Advances by an explicit unscaled delta, in seconds.
    pub fn advance(&mut self, raw_delta: f32) {
        self.delta = (raw_delta.max(0.0) * self.scale).min(self.max_delta);
        self.elapsed += self.delta;
        self.frames += 1;
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    pub fn is_frozen(&self) -> bool {
        self.scale == 0.0
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
