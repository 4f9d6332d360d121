use smallvec::SmallVec;

use crate::animation::FrameAction;

/// A keyframe. `time` is the cumulative time, in seconds since the animation started, at which it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    time: f32,
    action: FrameAction,
}

impl AnimationFrame {
    pub fn new(time: f32, action: FrameAction) -> Self {
        Self { time, action }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn action(&self) -> &FrameAction {
        &self.action
    }
}

/// A named sequence of timed frames.
///
/// An animation is finished once every frame has fired. A repeating animation restarts on the
/// next advance after finishing; a non-repeating one stays finished until reset. An atomic
/// animation cannot be interrupted by the animator until it has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    name: String,
    frames: SmallVec<[AnimationFrame; 4]>,
    index: usize,
    time: f32,
    frames_completed: usize,
    repeat: bool,
    atomic: bool,
}

impl Animation {
    pub fn new(name: impl Into<String>, frames: impl IntoIterator<Item = AnimationFrame>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into_iter().collect(),
            index: 0,
            time: 0.0,
            frames_completed: 0,
            repeat: true,
            atomic: false,
        }
    }

    /// An animation with no frames. It is finished from the start.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, [])
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repeats(&self) -> bool {
        self.repeat
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn frame(&self) -> Option<&AnimationFrame> {
        self.frames.get(self.index)
    }

    pub fn frames_completed(&self) -> usize {
        self.frames_completed
    }

    pub fn elapsed(&self) -> f32 {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        self.frames_completed >= self.frames.len()
    }

    /// Moves the cursor to `index`, wrapping into range. Negative indices count from the end.
    pub fn set_frame_index(&mut self, index: isize) {
        let len = self.frames.len() as isize;
        self.index = if len == 0 { 0 } else { index.rem_euclid(len) as usize };
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.time = 0.0;
        self.frames_completed = 0;
    }

    /// Advances time by `dt` and returns the action of the frame that fired, if one did.
    ///
    /// At most one frame fires per call.
    pub fn advance(&mut self, dt: f32) -> Option<FrameAction> {
        self.time += dt;

        if self.is_finished() && self.repeat {
            self.reset();
        }
        if self.is_finished() {
            return None;
        }

        let frame = self.frames.get(self.index)?;
        if self.time < frame.time {
            return None;
        }

        let action = frame.action.clone();
        self.frames_completed += 1;
        self.set_frame_index(self.index as isize + 1);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_frame_index_wraps() {
        let mut animation = Animation::new(
            "three",
            (1..=3).map(|i| AnimationFrame::new(i as f32, FrameAction::Noop)),
        );
        animation.set_frame_index(4);
        assert_eq!(animation.frame_index(), 1);
        animation.set_frame_index(-1);
        assert_eq!(animation.frame_index(), 2);
    }

    #[test]
    fn test_empty_animation_is_finished() {
        let mut animation = Animation::empty("idle");
        assert!(animation.is_finished());
        assert_eq!(animation.advance(1.0), None);
        assert_eq!(animation.frame_index(), 0);
    }
}
