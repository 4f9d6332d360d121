use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, event, info, Level};

use crate::audio::AudioSink;
use crate::constants::LOOP_TIME;
use crate::error::GameResult;
use crate::game::{Scene, SceneState};
use crate::graphics::headless::RecordingBackend;
use crate::input::Key;
use crate::map::builder::load_pacman_scene;
use crate::map::level::LevelData;
use crate::platform;

/// Simulated timestamp of `frame` on the fixed 60 Hz loop.
pub fn frame_time(frame: u64) -> Duration {
    LOOP_TIME.mul_f64(frame as f64)
}

/// How the headless host drives a scene.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Stop after this many frames, even if the game has not ended.
    pub max_frames: Option<u64>,
    /// Keys pressed one after another, `key_interval` frames apart.
    pub keys: Vec<Key>,
    pub key_interval: u64,
    /// Pace frames against the wall clock instead of stepping simulated time.
    pub realtime: bool,
    pub muted: bool,
}

/// A windowless host: runs a level at 60 Hz against a recording graphics backend and feeds it
/// a scripted key sequence.
pub struct App {
    scene: Scene,
    backend: RecordingBackend,
    script: VecDeque<(u64, Key)>,
    frame: u64,
    options: AppOptions,
    started: Instant,
}

impl App {
    pub fn new(level_path: &Path, options: AppOptions) -> GameResult<Self> {
        let level = LevelData::from_path(level_path)?;
        info!(path = %level_path.display(), "Loading level");
        Self::from_level(&level, options)
    }

    pub fn from_level(level: &LevelData, options: AppOptions) -> GameResult<Self> {
        let mut backend = RecordingBackend::discarding();
        let mut scene = load_pacman_scene(level, &mut backend)?;
        scene.set_muted(options.muted);

        let interval = options.key_interval.max(1);
        let script = options
            .keys
            .iter()
            .enumerate()
            .map(|(i, &key)| ((i as u64 + 1) * interval, key))
            .collect();

        scene.run(Duration::ZERO)?;
        Ok(Self {
            scene,
            backend,
            script,
            frame: 0,
            options,
            started: Instant::now(),
        })
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.scene.set_audio_sink(sink);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn backend(&self) -> &RecordingBackend {
        &self.backend
    }

    /// Runs one iteration of the loop. Returns `false` once the scene has ended or the frame
    /// limit is reached.
    pub fn run(&mut self) -> GameResult<bool> {
        let start = Instant::now();

        while let Some(&(at, key)) = self.script.front() {
            if at > self.frame {
                break;
            }
            self.script.pop_front();
            debug!(frame = self.frame, %key, "Scripted key");
            self.scene.key_down(key);
        }

        self.frame += 1;
        let now = if self.options.realtime {
            self.started.elapsed()
        } else {
            frame_time(self.frame)
        };

        let state = self.scene.frame(now, &mut self.backend)?;
        if !state.is_live() {
            info!(%state, frame = self.frame, "Scene ended");
            return Ok(false);
        }
        if self.options.max_frames.is_some_and(|max| self.frame >= max) {
            info!(frame = self.frame, "Frame limit reached");
            return Ok(false);
        }

        if self.options.realtime {
            if start.elapsed() < LOOP_TIME {
                let time = LOOP_TIME.saturating_sub(start.elapsed());
                if time != Duration::ZERO {
                    platform::sleep(time);
                }
            } else {
                event!(
                    Level::WARN,
                    "Game loop behind schedule by: {:?}",
                    start.elapsed() - LOOP_TIME
                );
            }
        }

        Ok(true)
    }

    /// Runs until the scene ends or the frame limit is hit. Returns the final state.
    pub fn run_to_end(&mut self) -> GameResult<SceneState> {
        while self.run()? {}
        Ok(self.scene.state())
    }
}
