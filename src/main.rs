use std::path::PathBuf;

use clap::Parser;
use pacman_engine::app::{App, AppOptions};
use pacman_engine::formatter::FrameFormatter;
use pacman_engine::input::Key;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Runs a Pac-Man level headlessly, optionally feeding it a scripted key sequence.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the level JSON file
    level: PathBuf,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Comma-separated keys to press, e.g. `up,left,left,p`
    #[arg(long, value_delimiter = ',')]
    keys: Vec<Key>,

    /// Frames between scripted key presses
    #[arg(long, default_value_t = 30)]
    key_interval: u64,

    /// Pace frames against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Start with audio muted
    #[arg(long)]
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(cfg!(not(target_os = "emscripten")))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .event_format(FrameFormatter)
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let mut app = App::new(
        &cli.level,
        AppOptions {
            max_frames: cli.frames,
            keys: cli.keys,
            key_interval: cli.key_interval,
            realtime: cli.realtime,
            muted: cli.mute,
        },
    )?;

    let state = app.run_to_end()?;
    info!(%state, frames = app.frame(), draw_calls = app.backend().draw_calls(), "Finished");
    Ok(())
}
