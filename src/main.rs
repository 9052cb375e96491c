mod classifier;
mod config;
mod dispatcher;
mod engine;
mod features;
mod sink;
mod source;
mod types;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;

use crate::{config::EngineConfig, engine::Engine, source::ReplaySource};

/// Hand-gesture cursor, scroll and media-key control engine.
#[derive(Debug, Parser)]
#[command(name = "airctl")]
struct Args {
    /// TOML file with thresholds, cooldowns and smoothing. Defaults
    /// apply for anything unset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded landmark log (one JSON object per line) to play in
    /// place of a live hand tracker.
    #[arg(long)]
    replay: PathBuf,

    /// Replay pacing in milliseconds per frame.
    #[arg(long, default_value_t = 33)]
    frame_interval_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let replay = ReplaySource::open(
        &args.replay,
        Duration::from_millis(args.frame_interval_ms),
    )?;
    let (frame_rx, source_handle) = source::start_source(replay);

    let engine = build_engine(config)?;
    let engine_handle = engine::start_engine(engine, frame_rx);
    log::info!("gesture control engine started");

    // The loop runs until the replay log drains; the engine sees the
    // disconnect and stops after finishing its in-flight frame.
    let _ = source_handle.join();
    engine_handle.stop();

    Ok(())
}

#[cfg(feature = "sink-enigo")]
fn build_engine(config: EngineConfig) -> Result<Engine<sink::EnigoSink>> {
    Ok(Engine::new(config, sink::EnigoSink::new()?))
}

#[cfg(not(feature = "sink-enigo"))]
fn build_engine(config: EngineConfig) -> Result<Engine<sink::LogSink>> {
    Ok(Engine::new(config, sink::LogSink))
}
