#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Chase session.

mod config;
mod simulation;
mod text;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use maze_chase_rendering::RenderingBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::SimulationConfig, simulation::Simulation, text::TextBackend};

/// Run a Maze Chase simulation and print the maze as text.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version)]
struct Args {
    /// TOML file with tuning, schedules and scripted input.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long)]
    frames: Option<u64>,
    /// Print the maze every N frames; 0 prints only the final frame.
    #[arg(long)]
    dump_every: Option<u64>,
    /// Log filter such as `debug` or `maze_chase_world=trace`. Defaults to
    /// `RUST_LOG`, then `info`.
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(dump_every) = args.dump_every {
        config.dump_every = dump_every;
    }

    let mut simulation = Simulation::new(&config).context("failed to build the world")?;
    let presentation = simulation.presentation()?;
    let backend = TextBackend::new(io::stdout().lock(), config.frames, config.dump_every);
    backend.run(presentation, |input, scene| simulation.frame(input, scene))?;

    let summary = simulation.summary();
    info!(
        frames = summary.frames,
        score = summary.score,
        catches = summary.catches,
        cleared = summary.cleared,
        "simulation finished"
    );
    Ok(())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log level `{level}`"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
