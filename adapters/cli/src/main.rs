#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Overworld experience.

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use overworld_core::TileMap;
use overworld_rendering::{LoopControl, Palette, Presentation, RenderingBackend};
use overworld_rendering_macroquad::MacroquadBackend;
use overworld_simulation::{Simulation, StepOutcome};
use overworld_world::{default_npcs, DEFAULT_MAP};

use self::config::{load_config, load_map, ConfigOverrides};

/// Title of the created window.
const WINDOW_TITLE: &str = "Overworld";
/// Window size in screen pixels.
const WINDOW_SIZE: (u32, u32) = (640, 480);

/// Command-line arguments for the Overworld binary.
#[derive(Debug, Parser)]
#[command(name = "overworld", version, about = "Walk around a tile-based town.")]
struct CliArgs {
    /// Map file made of `B` (wall), `.` (floor) and `P` (spawn) rows.
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,
    /// TOML file providing `tile_size`, `player_speed` and `frame_rate`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Side length of a tile in pixels.
    #[arg(long, value_name = "PIXELS")]
    tile_size: Option<u32>,
    /// Distance the player travels per simulation step.
    #[arg(long, value_name = "PIXELS")]
    player_speed: Option<f32>,
    /// Simulation steps per second.
    #[arg(long, value_name = "HZ")]
    frame_rate: Option<u32>,
    /// Render as fast as possible instead of synchronising with the display.
    #[arg(long)]
    no_vsync: bool,
    /// Print frame timing statistics once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Overworld command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let overrides = ConfigOverrides {
        tile_size: args.tile_size,
        player_speed: args.player_speed,
        frame_rate: args.frame_rate,
    };
    let config = load_config(args.config.as_deref(), overrides)?;

    let (map, npcs) = match args.map.as_deref() {
        Some(path) => (load_map(path)?, Vec::new()),
        None => (
            TileMap::parse(DEFAULT_MAP).context("built-in town map is malformed")?,
            default_npcs(),
        ),
    };

    let mut simulation = Simulation::new(config, Arc::new(map), npcs)
        .context("failed to build the simulation")?;
    let presentation = Presentation::new(
        WINDOW_TITLE,
        WINDOW_SIZE,
        config.frame_rate,
        Palette::default(),
        simulation.scene(),
    )?;

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps);

    backend.run(presentation, move |input, scene| {
        match simulation
            .step(input.events)
            .context("simulation step failed")?
        {
            StepOutcome::Continue(next) => {
                *scene = next;
                Ok(LoopControl::Continue)
            }
            StepOutcome::Quit => Ok(LoopControl::Exit),
        }
    })?;

    info!("goodbye");
    Ok(())
}
