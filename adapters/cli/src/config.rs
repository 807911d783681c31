//! Start-time configuration and map loading for the command-line adapter.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};
use overworld_core::{SimulationConfig, TileMap};

/// Values supplied on the command line that take precedence over the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ConfigOverrides {
    pub(crate) tile_size: Option<u32>,
    pub(crate) player_speed: Option<f32>,
    pub(crate) frame_rate: Option<u32>,
}

impl ConfigOverrides {
    fn apply(self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(player_speed) = self.player_speed {
            config.player_speed = player_speed;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        config
    }
}

/// Resolves the simulation configuration from defaults, an optional TOML
/// file and command-line overrides, in that order.
pub(crate) fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<SimulationConfig> {
    let base = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config = parse_config(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            info!("loaded configuration from {}", path.display());
            config
        }
        None => SimulationConfig::default(),
    };

    resolve(base, overrides)
}

fn parse_config(text: &str) -> Result<SimulationConfig> {
    toml::from_str(text).context("malformed TOML")
}

fn resolve(base: SimulationConfig, overrides: ConfigOverrides) -> Result<SimulationConfig> {
    let config = overrides.apply(base);
    if let Err(err) = config.validate() {
        warn!("rejecting configuration {config:?}: {err}");
        return Err(err).context("configuration cannot drive the simulation");
    }
    Ok(config)
}

/// Reads a map definition made of `B`, `.` and `P` rows.
pub(crate) fn load_map(path: &Path) -> Result<TileMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file {}", path.display()))?;
    let map: TileMap = text
        .parse()
        .with_context(|| format!("invalid map file {}", path.display()))?;
    info!(
        "loaded {}x{} map from {}",
        map.columns(),
        map.rows(),
        path.display()
    );
    Ok(map)
}
