//! Start-time configuration constants for the simulation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FRAME_RATE, MAX_TILE_SIZE, PLAYER_SPEED, TILE_SIZE};

/// Configuration fixed when the simulation starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Side length of a tile in world pixels.
    pub tile_size: u32,
    /// Distance travelled by the player per accepted step.
    pub player_speed: f32,
    /// Simulation steps per second.
    pub frame_rate: u32,
}

impl SimulationConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(tile_size: u32, player_speed: f32, frame_rate: u32) -> Self {
        Self {
            tile_size,
            player_speed,
            frame_rate,
        }
    }

    /// Checks that every value can drive a simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.tile_size > MAX_TILE_SIZE {
            return Err(ConfigError::TileSizeTooLarge {
                tile_size: self.tile_size,
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if !self.player_speed.is_finite() || self.player_speed <= 0.0 {
            return Err(ConfigError::InvalidPlayerSpeed {
                speed: self.player_speed,
            });
        }
        Ok(())
    }

    /// Simulated time covered by a single step.
    ///
    /// A zero frame rate yields [`Duration::ZERO`]; [`Self::validate`] rejects it.
    #[must_use]
    pub fn step_duration(&self) -> Duration {
        if self.frame_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(1) / self.frame_rate
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(TILE_SIZE, PLAYER_SPEED, FRAME_RATE)
    }
}

/// Reasons a [`SimulationConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Tiles must have a positive size.
    #[error("tile_size must be positive")]
    ZeroTileSize,
    /// Tiles must not exceed [`MAX_TILE_SIZE`].
    #[error("tile_size must not exceed {max} (received {tile_size})", max = MAX_TILE_SIZE)]
    TileSizeTooLarge {
        /// Rejected tile size.
        tile_size: u32,
    },
    /// The loop must run at a positive rate.
    #[error("frame_rate must be positive")]
    ZeroFrameRate,
    /// The player must move a positive, finite distance per step.
    #[error("player_speed must be positive and finite (received {speed})")]
    InvalidPlayerSpeed {
        /// Rejected speed.
        speed: f32,
    },
}
