use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use super::food::FoodPlacement;

/// Largest accepted board side
pub const MAX_GRID_SIDE: usize = 1024;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Time between simulation ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Upper bound on buffered turns; extra key presses are dropped
    pub max_queued_turns: usize,
    /// Food placement algorithm
    pub food_placement: FoodPlacement,
    /// Fixed RNG seed for reproducible games. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            tick_interval_ms: 100,
            max_queued_turns: 3,
            food_placement: FoodPlacement::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Same configuration with a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Check that the configuration describes a playable board
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_GRID_SIDE).contains(&self.grid_width),
            "grid_width must be between 1 and {MAX_GRID_SIDE}, got {}",
            self.grid_width
        );
        ensure!(
            (1..=MAX_GRID_SIDE).contains(&self.grid_height),
            "grid_height must be between 1 and {MAX_GRID_SIDE}, got {}",
            self.grid_height
        );
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        ensure!(
            self.max_queued_turns >= 1,
            "max_queued_turns must be at least 1"
        );
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
