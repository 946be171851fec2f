use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(usize),
    #[error("grid size {0} does not fit in screen coordinates")]
    GridTooLarge(usize),
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("cell width must be greater than zero")]
    ZeroCellWidth,
    #[error("food margin {margin} leaves no spawnable cell on a {grid_size}x{grid_size} grid")]
    MarginTooWide { margin: usize, grid_size: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square grid, in cells
    pub grid_size: usize,
    /// Time between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Terminal columns used to draw one cell (rendering only)
    pub cell_width: u16,
    /// Cells excluded from food placement along every edge of the grid
    pub food_margin: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_interval_ms: 100,
            cell_width: 2,
            food_margin: 0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values. The result is not validated, callers may still
    /// override fields before calling `validate`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if i32::try_from(self.grid_size).is_err() {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }
        if self.food_margin.saturating_mul(2) >= self.grid_size {
            return Err(ConfigError::MarginTooWide {
                margin: self.food_margin,
                grid_size: self.grid_size,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Coordinates food may be placed on, identical for both axes
    pub fn spawn_range(&self) -> Range<i32> {
        let size = self.grid_size as i32;
        let margin = self.food_margin as i32;
        margin..(size - margin)
    }
}
