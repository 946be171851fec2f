//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it through `GameState::tick` and `GameState::set_direction`.

pub mod config;
pub mod direction;
pub mod engine;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::TickOutcome;
pub use spawner::FoodSpawner;
pub use state::{GameOverReason, GameState, Position, Snake};
