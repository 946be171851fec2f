//! Grid Snake - the classic Snake game in a terminal
//!
//! This library provides:
//! - Core game logic: tick, steering, collisions and food placement (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Per-session statistics (metrics module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
