//! Snake - a grid snake game
//!
//! This library provides:
//! - Core game-state machine (game module)
//! - Terminal rendering of game snapshots (render module)
//! - Keyboard input mapping (input module)
//! - Session statistics (metrics module)
//! - The interactive terminal host (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
