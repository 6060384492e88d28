//! Core game logic module for Snake
//!
//! This module contains the game-state machine without any I/O or rendering
//! dependencies. Hosts drive it with timed ticks and buffered turns and read
//! it back through snapshots.

pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod state;
pub mod turn_queue;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameState, TickOutcome};
pub use food::FoodPlacement;
pub use state::{CollisionType, Position, RunStatus, Snake, Snapshot};
pub use turn_queue::{TurnQueue, TurnResult};
