//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Randomness is confined to the engine's seeded generator, so every rule here is
//! reproducible from a seed and an action sequence.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod reward;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{GameConfig, ObservationMode, RewardConfig};
pub use engine::{GameEngine, SCORE_PER_FOOD, Transition};
pub use food::spawn_food;
pub use reward::RewardFunction;
pub use state::{CollisionType, EpisodeStatus, GameState, Position, Snake};
