//! RL Snake - A Snake simulation exposed as a reinforcement learning environment
//!
//! This library provides:
//! - Core game logic and transition rules (game module)
//! - Gym-style environment, observation encoders and a parallel pool (rl module)
//! - Plain-text rendering of a game state (render module)
//! - Episode statistics (metrics module)
//! - Baseline policy rollouts (modes module)

pub mod error;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;

pub use error::{Result, SnakeError};
