//! Error types for the Snake simulation

use thiserror::Error;

/// Errors raised by the simulation and its environment wrapper
#[derive(Error, Debug)]
pub enum SnakeError {
    /// Action index outside the discrete action space
    #[error("invalid action {action}: expected an index in 0..{num_actions}")]
    InvalidAction { action: usize, num_actions: usize },

    /// Internal consistency failure; the episode data can no longer be trusted
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration rejected by validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Batched call received the wrong number of items
    #[error("batch size mismatch: expected {expected}, got {actual}")]
    BatchMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SnakeError>;
