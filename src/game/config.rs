use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SnakeError};

/// Reward constants for the RL signal
///
/// The shaping coefficient multiplies the per-step change in Manhattan
/// distance to food, which is always exactly one cell on a non-eating move,
/// so a shaping term is bounded by `distance_shaping` in magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f32,
    /// Penalty for hitting a wall or the snake's own body
    pub death_penalty: f32,
    /// Penalty for running out of steps without eating
    pub starvation_penalty: f32,
    /// Reward when the snake covers the whole board
    pub board_filled_reward: f32,
    /// Coefficient `k` of the distance shaping term `k * (prev_dist - new_dist)`
    pub distance_shaping: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            food_reward: 10.0,
            step_penalty: -0.01,
            death_penalty: -10.0,
            starvation_penalty: -10.0,
            board_filled_reward: 100.0,
            distance_shaping: 0.0,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.food_reward <= 0.0 {
            return Err(SnakeError::InvalidConfig(format!(
                "food_reward must be positive, got {}",
                self.food_reward
            )));
        }

        if self.death_penalty >= 0.0 {
            return Err(SnakeError::InvalidConfig(format!(
                "death_penalty must be negative, got {}",
                self.death_penalty
            )));
        }

        if self.starvation_penalty > 0.0 {
            return Err(SnakeError::InvalidConfig(format!(
                "starvation_penalty must not be positive, got {}",
                self.starvation_penalty
            )));
        }

        if self.step_penalty > 0.0 {
            return Err(SnakeError::InvalidConfig(format!(
                "step_penalty must not be positive, got {}",
                self.step_penalty
            )));
        }

        if self.board_filled_reward < self.food_reward {
            return Err(SnakeError::InvalidConfig(format!(
                "board_filled_reward ({}) must be at least food_reward ({})",
                self.board_filled_reward, self.food_reward
            )));
        }

        let terminal_scale = self.food_reward.min(-self.death_penalty);
        if self.distance_shaping < 0.0 || self.distance_shaping >= terminal_scale {
            return Err(SnakeError::InvalidConfig(format!(
                "distance_shaping must be in [0, {}), got {}",
                terminal_scale, self.distance_shaping
            )));
        }

        Ok(())
    }
}

/// Which observation encoding the environment produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationMode {
    /// 11 binary features: relative danger, heading, food direction
    #[default]
    Features,
    /// `(2r+1)^2` window around the head plus 4 food-direction flags
    LocalVision { radius: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Reward constants (for RL)
    pub rewards: RewardConfig,
    /// Observation encoding
    pub observation: ObservationMode,

    /// End the episode as starved after this many steps without food
    pub starvation_limit: Option<u32>,
    /// Truncate the episode after this many steps
    pub max_episode_steps: Option<u32>,
    /// Seed for food placement; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 15,
            initial_snake_length: 3,
            rewards: RewardConfig::default(),
            observation: ObservationMode::Features,
            starvation_limit: None,
            max_episode_steps: None,
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

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    /// Default grid with 5x5 local vision (29 features) and distance shaping
    pub fn extended() -> Self {
        Self {
            observation: ObservationMode::LocalVision { radius: 2 },
            rewards: RewardConfig {
                distance_shaping: 0.1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Builder-style seed setter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Load and validate a configuration from a JSON file; missing fields
    /// take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config without validating it, for callers that apply
    /// overrides first
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Check that the board can hold the starting snake and its first food
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(SnakeError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(SnakeError::InvalidConfig(
                "grid dimensions must fit in i32".to_string(),
            ));
        }

        if self.initial_snake_length == 0 {
            return Err(SnakeError::InvalidConfig(
                "initial_snake_length must be at least 1".to_string(),
            ));
        }

        // Body extends left from the centre column
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(SnakeError::InvalidConfig(format!(
                "initial_snake_length {} does not fit left of the centre of a {}-wide grid",
                self.initial_snake_length, self.grid_width
            )));
        }

        if self.initial_snake_length >= self.cell_count() {
            return Err(SnakeError::InvalidConfig(format!(
                "a {}x{} grid has no room for food next to a snake of length {}",
                self.grid_width, self.grid_height, self.initial_snake_length
            )));
        }

        if self.starvation_limit == Some(0) {
            return Err(SnakeError::InvalidConfig(
                "starvation_limit must be at least 1".to_string(),
            ));
        }

        if self.max_episode_steps == Some(0) {
            return Err(SnakeError::InvalidConfig(
                "max_episode_steps must be at least 1".to_string(),
            ));
        }

        if let ObservationMode::LocalVision { radius } = self.observation {
            let limit = self.grid_width.max(self.grid_height);
            if radius > limit {
                return Err(SnakeError::InvalidConfig(format!(
                    "vision radius {radius} exceeds the largest grid dimension {limit}"
                )));
            }
        }

        self.rewards.validate()
    }
}
