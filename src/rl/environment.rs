use serde::{Deserialize, Serialize};
use tracing::debug;

use super::observation::ObservationEncoder;
use crate::error::{Result, SnakeError};
use crate::game::{Action, EpisodeStatus, GameConfig, GameEngine, GameState};
use crate::render::render_text;

/// Core trait for RL environments
///
/// Mirrors the gym contract: `reset` starts an episode, `step` advances it
/// by one action and reports termination and truncation separately.
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Reset the environment, optionally reseeding it
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Observation, StepInfo)>;

    /// Step the environment with an action
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>>;

    /// Get the observation space
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space
    fn action_space(&self) -> SpaceInfo;

    /// Text snapshot of the current state, if the environment supports one
    fn render(&self) -> Option<String> {
        None
    }

    /// Release any resources held by the environment
    fn close(&mut self) {}
}

/// Result of an environment step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward received
    pub reward: f32,

    /// Whether the episode reached a game-over condition
    pub terminated: bool,

    /// Whether the episode was cut off by the step limit
    pub truncated: bool,

    /// Additional info
    pub info: StepInfo,
}

impl<O> StepResult<O> {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Declared shape of an action or observation space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaceInfo {
    /// Discrete space with n options
    Discrete(usize),

    /// Bounded real vector
    Box {
        low: f32,
        high: f32,
        shape: Vec<usize>,
    },
}

/// Per-step information reported alongside the observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub score: u32,
    pub steps: u32,
    pub snake_length: usize,
    pub status: EpisodeStatus,
}

impl StepInfo {
    fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            steps: state.steps,
            snake_length: state.snake.len(),
            status: state.status,
        }
    }
}

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and provides the gym-style interface with:
/// - Vector observations from the configured [`ObservationEncoder`]
/// - Discrete action space (4 actions: Up, Right, Down, Left)
/// - Optional step limit reported as truncation
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
    encoder: ObservationEncoder,
    max_episode_steps: Option<u32>,
}

impl SnakeEnvironment {
    /// Create a new Snake environment; the config is validated first
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let encoder = ObservationEncoder::from(config.observation);
        let max_episode_steps = config.max_episode_steps;
        let mut engine = GameEngine::new(config);
        let state = engine.reset(None)?;

        Ok(Self {
            engine,
            state,
            encoder,
            max_episode_steps,
        })
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> Vec<f32> {
        self.encoder.encode(&self.state)
    }

    pub fn info(&self) -> StepInfo {
        StepInfo::from_state(&self.state)
    }

    pub fn encoder(&self) -> ObservationEncoder {
        self.encoder
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Get reference to current game state (for testing/debugging)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the current state, e.g. to replay a scenario
    ///
    /// The state must satisfy the game invariants and match the configured
    /// grid; it is rejected otherwise.
    pub fn set_state(&mut self, state: GameState) -> Result<()> {
        let config = self.engine.config();
        if state.grid_width != config.grid_width || state.grid_height != config.grid_height {
            return Err(SnakeError::InvariantViolation(format!(
                "state grid {}x{} does not match configured {}x{}",
                state.grid_width, state.grid_height, config.grid_width, config.grid_height
            )));
        }
        state.check_invariants()?;
        self.state = state;
        Ok(())
    }

    fn apply_step_limit(&mut self) {
        if let Some(limit) = self.max_episode_steps {
            if self.state.is_alive() && self.state.steps >= limit {
                self.state.status = EpisodeStatus::Truncated;
                debug!(steps = self.state.steps, score = self.state.score, "episode truncated");
            }
        }
    }
}

impl Environment for SnakeEnvironment {
    type Observation = Vec<f32>;
    type Action = usize;

    /// Reset the environment and return initial observation
    fn reset(&mut self, seed: Option<u64>) -> Result<(Vec<f32>, StepInfo)> {
        self.state = self.engine.reset(seed)?;
        Ok((self.observation(), self.info()))
    }

    /// Step the environment with a discrete action
    ///
    /// Actions:
    /// - 0: Up
    /// - 1: Right
    /// - 2: Down
    /// - 3: Left
    ///
    /// Any other index is an `InvalidAction` error and leaves the state untouched.
    fn step(&mut self, action: usize) -> Result<StepResult<Vec<f32>>> {
        let action = Action::try_from(action)?;
        let transition = self.engine.step(&mut self.state, action)?;
        self.apply_step_limit();

        Ok(StepResult {
            observation: self.observation(),
            reward: transition.reward,
            terminated: self.state.status.is_terminated(),
            truncated: self.state.status.is_truncated(),
            info: self.info(),
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo::Box {
            low: 0.0,
            high: 1.0,
            shape: vec![self.encoder.size()],
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo::Discrete(Action::COUNT)
    }

    fn render(&self) -> Option<String> {
        Some(render_text(&self.state))
    }
}
