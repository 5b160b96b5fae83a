//! Rollout mode for baseline policies
//!
//! Runs a fixed policy against the Snake environment for a number of
//! episodes and tracks episode statistics. Useful as a sanity check for the
//! environment and as a reference score for trained agents.
//!
//! # Example
//!
//! ```rust
//! use rl_snake::game::GameConfig;
//! use rl_snake::modes::{PolicyKind, RolloutConfig, RolloutMode};
//!
//! let mut config = RolloutConfig::new(5, PolicyKind::Greedy);
//! config.game_config = GameConfig::small();
//! config.seed = Some(42);
//!
//! let mut rollout = RolloutMode::new(config)?;
//! let stats = rollout.run()?;
//! assert_eq!(stats.total_episodes(), 5);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::game::{Action, EpisodeStatus, GameConfig, GameState};
use crate::metrics::EpisodeStats;
use crate::rl::{Environment, SnakeEnvironment};

/// Step limit applied when the config sets neither a step limit nor a
/// starvation limit, so every episode ends
pub const DEFAULT_MAX_EPISODE_STEPS: u32 = 1000;

/// Built-in policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Uniformly random action each step
    Random,
    /// Move towards the food, avoiding immediate collisions
    Greedy,
}

/// Configuration for rollout mode
#[derive(Debug, Clone)]
pub struct RolloutConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Policy choosing the actions
    pub policy: PolicyKind,

    /// Print a text frame after every step
    pub render: bool,

    /// Log progress every N episodes
    pub log_frequency: usize,

    /// Game configuration (grid size, rewards, observation)
    pub game_config: GameConfig,

    /// Seed for the environment and the policy; entropy when absent
    pub seed: Option<u64>,
}

impl RolloutConfig {
    pub fn new(episodes: usize, policy: PolicyKind) -> Self {
        Self {
            episodes,
            policy,
            render: false,
            log_frequency: 100,
            game_config: GameConfig::default(),
            seed: None,
        }
    }
}

/// Action selection for the built-in policies
pub struct RolloutPolicy {
    kind: PolicyKind,
    rng: StdRng,
}

impl RolloutPolicy {
    pub fn new(kind: PolicyKind, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { kind, rng }
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    /// Pick an action index for the given state
    pub fn select_action(&mut self, state: &GameState) -> usize {
        match self.kind {
            PolicyKind::Random => self.random_action(),
            PolicyKind::Greedy => self
                .greedy_action(state)
                .map(Action::index)
                .unwrap_or_else(|| self.random_action()),
        }
    }

    fn random_action(&mut self) -> usize {
        self.rng.gen_range(0..Action::COUNT)
    }

    /// Safe action that brings the head closest to the food
    ///
    /// Returns `None` when every action collides. Ties go to the first
    /// action in `Action::ALL` order.
    fn greedy_action(&self, state: &GameState) -> Option<Action> {
        let head = state.snake.head();
        let heading = state.snake.direction;

        Action::ALL
            .into_iter()
            .filter_map(|action| {
                // A reversal keeps the current heading
                let mut direction = action.direction();
                if state.snake.len() > 1 && heading.is_opposite(direction) {
                    direction = heading;
                }

                let next = head.moved_in_direction(direction);
                if state.collision_at(next).is_some() {
                    return None;
                }

                let distance = state.food.map_or(0, |food| next.manhattan_distance(food));
                Some((action, distance))
            })
            .min_by_key(|&(_, distance)| distance)
            .map(|(action, _)| action)
    }
}

/// Outcome of a single rollout episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    pub reward: f32,
    pub steps: usize,
    pub score: u32,
    pub status: EpisodeStatus,
}

/// Rollout mode
///
/// Plays episodes with a [`RolloutPolicy`] and records an
/// [`EpisodeStats`] summary.
pub struct RolloutMode {
    env: SnakeEnvironment,
    policy: RolloutPolicy,
    stats: EpisodeStats,
    config: RolloutConfig,
}

impl RolloutMode {
    /// Create a rollout; fails if the game config is invalid
    pub fn new(mut config: RolloutConfig) -> Result<Self> {
        let game_config = &mut config.game_config;
        if let Some(seed) = config.seed {
            game_config.seed = Some(seed);
        }
        if game_config.max_episode_steps.is_none() && game_config.starvation_limit.is_none() {
            warn!(
                limit = DEFAULT_MAX_EPISODE_STEPS,
                "no step or starvation limit configured, applying default step limit"
            );
            game_config.max_episode_steps = Some(DEFAULT_MAX_EPISODE_STEPS);
        }

        let env = SnakeEnvironment::new(game_config.clone())
            .context("Failed to create Snake environment")?;
        let policy = RolloutPolicy::new(config.policy, config.seed.map(|s| s.wrapping_add(1)));

        Ok(Self {
            env,
            policy,
            stats: EpisodeStats::new(100),
            config,
        })
    }

    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Run all configured episodes and return the final statistics
    pub fn run(&mut self) -> Result<EpisodeStats> {
        let game = &self.config.game_config;
        info!(
            episodes = self.config.episodes,
            policy = ?self.config.policy,
            width = game.grid_width,
            height = game.grid_height,
            observation = ?game.observation,
            "starting rollout"
        );

        let log_frequency = self.config.log_frequency.max(1);

        for episode in 0..self.config.episodes {
            let outcome = self
                .run_episode(episode)
                .with_context(|| format!("Episode {} failed", episode + 1))?;

            self.stats
                .record_episode(outcome.reward, outcome.steps, outcome.score, outcome.status);

            if (episode + 1) % log_frequency == 0 {
                info!(
                    "[Episode {}/{}] {}",
                    episode + 1,
                    self.config.episodes,
                    self.stats.format_summary()
                );
            }
        }

        Ok(self.stats.clone())
    }

    /// Play one episode to termination or truncation
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeOutcome> {
        let seed = self.config.seed.map(|s| s.wrapping_add(episode as u64));
        self.env.reset(seed)?;
        self.draw_frame();

        let mut reward = 0.0;
        let mut steps = 0;

        loop {
            let action = self.policy.select_action(self.env.state());
            let result = self.env.step(action)?;

            reward += result.reward;
            steps += 1;
            self.draw_frame();

            if result.done() {
                debug!(episode, steps, score = result.info.score, status = ?result.info.status, "episode finished");
                return Ok(EpisodeOutcome {
                    reward,
                    steps,
                    score: result.info.score,
                    status: result.info.status,
                });
            }
        }
    }

    fn draw_frame(&self) {
        if self.config.render {
            if let Some(frame) = self.env.render() {
                println!("{frame}\n");
            }
        }
    }
}
