use super::config::RewardConfig;
use super::state::{EpisodeStatus, GameState};

/// Scalar reward for one transition
///
/// A pure function of the state before and after the move: terminal outcomes
/// map to fixed constants, eating maps to the food reward, and any other move
/// pays the step penalty plus an optional distance shaping term.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardFunction {
    config: RewardConfig,
}

impl RewardFunction {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn compute(&self, before: &GameState, after: &GameState, ate_food: bool) -> f32 {
        match after.status {
            EpisodeStatus::Collision(_) => self.config.death_penalty,
            EpisodeStatus::Starved => self.config.starvation_penalty,
            EpisodeStatus::BoardFilled => self.config.board_filled_reward,
            EpisodeStatus::Alive | EpisodeStatus::Truncated => {
                if ate_food {
                    self.config.food_reward
                } else {
                    self.config.step_penalty + self.distance_shaping(before, after)
                }
            }
        }
    }

    /// `k * (prev_dist - new_dist)` towards the food both states share
    fn distance_shaping(&self, before: &GameState, after: &GameState) -> f32 {
        if self.config.distance_shaping == 0.0 {
            return 0.0;
        }

        match (before.food, after.food) {
            (Some(food), Some(same)) if food == same => {
                let prev = before.snake.head().manhattan_distance(food);
                let now = after.snake.head().manhattan_distance(food);
                self.config.distance_shaping * (prev - now) as f32
            }
            _ => 0.0,
        }
    }
}
