//! Episode statistics tracking
//!
//! Rolling averages of episode rewards, lengths and scores, plus running
//! counts of how episodes ended. Kept outside the simulation so that every
//! episode starts from a clean game state.

use std::collections::VecDeque;

use crate::game::{CollisionType, EpisodeStatus};

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use rl_snake::game::EpisodeStatus;
/// use rl_snake::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(15.5, 150, 5, EpisodeStatus::Starved);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.best_score(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode scores (food eaten) (rolling window)
    episode_scores: VecDeque<u32>,

    outcomes: OutcomeCounts,

    total_episodes: usize,
    total_steps: usize,
    best_score: u32,
    worst_score: Option<u32>,

    /// Window size for rolling averages
    window_size: usize,
}

/// How many episodes ended each way
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub wall: usize,
    pub self_collision: usize,
    pub starved: usize,
    pub board_filled: usize,
    pub truncated: usize,
}

impl EpisodeStats {
    /// Create a tracker averaging over the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            outcomes: OutcomeCounts::default(),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            worst_score: None,
            window_size,
        }
    }

    /// Record the completion of an episode
    ///
    /// # Arguments
    ///
    /// * `reward` - Total reward accumulated during the episode
    /// * `length` - Number of steps taken in the episode
    /// * `score` - Final score (number of food items eaten)
    /// * `status` - How the episode ended
    pub fn record_episode(&mut self, reward: f32, length: usize, score: u32, status: EpisodeStatus) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);

        match status {
            EpisodeStatus::Collision(CollisionType::Wall) => self.outcomes.wall += 1,
            EpisodeStatus::Collision(CollisionType::SelfCollision) => {
                self.outcomes.self_collision += 1
            }
            EpisodeStatus::Starved => self.outcomes.starved += 1,
            EpisodeStatus::BoardFilled => self.outcomes.board_filled += 1,
            EpisodeStatus::Truncated => self.outcomes.truncated += 1,
            EpisodeStatus::Alive => {}
        }

        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);
        self.worst_score = Some(self.worst_score.map_or(score, |worst| worst.min(score)));
    }

    /// Get the mean episode reward over the rolling window
    pub fn mean_episode_reward(&self) -> f32 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
        }
    }

    /// Get the mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    /// Get the mean episode score over the rolling window
    pub fn mean_episode_score(&self) -> f32 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_scores.len() as f32
        }
    }

    pub fn outcomes(&self) -> OutcomeCounts {
        self.outcomes
    }

    /// Get the total number of episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Get the total number of environment steps taken
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Highest score over all recorded episodes
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Lowest score over all recorded episodes; `None` before the first
    pub fn worst_score(&self) -> Option<u32> {
        self.worst_score
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Worst: {} | Len: {:.1} | Wall: {} | Self: {} | Starved: {} | Filled: {} | Truncated: {}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.worst_score.unwrap_or(0),
            self.mean_episode_length(),
            self.outcomes.wall,
            self.outcomes.self_collision,
            self.outcomes.starved,
            self.outcomes.board_filled,
            self.outcomes.truncated,
        )
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
