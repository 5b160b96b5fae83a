//! Pool of independent Snake environments stepped in parallel
//!
//! Each environment owns its own state and random source; the pool only
//! fans calls out across them with Rayon. Environment `i` is seeded with
//! `base_seed + i` (wrapping), so a pool replays exactly for a fixed base seed.
//!
//! # Example
//!
//! ```rust
//! use rl_snake::game::GameConfig;
//! use rl_snake::rl::EnvPool;
//!
//! let mut pool = EnvPool::new(GameConfig::small(), 4, 0).unwrap();
//! let observations = pool.reset().unwrap();
//! assert_eq!(observations.len(), 4);
//!
//! let results = pool.step(&[0, 1, 2, 3]).unwrap();
//! assert_eq!(results.len(), 4);
//! ```

use rayon::prelude::*;

use super::environment::{Environment, SnakeEnvironment, SpaceInfo, StepResult};
use crate::error::{Result, SnakeError};
use crate::game::GameConfig;

/// A pool of environments for parallel execution
pub struct EnvPool {
    envs: Vec<SnakeEnvironment>,
    base_seed: u64,
    /// Episodes started per environment, used to derive fresh reset seeds
    episodes: Vec<u64>,
}

impl EnvPool {
    /// Create `num_envs` environments from one config
    pub fn new(config: GameConfig, num_envs: usize, base_seed: u64) -> Result<Self> {
        if num_envs == 0 {
            return Err(SnakeError::InvalidConfig(
                "an environment pool needs at least one environment".to_string(),
            ));
        }

        let envs = (0..num_envs)
            .map(|i| {
                let seed = base_seed.wrapping_add(i as u64);
                SnakeEnvironment::new(config.clone().with_seed(seed))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            envs,
            base_seed,
            episodes: vec![0; num_envs],
        })
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    pub fn observation_space(&self) -> SpaceInfo {
        self.envs[0].observation_space()
    }

    pub fn action_space(&self) -> SpaceInfo {
        self.envs[0].action_space()
    }

    pub fn envs(&self) -> &[SnakeEnvironment] {
        &self.envs
    }

    /// Seed for the next episode of environment `env_id`
    fn next_seed(&mut self, env_id: usize) -> u64 {
        let episode = self.episodes[env_id];
        self.episodes[env_id] += 1;
        // Interleave so that no two environments ever share a seed
        self.base_seed
            .wrapping_add(episode.wrapping_mul(self.envs.len() as u64))
            .wrapping_add(env_id as u64)
    }

    /// Reset all environments in parallel
    pub fn reset(&mut self) -> Result<Vec<Vec<f32>>> {
        let seeds: Vec<u64> = (0..self.envs.len()).map(|i| self.next_seed(i)).collect();

        self.envs
            .par_iter_mut()
            .zip(seeds.par_iter())
            .map(|(env, &seed)| env.reset(Some(seed)).map(|(obs, _)| obs))
            .collect()
    }

    /// Reset a specific environment by index
    pub fn reset_env(&mut self, env_id: usize) -> Result<Vec<f32>> {
        if env_id >= self.envs.len() {
            return Err(SnakeError::BatchMismatch {
                expected: self.envs.len(),
                actual: env_id + 1,
            });
        }
        let seed = self.next_seed(env_id);
        self.envs[env_id].reset(Some(seed)).map(|(obs, _)| obs)
    }

    /// Step all environments in parallel with given actions
    ///
    /// Fails without stepping anything if the number of actions differs
    /// from the number of environments.
    pub fn step(&mut self, actions: &[usize]) -> Result<Vec<StepResult<Vec<f32>>>> {
        if actions.len() != self.envs.len() {
            return Err(SnakeError::BatchMismatch {
                expected: self.envs.len(),
                actual: actions.len(),
            });
        }

        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, &action)| env.step(action))
            .collect()
    }

    /// Step all environments, resetting those whose episode ended
    ///
    /// The returned results still describe the finished episodes; the
    /// second vector holds the first observation of each replacement
    /// episode (`None` where no reset happened).
    pub fn step_auto_reset(
        &mut self,
        actions: &[usize],
    ) -> Result<(Vec<StepResult<Vec<f32>>>, Vec<Option<Vec<f32>>>)> {
        let results = self.step(actions)?;
        let mut resets = Vec::with_capacity(results.len());

        for (env_id, result) in results.iter().enumerate() {
            if result.done() {
                resets.push(Some(self.reset_env(env_id)?));
            } else {
                resets.push(None);
            }
        }

        Ok((results, resets))
    }
}
