//! Reinforcement learning environment for Snake game
//!
//! Provides:
//! - Fixed-length feature observations (11 features or a local vision window)
//! - Gym-style environment interface with termination and truncation
//! - A pool of independent environments stepped in parallel
//! - Conversion of observations into Burn tensors

pub mod backend;
pub mod environment;
pub mod observation;
pub mod pool;

pub use backend::{InferenceBackend, default_device, observation_batch, observation_tensor};
pub use environment::{Environment, SnakeEnvironment, SpaceInfo, StepInfo, StepResult};
pub use observation::{FEATURE_COUNT, ObservationEncoder};
pub use pool::EnvPool;
