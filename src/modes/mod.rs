pub mod rollout;

pub use rollout::{
    DEFAULT_MAX_EPISODE_STEPS, EpisodeOutcome, PolicyKind, RolloutConfig, RolloutMode,
    RolloutPolicy,
};
