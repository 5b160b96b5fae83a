use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rl_snake::game::{GameConfig, ObservationMode};
use rl_snake::modes::{PolicyKind, RolloutConfig, RolloutMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rl_snake")]
#[command(version, about = "Snake simulation as a reinforcement learning environment")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "rollout")]
    mode: Mode,

    /// JSON game config; other flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Number of episodes to run
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Policy choosing the actions
    #[arg(long, default_value = "greedy")]
    policy: Policy,

    /// Seed for food placement and the policy
    #[arg(long)]
    seed: Option<u64>,

    /// Use the local vision observation with this radius
    #[arg(long)]
    vision_radius: Option<usize>,

    /// Truncate episodes after this many steps
    #[arg(long)]
    max_steps: Option<u32>,

    /// End an episode after this many steps without food
    #[arg(long)]
    starvation_limit: Option<u32>,

    /// Print the grid after every step
    #[arg(long)]
    render: bool,

    /// Log statistics every N episodes
    #[arg(long, default_value = "10")]
    log_frequency: usize,

    /// Log filter (e.g. "debug"); falls back to RUST_LOG, then "info"
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Run a baseline policy and report episode statistics
    Rollout,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// Uniformly random actions
    Random,
    /// Head for the food while avoiding immediate collisions
    Greedy,
}

impl From<Policy> for PolicyKind {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Random => PolicyKind::Random,
            Policy::Greedy => PolicyKind::Greedy,
        }
    }
}

impl Cli {
    /// Build the game configuration from the config file and flag overrides
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::read_json_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(radius) = self.vision_radius {
            config.observation = ObservationMode::LocalVision { radius };
        }
        if self.max_steps.is_some() {
            config.max_episode_steps = self.max_steps;
        }
        if self.starvation_limit.is_some() {
            config.starvation_limit = self.starvation_limit;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let game_config = cli.game_config()?;

    match cli.mode {
        Mode::Rollout => {
            let mut config = RolloutConfig::new(cli.episodes, cli.policy.into());
            config.game_config = game_config;
            config.seed = cli.seed;
            config.render = cli.render;
            config.log_frequency = cli.log_frequency;

            let mut rollout = RolloutMode::new(config)?;
            let stats = rollout.run()?;

            println!("\nRollout complete!");
            println!("{}", stats.format_summary());
        }
    }

    Ok(())
}
