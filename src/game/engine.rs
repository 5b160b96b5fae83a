use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    food::spawn_food,
    reward::RewardFunction,
    state::{EpisodeStatus, GameState, Position, Snake},
};
use crate::error::Result;

/// Score gained per food eaten
pub const SCORE_PER_FOOD: u32 = 1;

/// Outcome of a single engine step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Episode status after the step
    pub status: EpisodeStatus,
}

impl Transition {
    /// Whether the game reached one of its own terminal conditions
    pub fn terminated(&self) -> bool {
        self.status.is_terminated()
    }
}

/// The game engine that handles all game logic
///
/// Owns the only random source in the simulation; food placement draws from
/// it, so a seeded engine replays identical episodes for identical actions.
pub struct GameEngine {
    config: GameConfig,
    rewards: RewardFunction,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rewards: RewardFunction::new(config.rewards.clone()),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn reward_function(&self) -> &RewardFunction {
        &self.rewards
    }

    /// Replace the random source with one seeded from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Reset the game to initial state
    ///
    /// The snake starts at the centre heading right with its body trailing
    /// to the left.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<GameState> {
        if let Some(seed) = seed {
            self.reseed(seed);
        }

        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = spawn_food(
            &snake,
            self.config.grid_width,
            self.config.grid_height,
            &mut self.rng,
        );

        let state = GameState::new(snake, food, self.config.grid_width, self.config.grid_height);
        state.check_invariants()?;

        debug!(food = ?state.food, "episode reset");
        Ok(state)
    }

    /// Execute one step of the game
    ///
    /// A reversal request is ignored while the snake is longer than one
    /// segment. Stepping a finished episode leaves it unchanged and pays 0.
    pub fn step(&mut self, state: &mut GameState, action: Action) -> Result<Transition> {
        if !state.is_alive() {
            return Ok(Transition {
                reward: 0.0,
                ate_food: false,
                status: state.status,
            });
        }

        let before = state.clone();

        let requested = action.direction();
        if state.snake.len() > 1 && state.snake.direction.is_opposite(requested) {
            trace!(heading = ?state.snake.direction, ?requested, "reversal ignored");
        } else {
            state.snake.direction = requested;
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        state.steps = state.steps.saturating_add(1);
        state.steps_since_food = state.steps_since_food.saturating_add(1);

        if let Some(collision) = state.collision_at(new_head) {
            state.status = EpisodeStatus::Collision(collision);
            debug!(?collision, head = ?new_head, score = state.score, "snake died");

            return Ok(Transition {
                reward: self.rewards.compute(&before, state, false),
                ate_food: false,
                status: state.status,
            });
        }

        let ate_food = state.food == Some(new_head);
        state.snake.advance(new_head, ate_food);

        if ate_food {
            state.score += SCORE_PER_FOOD;
            state.steps_since_food = 0;
            state.food = spawn_food(
                &state.snake,
                state.grid_width,
                state.grid_height,
                &mut self.rng,
            );

            match state.food {
                Some(food) => debug!(score = state.score, ?food, "food eaten"),
                None => {
                    state.status = EpisodeStatus::BoardFilled;
                    debug!(score = state.score, "board filled");
                }
            }
        } else if self
            .config
            .starvation_limit
            .is_some_and(|limit| state.steps_since_food >= limit)
        {
            state.status = EpisodeStatus::Starved;
            debug!(steps = state.steps, score = state.score, "snake starved");
        }

        state.check_invariants()?;

        Ok(Transition {
            reward: self.rewards.compute(&before, state, ate_food),
            ate_food,
            status: state.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::CollisionType;

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(7))
    }

    #[test]
    fn test_reset() {
        let mut engine = seeded(GameConfig::default());
        let state = engine.reset(None).unwrap();

        assert!(state.is_alive());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 7));
        assert_eq!(state.snake.direction, Direction::Right);
        assert!(state.food.is_some_and(|food| !state.is_occupied_by_snake(food)));
    }

    #[test]
    fn test_reset_seed_reproduces_food() {
        let mut engine = GameEngine::new(GameConfig::default());
        let first = engine.reset(Some(11)).unwrap();
        let second = engine.reset(Some(11)).unwrap();

        assert_eq!(first.food, second.food);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset(None).unwrap();
        state.food = Some(Position::new(0, 0));
        let initial_head = state.snake.head();

        let result = engine.step(&mut state, Action::Right).unwrap();

        assert!(!result.terminated());
        assert!(!result.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), initial_head.moved_by(1, 0));
        assert_eq!(result.reward, -0.01);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset(None).unwrap();

        // Place food directly in front of snake
        let head = state.snake.head();
        state.food = Some(head.moved_in_direction(state.snake.direction));
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Right).unwrap();

        assert!(result.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.steps_since_food, 0);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(state.food.is_some_and(|food| !state.is_occupied_by_snake(food)));
        assert_eq!(result.reward, 10.0);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = seeded(GameConfig::small());
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Some(Position::new(5, 5)),
            10,
            10,
        );
        let snake_before = state.snake.clone();

        let result = engine.step(&mut state, Action::Left).unwrap();

        assert!(result.terminated());
        assert!(!state.is_alive());
        assert_eq!(state.status, EpisodeStatus::Collision(CollisionType::Wall));
        assert_eq!(state.snake, snake_before);
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded(GameConfig::small());

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Some(Position::new(8, 8)), 10, 10);

        // Right: (6,5) ...
        engine.step(&mut state, Action::Right).unwrap();
        // Down: (6,6), (6,5), (5,5), (4,5), (3,5)
        engine.step(&mut state, Action::Down).unwrap();
        // Left: (5,6), (6,6), (6,5), (5,5), (4,5)
        engine.step(&mut state, Action::Left).unwrap();
        // Up: (5,5) is still body
        let result = engine.step(&mut state, Action::Up).unwrap();

        assert!(result.terminated());
        assert_eq!(
            state.status,
            EpisodeStatus::Collision(CollisionType::SelfCollision)
        );
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut engine = seeded(GameConfig::small());

        // A 2x2 loop: head (5,5), then (5,6), (4,6), tail (4,5)
        let snake = Snake::from_segments(
            [
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
            ],
            Direction::Up,
        )
        .unwrap();
        let mut state = GameState::new(snake, Some(Position::new(8, 8)), 10, 10);

        let result = engine.step(&mut state, Action::Left).unwrap();

        assert!(!result.terminated());
        assert_eq!(state.snake.head(), Position::new(4, 5));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset(None).unwrap();
        state.food = Some(Position::new(0, 0));
        let head = state.snake.head();

        // Try to turn 180 degrees (should be ignored)
        let result = engine.step(&mut state, Action::Left).unwrap();

        assert!(!result.terminated());
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), head.moved_by(1, 0));
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut engine = seeded(GameConfig::small());
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 1);
        let mut state = GameState::new(snake, Some(Position::new(8, 8)), 10, 10);

        engine.step(&mut state, Action::Left).unwrap();

        assert_eq!(state.snake.direction, Direction::Left);
        assert_eq!(state.snake.head(), Position::new(4, 5));
    }

    #[test]
    fn test_starvation() {
        let mut config = GameConfig::small();
        config.starvation_limit = Some(3);
        let mut engine = seeded(config);
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 1);
        let mut state = GameState::new(snake, Some(Position::new(2, 8)), 10, 10);

        assert!(!engine.step(&mut state, Action::Right).unwrap().terminated());
        assert!(!engine.step(&mut state, Action::Right).unwrap().terminated());
        let result = engine.step(&mut state, Action::Right).unwrap();

        assert_eq!(state.status, EpisodeStatus::Starved);
        assert!(result.terminated());
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_step_counters_saturate() {
        let mut engine = seeded(GameConfig::small());
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 1);
        let mut state = GameState::new(snake, Some(Position::new(2, 8)), 10, 10);
        state.steps = u32::MAX;
        state.steps_since_food = u32::MAX;

        let result = engine.step(&mut state, Action::Right).unwrap();

        assert!(!result.terminated());
        assert_eq!(state.steps, u32::MAX);
        assert_eq!(state.steps_since_food, u32::MAX);
        assert_eq!(state.snake.head(), Position::new(3, 2));
    }

    #[test]
    fn test_board_filled() {
        let mut config = GameConfig::new(2, 1);
        config.initial_snake_length = 1;
        let mut engine = seeded(config);
        let mut state = engine.reset(None).unwrap();

        // Only (0,0) is free next to the head at (1,0)
        assert_eq!(state.food, Some(Position::new(0, 0)));

        let result = engine.step(&mut state, Action::Left).unwrap();

        assert_eq!(state.status, EpisodeStatus::BoardFilled);
        assert_eq!(state.food, None);
        assert_eq!(state.snake.len(), 2);
        assert!(result.terminated());
        assert_eq!(result.reward, 100.0);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset(None).unwrap();
        state.status = EpisodeStatus::Collision(CollisionType::Wall);
        let before = state.clone();

        let result = engine.step(&mut state, Action::Up).unwrap();

        assert!(result.terminated());
        assert_eq!(result.reward, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut a = seeded(GameConfig::default());
        let mut b = seeded(GameConfig::default());
        let mut state_a = a.reset(None).unwrap();
        let mut state_b = b.reset(None).unwrap();

        for action in [Action::Up, Action::Left, Action::Left, Action::Down, Action::Right] {
            let ra = a.step(&mut state_a, action).unwrap();
            let rb = b.step(&mut state_b, action).unwrap();
            assert_eq!(ra, rb);
            assert_eq!(state_a, state_b);
        }
    }
}
