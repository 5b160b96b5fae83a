use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use super::action::Direction;
use crate::error::{Result, SnakeError};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// Segments extend behind the head, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// Returns an `InvariantViolation` for an empty segment list; other
    /// invariants are checked by [`GameState::check_invariants`].
    pub fn from_segments(
        segments: impl IntoIterator<Item = Position>,
        direction: Direction,
    ) -> Result<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return Err(SnakeError::InvariantViolation(
                "snake must have at least one segment".to_string(),
            ));
        }
        Ok(Self { body, direction })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Iterate over all segments, head first
    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Segments excluding the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter().skip(1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head, dropping the tail unless `grow` is set
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a constructed snake)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Where an episode stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    Alive,
    /// Terminated by hitting a wall or the body
    Collision(CollisionType),
    /// Terminated by the starvation limit
    Starved,
    /// Terminated because no free cell is left for food
    BoardFilled,
    /// Cut off by the external step limit
    Truncated,
}

impl EpisodeStatus {
    pub fn is_alive(&self) -> bool {
        matches!(self, EpisodeStatus::Alive)
    }

    /// True for the game's own terminal conditions
    pub fn is_terminated(&self) -> bool {
        matches!(
            self,
            EpisodeStatus::Collision(_) | EpisodeStatus::Starved | EpisodeStatus::BoardFilled
        )
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, EpisodeStatus::Truncated)
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Food cell; `None` only once the snake covers the board
    pub food: Option<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub steps_since_food: u32,
    pub status: EpisodeStatus,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Option<Position>, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            steps_since_food: 0,
            status: EpisodeStatus::Alive,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Collision the head would suffer by moving onto `pos` this step
    ///
    /// The tail is vacated during the move, so it only blocks when the snake
    /// grows, i.e. when `pos` holds food.
    pub fn collision_at(&self, pos: Position) -> Option<CollisionType> {
        if !self.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        let grows = self.food == Some(pos);
        let blocking = if grows {
            self.snake.len()
        } else {
            self.snake.len().saturating_sub(1)
        };

        if self.snake.segments().take(blocking).any(|&seg| seg == pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Verify the snake and food are consistent with the grid
    pub fn check_invariants(&self) -> Result<()> {
        if self.snake.is_empty() {
            return Err(SnakeError::InvariantViolation("snake is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.snake.len());
        let mut previous: Option<Position> = None;
        for &seg in self.snake.segments() {
            if !self.is_in_bounds(seg) {
                return Err(SnakeError::InvariantViolation(format!(
                    "snake segment {seg:?} is outside the {}x{} grid",
                    self.grid_width, self.grid_height
                )));
            }
            if !seen.insert(seg) {
                return Err(SnakeError::InvariantViolation(format!(
                    "snake occupies {seg:?} twice"
                )));
            }
            if let Some(prev) = previous {
                if prev.manhattan_distance(seg) != 1 {
                    return Err(SnakeError::InvariantViolation(format!(
                        "snake segments {prev:?} and {seg:?} are not adjacent"
                    )));
                }
            }
            previous = Some(seg);
        }

        if let Some(&neck) = self.snake.segments().nth(1) {
            if self.snake.head().moved_in_direction(self.snake.direction) == neck {
                return Err(SnakeError::InvariantViolation(format!(
                    "heading {:?} points into the neck at {neck:?}",
                    self.snake.direction
                )));
            }
        }

        match self.food {
            Some(food) if !self.is_in_bounds(food) => Err(SnakeError::InvariantViolation(
                format!("food {food:?} is outside the grid"),
            )),
            Some(food) if seen.contains(&food) => Err(SnakeError::InvariantViolation(format!(
                "food {food:?} was placed on the snake"
            ))),
            None if self.snake.len() < self.cell_count() => Err(SnakeError::InvariantViolation(
                "no food although free cells remain".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(snake: Snake, food: Position) -> GameState {
        GameState::new(snake, Some(food), 20, 20)
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(1, 2);
        assert_eq!(a.manhattan_distance(Position::new(4, 6)), 7);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let body: Vec<_> = snake.segments().copied().collect();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(body[1], Position::new(4, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_snake_from_segments() {
        let snake = Snake::from_segments(
            [Position::new(2, 2), Position::new(2, 3)],
            Direction::Up,
        )
        .unwrap();
        assert_eq!(snake.head(), Position::new(2, 2));
        assert_eq!(snake.tail(), Position::new(2, 3));

        assert!(Snake::from_segments(Vec::new(), Direction::Up).is_err());
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        // Move without growing
        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        // Move with growing
        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let state = state_with(snake, Position::new(10, 10));

        assert_eq!(
            state.collision_at(Position::new(4, 5)),
            Some(CollisionType::SelfCollision)
        );
        // Tail moves away this step
        assert_eq!(state.collision_at(Position::new(3, 5)), None);
        assert_eq!(state.collision_at(Position::new(10, 10)), None);
        assert_eq!(
            state.collision_at(Position::new(-1, 5)),
            Some(CollisionType::Wall)
        );
    }

    #[test]
    fn test_single_segment_never_self_collides() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 1);
        let state = state_with(snake, Position::new(10, 10));
        assert_eq!(state.collision_at(Position::new(5, 5)), None);
    }

    #[test]
    fn test_bounds_checking() {
        let state = state_with(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(10, 10),
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_episode_status_flags() {
        assert!(EpisodeStatus::Alive.is_alive());
        assert!(!EpisodeStatus::Alive.is_terminated());
        assert!(EpisodeStatus::Collision(CollisionType::Wall).is_terminated());
        assert!(EpisodeStatus::Starved.is_terminated());
        assert!(EpisodeStatus::BoardFilled.is_terminated());
        assert!(!EpisodeStatus::Truncated.is_terminated());
        assert!(EpisodeStatus::Truncated.is_truncated());
    }

    #[test]
    fn test_invariants_hold_for_valid_state() {
        let state = state_with(
            Snake::new(Position::new(5, 5), Direction::Right, 4),
            Position::new(10, 10),
        );
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_reject_food_on_snake() {
        let state = state_with(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(4, 5),
        );
        assert!(matches!(
            state.check_invariants(),
            Err(SnakeError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_invariants_reject_duplicate_segments() {
        let snake = Snake::from_segments(
            [Position::new(1, 1), Position::new(1, 2), Position::new(1, 1)],
            Direction::Up,
        )
        .unwrap();
        let state = state_with(snake, Position::new(8, 8));
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_invariants_reject_out_of_bounds_and_gaps() {
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 1);
        let mut state = state_with(snake, Position::new(8, 8));
        state.snake.advance(Position::new(-1, 5), false);
        assert!(state.check_invariants().is_err());

        let snake = Snake::from_segments(
            [Position::new(1, 1), Position::new(3, 1)],
            Direction::Left,
        )
        .unwrap();
        assert!(state_with(snake, Position::new(8, 8)).check_invariants().is_err());
    }

    #[test]
    fn test_invariants_reject_heading_into_neck() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        snake.direction = Direction::Left;
        let state = state_with(snake, Position::new(8, 8));
        assert!(matches!(
            state.check_invariants(),
            Err(SnakeError::InvariantViolation(_))
        ));

        // A single segment may face any way
        let mut lone = Snake::new(Position::new(5, 5), Direction::Right, 1);
        lone.direction = Direction::Left;
        assert!(state_with(lone, Position::new(8, 8)).check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_require_food_while_cells_free() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let state = GameState::new(snake, None, 20, 20);
        assert!(state.check_invariants().is_err());
    }
}
