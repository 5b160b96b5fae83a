use crate::game::{Direction, GameState, ObservationMode, Position};

/// Number of features in the basic encoding
pub const FEATURE_COUNT: usize = 11;

/// Number of food-direction flags appended to every encoding
const FOOD_FLAGS: usize = 4;

/// Vision value for a wall or snake segment
const VISION_BLOCKED: f32 = 1.0;
/// Vision value for the food cell
const VISION_FOOD: f32 = 0.5;

/// Projects a [`GameState`] into a fixed-length feature vector
///
/// Every variant is a pure function of the state with values in `[0, 1]`,
/// and `size()` always matches the length `encode` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationEncoder {
    /// 11 binary features
    ///
    /// - 0..3: danger straight, left, right (relative to heading)
    /// - 3..7: heading one-hot (Up, Right, Down, Left)
    /// - 7..11: food is left, right, up, down of the head
    Features,
    /// `(2r+1)^2` window around the head followed by the 4 food flags
    ///
    /// Window cells are row-major from the top-left corner: 1.0 for walls
    /// and snake segments other than the head, 0.5 for food, 0.0 otherwise.
    LocalVision { radius: usize },
}

impl From<ObservationMode> for ObservationEncoder {
    fn from(mode: ObservationMode) -> Self {
        match mode {
            ObservationMode::Features => ObservationEncoder::Features,
            ObservationMode::LocalVision { radius } => ObservationEncoder::LocalVision { radius },
        }
    }
}

impl ObservationEncoder {
    /// Length of the vectors this encoder produces
    ///
    /// Saturates for radii no valid [`GameConfig`](crate::game::GameConfig)
    /// accepts.
    pub fn size(&self) -> usize {
        match self {
            ObservationEncoder::Features => FEATURE_COUNT,
            ObservationEncoder::LocalVision { radius } => {
                let side = radius.saturating_mul(2).saturating_add(1);
                side.saturating_mul(side).saturating_add(FOOD_FLAGS)
            }
        }
    }

    pub fn encode(&self, state: &GameState) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.size());
        match self {
            ObservationEncoder::Features => {
                push_danger_flags(state, &mut out);
                push_heading_one_hot(state.snake.direction, &mut out);
            }
            ObservationEncoder::LocalVision { radius } => {
                push_vision_window(state, *radius, &mut out);
            }
        }
        push_food_flags(state, &mut out);

        debug_assert_eq!(out.len(), self.size());
        out
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// Danger of moving straight, left and right from the current heading
fn push_danger_flags(state: &GameState, out: &mut Vec<f32>) {
    let heading = state.snake.direction;
    let head = state.snake.head();

    for direction in [heading, heading.turn_left(), heading.turn_right()] {
        let target = head.moved_in_direction(direction);
        out.push(flag(state.collision_at(target).is_some()));
    }
}

fn push_heading_one_hot(heading: Direction, out: &mut Vec<f32>) {
    out.extend(Direction::ALL.iter().map(|&d| flag(d == heading)));
}

/// Food left, right, up, down of the head; all zero without food
fn push_food_flags(state: &GameState, out: &mut Vec<f32>) {
    let head = state.snake.head();
    match state.food {
        Some(food) => out.extend([
            flag(food.x < head.x),
            flag(food.x > head.x),
            flag(food.y < head.y),
            flag(food.y > head.y),
        ]),
        None => out.extend([0.0; FOOD_FLAGS]),
    }
}

fn push_vision_window(state: &GameState, radius: usize, out: &mut Vec<f32>) {
    let head = state.snake.head();
    let r = i32::try_from(radius).unwrap_or(i32::MAX);

    for dy in -r..=r {
        for dx in -r..=r {
            let cell = head.moved_by(dx, dy);
            out.push(vision_value(state, head, cell));
        }
    }
}

fn vision_value(state: &GameState, head: Position, cell: Position) -> f32 {
    if !state.is_in_bounds(cell) || (cell != head && state.is_occupied_by_snake(cell)) {
        VISION_BLOCKED
    } else if state.food == Some(cell) {
        VISION_FOOD
    } else {
        0.0
    }
}
