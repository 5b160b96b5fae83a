use serde::{Deserialize, Serialize};

use crate::error::SnakeError;

/// Direction the snake can face, in clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All headings in one-hot encoding order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Position of this heading in [`Direction::ALL`]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Heading after a 90-degree counter-clockwise turn
    pub fn turn_left(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }

    /// Heading after a 90-degree clockwise turn
    pub fn turn_right(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Discrete action accepted by the engine: an absolute heading request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// Size of the discrete action space
    pub const COUNT: usize = 4;

    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Index of this action in the discrete action space
    pub fn index(self) -> usize {
        self.direction().index()
    }

    /// Heading this action requests
    pub fn direction(self) -> Direction {
        match self {
            Action::Up => Direction::Up,
            Action::Right => Direction::Right,
            Action::Down => Direction::Down,
            Action::Left => Direction::Left,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::ALL[direction.index()]
    }
}

impl TryFrom<usize> for Action {
    type Error = SnakeError;

    /// - 0 → Up
    /// - 1 → Right
    /// - 2 → Down
    /// - 3 → Left
    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(idx)
            .copied()
            .ok_or(SnakeError::InvalidAction {
                action: idx,
                num_actions: Action::COUNT,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_relative_turns() {
        assert_eq!(Direction::Up.turn_left(), Direction::Left);
        assert_eq!(Direction::Up.turn_right(), Direction::Right);
        assert_eq!(Direction::Right.turn_left(), Direction::Up);
        assert_eq!(Direction::Right.turn_right(), Direction::Down);
        assert_eq!(Direction::Left.turn_right(), Direction::Up);
        assert_eq!(Direction::Down.turn_right(), Direction::Left);
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(Action::try_from(0).unwrap(), Action::Up);
        assert_eq!(Action::try_from(1).unwrap(), Action::Right);
        assert_eq!(Action::try_from(2).unwrap(), Action::Down);
        assert_eq!(Action::try_from(3).unwrap(), Action::Left);

        for action in Action::ALL {
            assert_eq!(Action::try_from(action.index()).unwrap(), action);
            assert_eq!(Action::from(action.direction()), action);
        }
    }

    #[test]
    fn test_invalid_action_index() {
        let err = Action::try_from(4).unwrap_err();
        assert!(matches!(
            err,
            SnakeError::InvalidAction {
                action: 4,
                num_actions: 4
            }
        ));
        assert!(Action::try_from(usize::MAX).is_err());
    }
}
