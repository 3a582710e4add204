//! Game-agnostic player intents
//!
//! Produced by the runtime's input channel from raw host events and consumed
//! by the state machines, either on the next tick (continuous games) or
//! immediately (turn-based games).

use serde::{Deserialize, Serialize};

/// Cardinal heading on the screen (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid step for one move
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Same axis, pointing the other way
    pub fn is_opposite(self, other: Direction) -> bool {
        self != other && self.is_horizontal() == other.is_horizontal()
    }
}

/// Discriminant used for input subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    Direction,
    Pointer,
    Click,
    Flip,
    Text,
}

/// A normalized player action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Direction(Direction),
    /// Paddle top edge in field coordinates, already clamped to paddle travel
    Pointer(f32),
    Click,
    /// Reveal the card with this id
    Flip(usize),
    /// Full contents of a text field
    Text(String),
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Direction(_) => IntentKind::Direction,
            Intent::Pointer(_) => IntentKind::Pointer,
            Intent::Click => IntentKind::Click,
            Intent::Flip(_) => IntentKind::Flip,
            Intent::Text(_) => IntentKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Right));
    }
}
