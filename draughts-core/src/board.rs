//! Board geometry: squares, sides and diagonal directions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Board edge length (8x8)
pub const BOARD_SIZE: i8 = 8;

/// Board coordinates, x = column, y = row (row 0 is the near edge)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: i8,
    pub y: i8,
}

impl Square {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    /// Square `steps` cells away along a diagonal (may be off the board)
    pub fn step(&self, direction: Direction, steps: i8) -> Square {
        let (dx, dy) = direction.delta();
        Square::new(self.x + dx * steps, self.y + dy * steps)
    }

    /// Dark squares: the parity every piece lives on
    pub fn is_playable(&self) -> bool {
        (self.x + self.y) % 2 == 0
    }

    pub(crate) fn index(&self) -> usize {
        (self.y as usize) * (BOARD_SIZE as usize) + self.x as usize
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Player side
///
/// `Near` starts on rows 0-2 and advances toward row 7,
/// `Far` starts on rows 5-7 and advances toward row 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Near = 0,
    Far = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    /// Directions a regular (uncrowned) piece may move and capture in
    pub fn forward(self) -> &'static [Direction] {
        match self {
            Side::Near => &UPWARD,
            Side::Far => &DOWNWARD,
        }
    }

    /// Row on which a piece of this side is crowned
    pub fn promotion_row(self) -> i8 {
        match self {
            Side::Near => BOARD_SIZE - 1,
            Side::Far => 0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Near => f.write_str("near"),
            Side::Far => f.write_str("far"),
        }
    }
}

/// Diagonal direction; "up" is toward row 7
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// (dx, dy) unit vector
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::UpLeft => (-1, 1),
            Direction::UpRight => (1, 1),
            Direction::DownLeft => (-1, -1),
            Direction::DownRight => (1, -1),
        }
    }
}

/// All four diagonals, in generation order
pub const DIRECTIONS: [Direction; 4] = [
    Direction::UpLeft,
    Direction::UpRight,
    Direction::DownLeft,
    Direction::DownRight,
];

const UPWARD: [Direction; 2] = [Direction::UpLeft, Direction::UpRight];
const DOWNWARD: [Direction; 2] = [Direction::DownLeft, Direction::DownRight];
