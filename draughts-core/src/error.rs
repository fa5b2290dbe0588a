//! Error types for the fallible public surfaces

use crate::board::Square;
use crate::game::PieceId;

/// Rejected move from `BoardState::try_make_move`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("square {0} is off the board")]
    OutOfBounds(Square),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("{from} -> {to} is not a legal move")]
    Illegal { from: Square, to: Square },
}

/// Invalid position passed to `BoardState::from_pieces`
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("piece {id} placed off the board at {square}")]
    OutOfBounds { id: PieceId, square: Square },

    #[error("piece {id} placed on light square {square}")]
    Unplayable { id: PieceId, square: Square },

    #[error("square {0} holds more than one piece")]
    Occupied(Square),

    #[error("piece id {0} used more than once")]
    DuplicateId(PieceId),

    #[error("malformed position snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure loading or saving a `SearchConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
