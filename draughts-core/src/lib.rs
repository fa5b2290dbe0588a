//! Draughts Core - rules engine and automated player
//!
//! This crate provides the core game logic for 8x8 draughts:
//! - Board geometry (squares, sides, diagonal directions)
//! - Board state with stable piece identities
//! - Move generation with capture chains and mandatory capture
//! - Terminal-state detection
//! - Material evaluation
//! - Time-bounded iterative-deepening alpha-beta search

pub mod board;
pub mod game;
pub mod movegen;
pub mod status;
pub mod eval;
pub mod ai;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Direction, Side, Square, BOARD_SIZE, DIRECTIONS};
pub use game::{BoardState, Piece, PieceId, Snapshot, PIECES_PER_SIDE};
pub use movegen::PossibleCapture;
pub use status::GameStatus;
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use ai::{play_game, GameRecord, SearchEngine, SearchResult};
pub use config::SearchConfig;
pub use error::{BoardError, ConfigError, MoveError};
