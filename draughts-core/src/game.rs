//! Pieces and board state

use crate::board::{Side, Square, BOARD_SIZE};
use crate::error::BoardError;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pieces per side in the opening layout
pub const PIECES_PER_SIDE: u8 = 12;

const CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

// ============================================================================
// CORE TYPES
// ============================================================================

/// Stable piece identity, unique for the lifetime of a game
pub type PieceId = u8;

/// A checker on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub side: Side,
    pub king: bool,
    pub pos: Square,
}

impl Piece {
    pub fn new(id: PieceId, side: Side, pos: Square) -> Self {
        Self {
            id,
            side,
            king: false,
            pos,
        }
    }

    pub fn crowned(mut self) -> Self {
        self.king = true;
        self
    }
}

/// Serializable position: every piece, near side first, each side in roster order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pieces: Vec<Piece>,
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Board state (clone to explore)
///
/// Two views of the same ownership relation are kept: the grid maps each
/// cell to the id of the piece standing there, and each side's roster holds
/// that side's pieces in a stable order. Both are only written through
/// `place`, `remove_piece` and `relocate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    /// Cell -> piece id, indexed by `Square::index`
    grid: [Option<PieceId>; CELLS],

    /// Per-side rosters, indexed by `Side as usize`
    rosters: [Vec<Piece>; 2],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening: 12 pieces per side on the three rows nearest each edge
    pub fn initial() -> Self {
        let mut state = Self::empty();

        for i in 0..PIECES_PER_SIDE {
            let row = (i / 4) as i8;
            let col = 2 * (i % 4) as i8;

            let near_y = row;
            let near_x = if near_y == 1 { col + 1 } else { col };
            state.place(Piece::new(i, Side::Near, Square::new(near_x, near_y)));
        }

        for i in 0..PIECES_PER_SIDE {
            let row = (i / 4) as i8;
            let col = 2 * (i % 4) as i8;

            let far_y = BOARD_SIZE - 1 - row;
            let far_x = if far_y == BOARD_SIZE - 2 { col } else { col + 1 };
            state.place(Piece::new(
                PIECES_PER_SIDE + i,
                Side::Far,
                Square::new(far_x, far_y),
            ));
        }

        state
    }

    /// Build an arbitrary position; pieces keep the given order within each side
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Result<Self, BoardError> {
        let mut state = Self::empty();
        let mut seen = FxHashSet::default();

        for piece in pieces {
            if !piece.pos.is_valid() {
                return Err(BoardError::OutOfBounds {
                    id: piece.id,
                    square: piece.pos,
                });
            }
            if !piece.pos.is_playable() {
                return Err(BoardError::Unplayable {
                    id: piece.id,
                    square: piece.pos,
                });
            }
            if !seen.insert(piece.id) {
                return Err(BoardError::DuplicateId(piece.id));
            }
            if state.id_at(piece.pos).is_some() {
                return Err(BoardError::Occupied(piece.pos));
            }
            state.place(piece);
        }

        Ok(state)
    }

    fn empty() -> Self {
        Self {
            grid: [None; CELLS],
            rosters: [Vec::with_capacity(PIECES_PER_SIDE as usize), Vec::with_capacity(PIECES_PER_SIDE as usize)],
        }
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self.rosters.iter().flatten().copied().collect(),
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, BoardError> {
        Self::from_pieces(snapshot.pieces.iter().copied())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }

    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Pieces of one side, in roster order
    pub fn pieces(&self, side: Side) -> &[Piece] {
        &self.rosters[side as usize]
    }

    /// Get piece at square (None for empty or off-board squares)
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.id_at(sq).and_then(|id| self.find(id))
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        sq.is_valid() && self.grid[sq.index()].is_none()
    }

    /// Number of regular pieces (`king == false`) or kings of a side
    pub fn count(&self, side: Side, king: bool) -> usize {
        self.pieces(side).iter().filter(|p| p.king == king).count()
    }

    /// Grid and rosters describe exactly the same pieces
    pub fn is_consistent(&self) -> bool {
        let mut listed = 0;
        for (side_idx, roster) in self.rosters.iter().enumerate() {
            for piece in roster {
                if piece.side as usize != side_idx || !piece.pos.is_valid() {
                    return false;
                }
                if self.grid[piece.pos.index()] != Some(piece.id) {
                    return false;
                }
                listed += 1;
            }
        }
        self.grid.iter().filter(|cell| cell.is_some()).count() == listed
    }

    pub(crate) fn id_at(&self, sq: Square) -> Option<PieceId> {
        if sq.is_valid() {
            self.grid[sq.index()]
        } else {
            None
        }
    }

    fn find(&self, id: PieceId) -> Option<&Piece> {
        self.rosters.iter().flatten().find(|p| p.id == id)
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply a move in place. The move must be legal (see `is_legal_move`).
    ///
    /// When the move is a capture, the pieces of the matching capture
    /// sequence are removed first; if several sequences land on `to`, the one
    /// taking the most pieces is used. A piece ending on its promotion row is
    /// crowned.
    pub fn make_move(&mut self, from: Square, to: Square) {
        if let Some(capture) = self.resolve_capture(from, to) {
            for id in capture.captured {
                self.remove_piece(id);
            }
        }

        if !self.relocate(from, to) {
            tracing::warn!(%from, %to, "make_move from an empty square ignored");
        }
    }

    fn place(&mut self, piece: Piece) {
        self.grid[piece.pos.index()] = Some(piece.id);
        self.rosters[piece.side as usize].push(piece);
    }

    fn remove_piece(&mut self, id: PieceId) {
        for roster in &mut self.rosters {
            if let Some(idx) = roster.iter().position(|p| p.id == id) {
                let piece = roster.remove(idx);
                self.grid[piece.pos.index()] = None;
                return;
            }
        }
    }

    fn relocate(&mut self, from: Square, to: Square) -> bool {
        let Some(id) = self.id_at(from) else {
            return false;
        };

        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);

        if let Some(piece) = self.rosters.iter_mut().flatten().find(|p| p.id == id) {
            piece.pos = to;
            if to.y == piece.side.promotion_row() {
                piece.king = true;
            }
        }
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================
