//! Move generation: captures, capture chains, plain steps and the
//! mandatory-capture rule

use crate::board::{Direction, Side, Square, DIRECTIONS};
use crate::error::MoveError;
use crate::game::{BoardState, Piece, PieceId};
use rustc_hash::FxHashSet;

/// One maximal capture sequence: where the capturing piece ends up and which
/// pieces it took on the way, in capture order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PossibleCapture {
    pub landing: Square,
    pub captured: Vec<PieceId>,
}

fn capture_directions(piece: &Piece) -> &'static [Direction] {
    if piece.king {
        &DIRECTIONS
    } else {
        piece.side.forward()
    }
}

impl BoardState {
    // ========================================================================
    // CAPTURE PREDICATES
    // ========================================================================

    /// A piece of `side` on `from` can jump an enemy toward `direction`
    pub fn can_capture_toward(&self, from: Square, side: Side, direction: Direction) -> bool {
        let over = from.step(direction, 1);
        let landing = from.step(direction, 2);

        if !over.is_valid() || !landing.is_valid() {
            return false;
        }

        match self.piece_at(over) {
            Some(victim) => victim.side != side && self.is_empty(landing),
            None => false,
        }
    }

    /// Any capture available to `piece` from where it stands
    pub fn has_capture(&self, piece: &Piece) -> bool {
        capture_directions(piece)
            .iter()
            .any(|&dir| self.can_capture_toward(piece.pos, piece.side, dir))
    }

    // ========================================================================
    // CAPTURE CHAINS
    // ========================================================================

    /// Every maximal capture sequence for the piece on `from`
    ///
    /// Empty when the square is empty or the piece has no capture. Branches
    /// are explored depth-first in direction order.
    pub fn capture_sequences(&self, from: Square) -> Vec<PossibleCapture> {
        let mut out = Vec::new();
        let Some(piece) = self.piece_at(from) else {
            return out;
        };
        if !self.has_capture(piece) {
            return out;
        }

        self.extend_chain(piece, from, &FxHashSet::default(), &[], &mut out);
        out
    }

    /// Follow every capture available from `at`; record a sequence where none is.
    ///
    /// The board is not modified while searching: the mover's origin stays
    /// occupied and jumped pieces stay in place, but a piece already taken in
    /// this chain cannot be taken again. Kings also may not land on a square
    /// they already jumped from in this chain.
    fn extend_chain(
        &self,
        piece: &Piece,
        at: Square,
        origins: &FxHashSet<Square>,
        captured: &[PieceId],
        out: &mut Vec<PossibleCapture>,
    ) {
        let mut extended = false;

        for &dir in capture_directions(piece) {
            if !self.can_capture_toward(at, piece.side, dir) {
                continue;
            }

            let landing = at.step(dir, 2);
            if piece.king && origins.contains(&landing) {
                continue;
            }

            let Some(victim) = self.id_at(at.step(dir, 1)) else {
                continue;
            };
            if captured.contains(&victim) {
                continue;
            }

            extended = true;

            let mut chain = captured.to_vec();
            chain.push(victim);

            if piece.king {
                let mut next_origins = origins.clone();
                next_origins.insert(at);
                self.extend_chain(piece, landing, &next_origins, &chain, out);
            } else {
                self.extend_chain(piece, landing, origins, &chain, out);
            }
        }

        if !extended && !captured.is_empty() {
            out.push(PossibleCapture {
                landing: at,
                captured: captured.to_vec(),
            });
        }
    }

    /// The capture sequence a (from, to) move stands for, if any
    ///
    /// Several sequences may end on the same square with different victims;
    /// the one taking the most pieces is chosen, earliest first on ties.
    pub fn resolve_capture(&self, from: Square, to: Square) -> Option<PossibleCapture> {
        let mut best: Option<PossibleCapture> = None;

        for capture in self.capture_sequences(from) {
            if capture.landing != to {
                continue;
            }
            let longer = best
                .as_ref()
                .map_or(true, |b| capture.captured.len() > b.captured.len());
            if longer {
                best = Some(capture);
            }
        }

        best
    }

    // ========================================================================
    // PLAIN MOVES
    // ========================================================================

    /// Single diagonal steps onto empty squares
    fn step_moves(&self, piece: &Piece) -> Vec<Square> {
        capture_directions(piece)
            .iter()
            .map(|&dir| piece.pos.step(dir, 1))
            .filter(|&sq| self.is_empty(sq))
            .collect()
    }

    // ========================================================================
    // MANDATORY CAPTURE
    // ========================================================================

    /// Ids of every piece of `side` that has a capture available
    pub fn pieces_which_must_capture(&self, side: Side) -> FxHashSet<PieceId> {
        self.pieces(side)
            .iter()
            .filter(|p| self.has_capture(p))
            .map(|p| p.id)
            .collect()
    }

    /// `side` is under a capture obligation this turn
    pub fn must_capture(&self, side: Side) -> bool {
        self.pieces(side).iter().any(|p| self.has_capture(p))
    }

    // ========================================================================
    // LEGAL MOVES
    // ========================================================================

    /// Legal destinations for the piece on `sq`
    ///
    /// Empty for an empty square and for a piece pinned because another piece
    /// of its side must capture. A piece with a capture only gets the landing
    /// squares of its capture sequences.
    pub fn gen_all_possible_moves(&self, sq: Square) -> Vec<Square> {
        let Some(piece) = self.piece_at(sq) else {
            return Vec::new();
        };
        let obliged = self.pieces_which_must_capture(piece.side);
        self.destinations(piece, &obliged)
    }

    fn destinations(&self, piece: &Piece, obliged: &FxHashSet<PieceId>) -> Vec<Square> {
        if obliged.is_empty() {
            return self.step_moves(piece);
        }
        if !obliged.contains(&piece.id) {
            return Vec::new();
        }

        let mut landings = Vec::new();
        for capture in self.capture_sequences(piece.pos) {
            if !landings.contains(&capture.landing) {
                landings.push(capture.landing);
            }
        }
        landings
    }

    /// Every legal (from, to) pair for `side`, in roster order
    pub fn legal_moves(&self, side: Side) -> Vec<(Square, Square)> {
        let obliged = self.pieces_which_must_capture(side);
        let mut moves = Vec::new();

        for piece in self.pieces(side) {
            for to in self.destinations(piece, &obliged) {
                moves.push((piece.pos, to));
            }
        }

        moves
    }

    pub fn is_legal_move(&self, from: Square, to: Square) -> bool {
        self.is_empty(to) && self.gen_all_possible_moves(from).contains(&to)
    }

    /// `make_move` guarded by `is_legal_move`
    pub fn try_make_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        for sq in [from, to] {
            if !sq.is_valid() {
                return Err(MoveError::OutOfBounds(sq));
            }
        }
        if self.piece_at(from).is_none() {
            return Err(MoveError::EmptySquare(from));
        }
        if !self.is_legal_move(from, to) {
            return Err(MoveError::Illegal { from, to });
        }

        self.make_move(from, to);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
