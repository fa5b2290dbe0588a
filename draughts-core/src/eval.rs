//! Material evaluation

use crate::board::Side;
use crate::game::BoardState;
use serde::{Deserialize, Serialize};

/// Certain-win score; a side with no legal move scores the negation
pub const WIN_VALUE: f32 = 100000.0;

/// Material weights
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Value of an uncrowned piece
    pub regular_value: f32,
    /// Value of a king
    pub king_value: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            regular_value: 1.0,
            king_value: 2.0,
        }
    }
}

/// Zero-sum material score; positive favours `perspective`
pub fn evaluate(state: &BoardState, perspective: Side, heuristics: &Heuristics) -> f32 {
    let opponent = perspective.opponent();

    let regular = state.count(perspective, false) as f32 - state.count(opponent, false) as f32;
    let kings = state.count(perspective, true) as f32 - state.count(opponent, true) as f32;

    heuristics.regular_value * regular + heuristics.king_value * kings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::game::Piece;

    #[test]
    fn test_evaluate_symmetric() {
        let state = BoardState::initial();
        let h = Heuristics::default();
        assert_eq!(evaluate(&state, Side::Far, &h), 0.0);
        assert_eq!(evaluate(&state, Side::Near, &h), 0.0);
    }

    #[test]
    fn test_kings_count_double() {
        let state = BoardState::from_pieces([
            Piece::new(0, Side::Far, Square::new(1, 1)).crowned(),
            Piece::new(1, Side::Far, Square::new(5, 5)),
            Piece::new(2, Side::Near, Square::new(2, 2)),
        ])
        .unwrap();
        let h = Heuristics::default();
        assert_eq!(evaluate(&state, Side::Far, &h), 2.0);
        assert_eq!(evaluate(&state, Side::Near, &h), -2.0);
    }
}
