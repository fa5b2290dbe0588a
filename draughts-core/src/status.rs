//! Terminal-state detection

use crate::board::Side;
use crate::game::BoardState;
use serde::{Deserialize, Serialize};

/// Game status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    NearWins,
    FarWins,
}

impl GameStatus {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::Ongoing => None,
            GameStatus::NearWins => Some(Side::Near),
            GameStatus::FarWins => Some(Side::Far),
        }
    }

    fn won_by(side: Side) -> Self {
        match side {
            Side::Near => GameStatus::NearWins,
            Side::Far => GameStatus::FarWins,
        }
    }
}

impl BoardState {
    /// Status with `to_move` about to play: a side that cannot move has lost
    pub fn game_status(&self, to_move: Side) -> GameStatus {
        let can_move = self
            .pieces(to_move)
            .iter()
            .any(|p| !self.gen_all_possible_moves(p.pos).is_empty());

        if can_move {
            GameStatus::Ongoing
        } else {
            GameStatus::won_by(to_move.opponent())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::game::Piece;

    #[test]
    fn test_opening_is_ongoing() {
        let state = BoardState::initial();
        assert_eq!(state.game_status(Side::Near), GameStatus::Ongoing);
        assert_eq!(state.game_status(Side::Far), GameStatus::Ongoing);
    }

    #[test]
    fn test_no_pieces_loses() {
        let state = BoardState::from_pieces([Piece::new(0, Side::Far, Square::new(3, 5))]).unwrap();
        assert_eq!(state.game_status(Side::Near), GameStatus::FarWins);
        assert_eq!(state.game_status(Side::Near).winner(), Some(Side::Far));
        assert_eq!(state.game_status(Side::Far), GameStatus::Ongoing);
    }

    #[test]
    fn test_blocked_side_loses() {
        // Near man on (0,0): (1,1) is taken and the jump to (2,2) is blocked
        let state = BoardState::from_pieces([
            Piece::new(0, Side::Near, Square::new(0, 0)),
            Piece::new(1, Side::Far, Square::new(1, 1)),
            Piece::new(2, Side::Far, Square::new(2, 2)),
        ])
        .unwrap();
        assert_eq!(state.game_status(Side::Near), GameStatus::FarWins);
    }

    #[test]
    fn test_pinned_pieces_do_not_end_the_game() {
        let state = BoardState::from_pieces([
            Piece::new(0, Side::Near, Square::new(2, 2)),
            Piece::new(1, Side::Near, Square::new(6, 0)),
            Piece::new(2, Side::Far, Square::new(3, 3)),
        ])
        .unwrap();
        assert_eq!(state.game_status(Side::Near), GameStatus::Ongoing);
    }
}
