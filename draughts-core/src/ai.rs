//! Iterative-deepening alpha-beta search

use crate::board::{Side, Square};
use crate::config::SearchConfig;
use crate::eval::{evaluate, Heuristics, WIN_VALUE};
use crate::game::BoardState;
use crate::status::GameStatus;
use std::time::{Duration, Instant};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Initial bound, strictly outside every reachable score
const SEARCH_INF: f32 = 1e9;

/// Shared by the deepening loop and the per-node check
fn budget_spent(started: Instant, budget: Duration) -> bool {
    started.elapsed() >= budget
}

// ============================================================================
// TYPES
// ============================================================================

/// Best move found by the last completed iteration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    pub from: Square,
    pub to: Square,
    /// Score from the engine's side; `WIN_VALUE` means a forced win
    pub score: f32,
    /// Depth of the last iteration that ran to completion
    pub depth: u32,
    /// Nodes visited over all iterations
    pub nodes: u64,
}

/// Time budget ran out mid-iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cancelled;

/// Scores proven on the path to a node: the maximizer's best so far and the
/// minimizer's best so far. Copied into each child.
#[derive(Clone, Copy, Debug)]
struct Bounds {
    local_max: f32,
    local_min: f32,
}

impl Bounds {
    const OPEN: Bounds = Bounds {
        local_max: -SEARCH_INF,
        local_min: SEARCH_INF,
    };
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

/// Automated player
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Choose a move for the engine's side without touching `state`
    ///
    /// Deepens one ply at a time from `min_depth`. Once the time budget is
    /// spent, an iteration deeper than `min_depth` is abandoned and the last
    /// completed one is returned. Returns `None` when the side has no move.
    pub fn compute_best_move(&self, state: &BoardState) -> Option<SearchResult> {
        let side = self.config.side;
        let min_depth = self.config.min_depth.max(1);
        let budget = self.config.time_budget();
        let started = Instant::now();

        if state.legal_moves(side).is_empty() {
            tracing::debug!(%side, "no legal move to search");
            return None;
        }

        let mut best: Option<SearchResult> = None;
        let mut nodes = 0u64;
        let mut depth = min_depth;

        loop {
            if depth > min_depth && budget_spent(started, budget) {
                break;
            }

            let mut search = Search {
                side,
                heuristics: &self.config.heuristics,
                started,
                budget,
                interruptible: depth > min_depth,
                nodes: 0,
            };
            let outcome = search.root(state, depth);
            nodes += search.nodes;

            match outcome {
                Ok(Some((from, to, score))) => {
                    tracing::debug!(depth, score, %from, %to, nodes, "iteration complete");
                    best = Some(SearchResult {
                        from,
                        to,
                        score,
                        depth,
                        nodes,
                    });
                    if score >= WIN_VALUE {
                        break;
                    }
                }
                Ok(None) => break,
                Err(Cancelled) => {
                    tracing::debug!(depth, "iteration abandoned: time budget spent");
                    break;
                }
            }

            if self.config.max_depth.is_some_and(|max| depth >= max) {
                break;
            }
            depth += 1;
        }

        if let Some(result) = best.as_mut() {
            result.nodes = nodes;
            tracing::info!(
                from = %result.from,
                to = %result.to,
                score = result.score,
                depth = result.depth,
                nodes,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "best move chosen"
            );
        }

        best
    }
}

// ============================================================================
// ENGINE VS ENGINE
// ============================================================================

/// How an engine-vs-engine game ended
#[derive(Clone, Debug)]
pub struct GameRecord {
    /// `Ongoing` when the ply limit was hit first
    pub status: GameStatus,
    pub plies: usize,
    pub final_state: BoardState,
}

/// Play an engine built from `near` against one built from `far`, starting
/// from `state` with `to_move` first
///
/// Each config is bound to its seat: the `side` field it carries is ignored.
pub fn play_game(
    near: SearchConfig,
    far: SearchConfig,
    mut state: BoardState,
    mut to_move: Side,
    max_plies: usize,
) -> GameRecord {
    let engines = [
        SearchEngine::new(near.with_side(Side::Near)),
        SearchEngine::new(far.with_side(Side::Far)),
    ];
    let mut plies = 0;
    let mut status = state.game_status(to_move);

    while status == GameStatus::Ongoing && plies < max_plies {
        let engine = &engines[to_move as usize];

        let Some(result) = engine.compute_best_move(&state) else {
            break;
        };
        state.make_move(result.from, result.to);
        plies += 1;

        to_move = to_move.opponent();
        status = state.game_status(to_move);
    }

    GameRecord {
        status,
        plies,
        final_state: state,
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// One iteration of the search
struct Search<'a> {
    side: Side,
    heuristics: &'a Heuristics,
    started: Instant,
    budget: Duration,
    interruptible: bool,
    nodes: u64,
}

impl Search<'_> {
    fn root(&mut self, state: &BoardState, depth: u32) -> Result<Option<(Square, Square, f32)>, Cancelled> {
        let mut bounds = Bounds::OPEN;
        let mut best = None;

        for (from, to) in state.legal_moves(self.side) {
            let mut child = state.clone();
            child.make_move(from, to);

            let score = self.value(&child, self.side.opponent(), bounds, depth as i32 - 1)?;

            if score > bounds.local_max {
                bounds.local_max = score;
                best = Some((from, to, score));
            }
        }

        Ok(best)
    }

    /// Minimax value of `state` with `to_move` to play, from the engine's side
    fn value(&mut self, state: &BoardState, to_move: Side, mut bounds: Bounds, depth: i32) -> Result<f32, Cancelled> {
        self.nodes += 1;

        if self.interruptible && budget_spent(self.started, self.budget) {
            return Err(Cancelled);
        }

        // Pending captures are played out past the horizon
        if depth <= 0 && !state.must_capture(to_move) {
            return Ok(evaluate(state, self.side, self.heuristics));
        }

        let maximizing = to_move == self.side;
        let mut best = if maximizing { -WIN_VALUE } else { WIN_VALUE };

        for (from, to) in state.legal_moves(to_move) {
            let mut child = state.clone();
            child.make_move(from, to);

            let score = self.value(&child, to_move.opponent(), bounds, depth - 1)?;

            if maximizing {
                if score > bounds.local_min {
                    return Ok(score);
                }
                bounds.local_max = bounds.local_max.max(score);
                best = best.max(score);
            } else {
                if score < bounds.local_max {
                    return Ok(score);
                }
                bounds.local_min = bounds.local_min.min(score);
                best = best.min(score);
            }
        }

        Ok(best)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Piece;

    fn sq(x: i8, y: i8) -> Square {
        Square::new(x, y)
    }

    /// Far to move; (3,3) -> (2,2) leaves the lone near man without a move
    fn blockade_position() -> BoardState {
        BoardState::from_pieces([
            Piece::new(0, Side::Near, sq(0, 0)),
            Piece::new(1, Side::Far, sq(1, 1)),
            Piece::new(2, Side::Far, sq(3, 3)),
        ])
        .unwrap()
    }

    #[test]
    fn test_engine_returns_legal_move() {
        let state = BoardState::initial();
        let engine = SearchEngine::new(SearchConfig::fixed_depth(Side::Far, 2));

        let result = engine.compute_best_move(&state).unwrap();
        assert!(state.is_legal_move(result.from, result.to));
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_search_does_not_mutate_input() {
        let state = BoardState::initial();
        let before = state.clone();
        let engine = SearchEngine::new(SearchConfig::fixed_depth(Side::Near, 3));
        let _ = engine.compute_best_move(&state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_finds_forced_win() {
        let state = blockade_position();
        let engine = SearchEngine::new(SearchConfig::default().with_min_depth(3).with_max_depth(6));

        let result = engine.compute_best_move(&state).unwrap();
        assert_eq!((result.from, result.to), (sq(3, 3), sq(2, 2)));
        assert_eq!(result.score, WIN_VALUE);
        // A certain win stops deepening
        assert_eq!(result.depth, 3);
    }

    #[test]
    fn test_takes_free_piece() {
        // Far man on (3,5) must take (2,4); the engine has no other choice
        let state = BoardState::from_pieces([
            Piece::new(0, Side::Near, sq(2, 4)),
            Piece::new(1, Side::Near, sq(6, 0)),
            Piece::new(2, Side::Far, sq(3, 5)),
            Piece::new(3, Side::Far, sq(7, 7)),
        ])
        .unwrap();
        let engine = SearchEngine::new(SearchConfig::fixed_depth(Side::Far, 2));

        let result = engine.compute_best_move(&state).unwrap();
        assert_eq!((result.from, result.to), (sq(3, 5), sq(1, 3)));
    }

    #[test]
    fn test_no_move_returns_none() {
        let state = BoardState::from_pieces([Piece::new(0, Side::Far, sq(3, 5))]).unwrap();
        let engine = SearchEngine::new(SearchConfig::fixed_depth(Side::Near, 2));
        assert!(engine.compute_best_move(&state).is_none());
    }

    #[test]
    fn test_time_budget_keeps_min_depth_result() {
        let state = BoardState::initial();
        let config = SearchConfig::default()
            .with_min_depth(2)
            .with_time_budget(Duration::ZERO);
        let engine = SearchEngine::new(config);

        let result = engine.compute_best_move(&state).unwrap();
        assert_eq!(result.depth, 2);
        assert!(state.is_legal_move(result.from, result.to));
    }

    #[test]
    fn test_play_game_reaches_result() {
        let near = SearchConfig::fixed_depth(Side::Near, 1);
        let far = SearchConfig::fixed_depth(Side::Far, 3);

        let record = play_game(near, far, blockade_position(), Side::Far, 10);
        assert_eq!(record.status, GameStatus::FarWins);
        assert_eq!(record.plies, 1);
        assert!(record.final_state.is_consistent());
    }

    #[test]
    fn test_play_game_respects_ply_limit() {
        let near = SearchConfig::fixed_depth(Side::Near, 1);
        let far = SearchConfig::fixed_depth(Side::Far, 1);

        let record = play_game(near, far, BoardState::initial(), Side::Near, 4);
        assert_eq!(record.plies, 4);
        assert_eq!(record.status, GameStatus::Ongoing);
    }

    #[test]
    fn test_play_game_seats_engines_by_position() {
        // Both configs name the near side; the second still plays far
        let near = SearchConfig::fixed_depth(Side::Near, 1);
        let far = SearchConfig::fixed_depth(Side::Near, 3);

        let record = play_game(near, far, blockade_position(), Side::Far, 10);
        assert_eq!(record.status, GameStatus::FarWins);
        assert_eq!(record.plies, 1);
        assert_eq!(record.final_state.piece_at(sq(2, 2)).map(|p| p.side), Some(Side::Far));
        assert_eq!(record.final_state.piece_at(sq(0, 0)).map(|p| p.id), Some(0));
    }

    #[test]
    fn test_budget_cuts_deepening_mid_iteration() {
        let state = BoardState::initial();
        let config = SearchConfig::default()
            .with_side(Side::Near)
            .with_min_depth(1)
            .with_time_budget(Duration::from_millis(30));
        let engine = SearchEngine::new(config);

        let started = Instant::now();
        let result = engine.compute_best_move(&state).unwrap();
        let elapsed = started.elapsed();

        assert!(result.depth >= 1);
        assert!(state.is_legal_move(result.from, result.to));
        assert!(elapsed >= Duration::from_millis(30));

        // The reported move is exactly what a full search to that depth finds
        let full = SearchEngine::new(SearchConfig::fixed_depth(Side::Near, result.depth))
            .compute_best_move(&state)
            .unwrap();
        assert_eq!((full.from, full.to, full.score), (result.from, result.to, result.score));
    }

    #[test]
    fn test_budget_spent_is_inclusive() {
        let started = Instant::now() - Duration::from_millis(5);
        assert!(budget_spent(started, Duration::ZERO));
        assert!(budget_spent(started, Duration::from_millis(5)));
        assert!(!budget_spent(started, Duration::from_secs(60)));
    }

    #[test]
    fn test_cancelled_iteration_unwinds() {
        let state = BoardState::initial();
        let heuristics = Heuristics::default();
        let mut search = Search {
            side: Side::Far,
            heuristics: &heuristics,
            started: Instant::now() - Duration::from_secs(1),
            budget: Duration::ZERO,
            interruptible: true,
            nodes: 0,
        };
        assert_eq!(search.root(&state, 4), Err(Cancelled));
        assert_eq!(search.nodes, 1);
    }
}
