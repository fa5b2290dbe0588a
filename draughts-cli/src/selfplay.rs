//! Selfplay command - engine-vs-engine games
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), play_all(), report_results()
//! - Level 3: play_single_game(), play_random_opening()

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use draughts_core::{play_game, BoardState, GameStatus, SearchConfig, Side};

use crate::SideArg;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Search config JSON file shared by both engines
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum (uninterruptible) search depth
    #[arg(long)]
    pub min_depth: Option<u32>,

    /// Maximum search depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Time budget per move in milliseconds
    #[arg(long)]
    pub time_ms: Option<u64>,

    /// Side that moves first
    #[arg(long, value_enum, default_value = "near")]
    pub first: SideArg,

    /// Random legal plies played before the engines take over
    #[arg(long, default_value = "0")]
    pub random_plies: usize,

    /// Plies after which a game is abandoned as unfinished
    #[arg(long, default_value = "200")]
    pub max_plies: usize,

    /// Play games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameSummary {
    game: usize,
    status: GameStatus,
    plies: usize,
    near_pieces: usize,
    far_pieces: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args)?;
    let seed = seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Starting selfplay: {} games, depth {}..{:?}, {} ms/move, seed {}",
        args.games,
        config.min_depth,
        config.max_depth,
        config.time_budget_ms,
        seed
    );

    let summaries = play_all(&config, &args, seed);
    report_results(&summaries, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &SelfplayArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SearchConfig::default(),
    };

    if let Some(depth) = args.min_depth {
        config = config.with_min_depth(depth);
    }
    if let Some(depth) = args.max_depth {
        config = config.with_max_depth(depth);
    }
    if let Some(ms) = args.time_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }

    config.validate().context("Invalid search settings")?;
    Ok(config)
}

fn play_all(config: &SearchConfig, args: &SelfplayArgs, seed: u64) -> Vec<GameSummary> {
    let play = |game: usize| play_single_game(game, config, args, seed);

    if args.parallel {
        (1..=args.games).into_par_iter().map(play).collect()
    } else {
        (1..=args.games).map(play).collect()
    }
}

fn report_results(summaries: &[GameSummary], args: &SelfplayArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(summaries)?);
        return Ok(());
    }

    let near_wins = summaries.iter().filter(|s| s.status == GameStatus::NearWins).count();
    let far_wins = summaries.iter().filter(|s| s.status == GameStatus::FarWins).count();
    let unfinished = summaries.len() - near_wins - far_wins;

    for s in summaries {
        println!(
            "Game {}: {:?} after {} plies ({} near / {} far pieces left)",
            s.game, s.status, s.plies, s.near_pieces, s.far_pieces
        );
    }
    println!();
    println!("Near wins:  {}", near_wins);
    println!("Far wins:   {}", far_wins);
    println!("Unfinished: {}", unfinished);

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(game: usize, config: &SearchConfig, args: &SelfplayArgs, seed: u64) -> GameSummary {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(game as u64));

    let (state, to_move, opening_plies) =
        play_random_opening(BoardState::initial(), args.first.into(), args.random_plies, &mut rng);

    let record = play_game(
        config.clone(),
        config.clone(),
        state,
        to_move,
        args.max_plies.saturating_sub(opening_plies),
    );
    let plies = opening_plies + record.plies;

    tracing::info!("Game {}: {:?} ({} plies)", game, record.status, plies);

    GameSummary {
        game,
        status: record.status,
        plies,
        near_pieces: record.final_state.pieces(Side::Near).len(),
        far_pieces: record.final_state.pieces(Side::Far).len(),
    }
}

/// Play up to `plies` uniformly random legal moves
fn play_random_opening(
    mut state: BoardState,
    mut to_move: Side,
    plies: usize,
    rng: &mut ChaCha8Rng,
) -> (BoardState, Side, usize) {
    let mut played = 0;

    while played < plies {
        let moves = state.legal_moves(to_move);
        let Some(&(from, to)) = moves.choose(rng) else {
            break;
        };
        state.make_move(from, to);
        to_move = to_move.opponent();
        played += 1;
    }

    (state, to_move, played)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_opening_is_seeded() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        let (first, side_a, n_a) = play_random_opening(BoardState::initial(), Side::Near, 6, &mut a);
        let (second, side_b, n_b) = play_random_opening(BoardState::initial(), Side::Near, 6, &mut b);

        assert_eq!(first, second);
        assert_eq!(side_a, side_b);
        assert_eq!(n_a, 6);
        assert_eq!(n_b, 6);
        assert!(first.is_consistent());
    }
}
