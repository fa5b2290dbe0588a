//! Bestmove command - search a saved position

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use draughts_core::{BoardState, GameStatus, SearchConfig, SearchEngine, Square};

use crate::SideArg;

#[derive(Args)]
pub struct BestmoveArgs {
    /// Position snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub position: PathBuf,

    /// Search config JSON file (defaults when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Side to move (overrides the config)
    #[arg(long, value_enum)]
    pub side: Option<SideArg>,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct BestmoveReport {
    from: Square,
    to: Square,
    score: f32,
    depth: u32,
    nodes: u64,
}

pub fn run(args: BestmoveArgs) -> Result<()> {
    let state = load_position(&args.position)?;

    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(side) = args.side {
        config = config.with_side(side.into());
    }

    let status = state.game_status(config.side);
    if status != GameStatus::Ongoing {
        println!("Game over: {:?}", status);
        return Ok(());
    }

    let engine = SearchEngine::new(config);
    let result = engine
        .compute_best_move(&state)
        .context("Engine found no legal move")?;

    if args.json {
        let report = BestmoveReport {
            from: result.from,
            to: result.to,
            score: result.score,
            depth: result.depth,
            nodes: result.nodes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} -> {} (score {}, depth {}, {} nodes)",
            result.from, result.to, result.score, result.depth, result.nodes
        );
    }

    Ok(())
}

fn load_position(path: &Path) -> Result<BoardState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read position: {}", path.display()))?;
    BoardState::from_json(&content)
        .with_context(|| format!("Failed to parse position: {}", path.display()))
}
