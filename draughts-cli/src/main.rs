//! Draughts CLI - Command-line host for the engine
//!
//! Commands:
//! - selfplay: Play engine-vs-engine games
//! - bestmove: Ask the engine for a move in a saved position
//! - init: Write the opening position as JSON

mod bestmove;
mod selfplay;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use draughts_core::{BoardState, Side};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "draughts")]
#[command(about = "Draughts rules engine and alpha-beta player")]
struct Cli {
    /// Seed for random opening plies
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play engine-vs-engine games
    Selfplay(selfplay::SelfplayArgs),
    /// Print the engine's move for a position snapshot
    Bestmove(bestmove::BestmoveArgs),
    /// Write the opening position snapshot
    Init {
        /// Output file (stdout when omitted)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Side selector for command-line flags
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SideArg {
    Near,
    Far,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Near => Side::Near,
            SideArg::Far => Side::Far,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Selfplay(args) => selfplay::run(args, cli.seed),
        Commands::Bestmove(args) => bestmove::run(args),
        Commands::Init { output } => write_initial(output),
    }
}

fn write_initial(output: Option<PathBuf>) -> Result<()> {
    let json = BoardState::initial()
        .to_json()
        .context("Failed to encode opening position")?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Opening position written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
