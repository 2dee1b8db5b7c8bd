//! chess-perft - move generator diagnostics.
//!
//! Counts leaf nodes of the legal move tree, splits them by root move, and
//! checks positions against known counts.

mod suite;

use anyhow::{bail, Context};
use chess_core::Fen;
use chess_engine::{perft, perft_divide, status, Board};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use suite::Suite;
use tracing_subscriber::EnvFilter;

/// Perft and divide for the chess rules engine.
#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Counts legal move trees and checks them against known values")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes to a depth
    Perft {
        /// Position to start from
        #[arg(long, default_value = Fen::STARTPOS)]
        fen: String,

        /// Search depth in plies
        #[arg(short, long, default_value = "4")]
        depth: u32,
    },
    /// Count leaf nodes per root move
    Divide {
        #[arg(long, default_value = Fen::STARTPOS)]
        fen: String,

        #[arg(short, long, default_value = "3")]
        depth: u32,
    },
    /// Check a suite of positions against expected counts
    Suite {
        /// TOML suite file; the built-in reference positions if omitted
        #[arg(long)]
        file: Option<PathBuf>,

        /// Skip expected counts deeper than this
        #[arg(long, default_value = "4")]
        max_depth: u32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    match args.command {
        Command::Perft { fen, depth } => run_perft(&fen, depth),
        Command::Divide { fen, depth } => run_divide(&fen, depth),
        Command::Suite { file, max_depth } => run_suite(file, max_depth),
    }
}

fn load_board(fen: &str) -> anyhow::Result<Board> {
    Board::from_fen(fen).with_context(|| format!("invalid FEN: {fen}"))
}

fn run_perft(fen: &str, depth: u32) -> anyhow::Result<()> {
    let mut board = load_board(fen)?;
    tracing::info!("Position: {}", board.to_fen());
    tracing::info!("Status: {}", status(&mut board));

    for d in 1..=depth {
        let start = Instant::now();
        let nodes = perft(&mut board, d);
        let elapsed = start.elapsed();
        let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
        println!("depth {d:>2}  nodes {nodes:>12}  {:>8.3}s  {:>12.0} nps", elapsed.as_secs_f64(), nps);
    }
    Ok(())
}

fn run_divide(fen: &str, depth: u32) -> anyhow::Result<()> {
    if depth == 0 {
        bail!("divide needs a depth of at least 1");
    }
    let mut board = load_board(fen)?;
    println!("{board}");
    println!();

    let results = perft_divide(&mut board, depth);
    let mut total = 0;
    for (m, nodes) in &results {
        println!("{m}: {nodes}");
        total += nodes;
    }
    println!();
    println!("moves: {}", results.len());
    println!("nodes: {total}");
    Ok(())
}

fn run_suite(file: Option<PathBuf>, max_depth: u32) -> anyhow::Result<()> {
    let suite = match file {
        Some(path) => Suite::load(&path)
            .with_context(|| format!("loading suite {}", path.display()))?,
        None => Suite::builtin(),
    };
    tracing::info!("Running {} positions up to depth {}", suite.positions.len(), max_depth);

    let mut failures = 0;
    for entry in &suite.positions {
        let mut board = load_board(&entry.fen)
            .with_context(|| format!("suite entry '{}'", entry.name))?;
        for (depth, &expected) in (1..=max_depth).zip(&entry.counts) {
            let nodes = perft(&mut board, depth);
            if nodes == expected {
                println!("ok    {:<12} depth {} = {}", entry.name, depth, nodes);
            } else {
                failures += 1;
                println!(
                    "FAIL  {:<12} depth {} = {} (expected {})",
                    entry.name, depth, nodes, expected
                );
                tracing::warn!(position = %entry.name, depth, nodes, expected, "perft mismatch");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} perft check(s) failed");
    }
    tracing::info!("All perft checks passed");
    Ok(())
}
