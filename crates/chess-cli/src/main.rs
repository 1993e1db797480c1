//! chess-cli - command-line driver for the chess rules engine.
//!
//! Runs perft as a move generator oracle, normalizes FEN, lists and plays
//! moves, and imports or exports PGN.

mod config;
mod json_output;
mod parallel;

use anyhow::{bail, Context};
use chess_rules::{parse_pgn, PgnTags, Position};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::ChessConfig;
use json_output::{DivideEntry, PerftReport};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Chess rules engine: perft, FEN, moves and PGN")]
struct Cli {
    /// Configuration file (defaults to chess.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Search depth (defaults to the configured depth)
        depth: Option<u32>,
        /// Root position in FEN
        #[arg(long)]
        fen: Option<String>,
        /// Print node counts per root move
        #[arg(long)]
        divide: bool,
        /// Worker threads for splitting root moves
        #[arg(long)]
        threads: Option<usize>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a FEN and print it normalized
    Fen {
        fen: String,
        /// Also draw the board
        #[arg(long)]
        board: bool,
    },
    /// List the legal moves of a position
    Moves {
        /// Position in FEN (defaults to the starting position)
        #[arg(long)]
        fen: Option<String>,
        /// Print UCI instead of SAN
        #[arg(long)]
        uci: bool,
    },
    /// Play a sequence of SAN or UCI moves
    Play {
        /// Moves to play, e.g. `e4 e5 Nf3` or `e2e4 e7e5`
        moves: Vec<String>,
        /// Starting position in FEN
        #[arg(long)]
        fen: Option<String>,
        /// Print the game as PGN instead of the final FEN
        #[arg(long)]
        pgn: bool,
    },
    /// Read games from a PGN file (`-` for stdin)
    Pgn {
        file: PathBuf,
        /// Write every game back out as PGN
        #[arg(long)]
        export: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ChessConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Perft {
            depth,
            fen,
            divide,
            threads,
            json,
        } => {
            let position = load_position(fen.as_deref())?;
            let depth = depth.unwrap_or(config.perft.depth);
            let threads = threads.unwrap_or(config.perft.threads);
            run_perft(&position, depth, threads, divide, json)?;
        }
        Commands::Fen { fen, board } => {
            let position = load_position(Some(&fen))?;
            println!("{}", position.to_fen());
            if board {
                println!("{:?}", position.board());
            }
            describe(&position);
        }
        Commands::Moves { fen, uci } => {
            let position = load_position(fen.as_deref())?;
            let mut listed: Vec<String> = position
                .legal_moves()
                .iter()
                .map(|mv| if uci { mv.to_uci() } else { position.san(mv) })
                .collect();
            listed.sort();
            println!("{}", listed.join(" "));
        }
        Commands::Play { moves, fen, pgn } => {
            let mut position = load_position(fen.as_deref())?;
            for text in &moves {
                position = play_one(&position, text)?;
            }
            if pgn {
                print!("{}", position.to_pgn(&config.pgn.to_tags()));
            } else {
                println!("{}", position.to_fen());
                describe(&position);
            }
        }
        Commands::Pgn { file, export } => {
            let text = if file.as_os_str() == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            } else {
                std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?
            };
            let games = parse_pgn(&text)?;
            tracing::info!(games = games.len(), "PGN imported");

            for (index, game) in games.iter().enumerate() {
                if export {
                    let tags = PgnTags {
                        event: game.tag("Event").unwrap_or_default().to_string(),
                        site: game.tag("Site").unwrap_or_default().to_string(),
                        date: game
                            .tag("Date")
                            .and_then(|d| NaiveDate::parse_from_str(d, "%Y.%m.%d").ok()),
                        round: game.tag("Round").unwrap_or_default().to_string(),
                        white: game.tag("White").unwrap_or_default().to_string(),
                        black: game.tag("Black").unwrap_or_default().to_string(),
                    };
                    println!("{}", game.position.to_pgn(&tags));
                } else {
                    let result = game
                        .position
                        .result()
                        .map_or("*", |r| r.pgn_token());
                    println!(
                        "{}. {} - {} ({} moves, {}) {}",
                        index + 1,
                        game.tag("White").unwrap_or("?"),
                        game.tag("Black").unwrap_or("?"),
                        game.position.history_len(),
                        result,
                        game.position.to_fen()
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_position(fen: Option<&str>) -> anyhow::Result<Position> {
    match fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen)),
        None => Ok(Position::startpos()),
    }
}

/// Plays `text` as UCI if it reads as coordinates, otherwise as SAN.
fn play_one(position: &Position, text: &str) -> anyhow::Result<Position> {
    if let Some(mv) = position.parse_uci(text) {
        if let Some(reason) = position.invalid(&mv) {
            bail!("{} is illegal: {}", text, reason);
        }
        return Ok(position.play(&mv));
    }
    position
        .play_san(text)
        .with_context(|| format!("cannot play {} in {}", text, position.to_fen()))
}

fn describe(position: &Position) {
    if let Some(result) = position.result() {
        println!("Game over: {}", result);
    } else if position.is_check() {
        println!("{} to move, in check", position.side_to_move());
    } else {
        println!("{} to move", position.side_to_move());
    }
}

fn run_perft(
    position: &Position,
    depth: u32,
    threads: usize,
    divide: bool,
    json: bool,
) -> anyhow::Result<()> {
    tracing::info!(depth, threads, fen = %position.to_fen(), "starting perft");
    let start = Instant::now();

    let (nodes, counts) = if depth == 0 {
        (1, Vec::new())
    } else {
        let counts = parallel::divide(position, depth, threads);
        (counts.iter().map(|(_, n)| n).sum::<u64>(), counts)
    };

    let elapsed = start.elapsed();
    let nps = if elapsed.as_secs_f64() > 0.0 {
        (nodes as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };
    tracing::info!(nodes, elapsed_ms = elapsed.as_millis() as u64, nps, "perft finished");

    if json {
        let fen = position.to_fen();
        let report = PerftReport {
            fen: &fen,
            depth,
            nodes,
            elapsed_ms: elapsed.as_millis(),
            divide: if divide {
                counts
                    .into_iter()
                    .map(|(uci, nodes)| DivideEntry { uci, nodes })
                    .collect()
            } else {
                Vec::new()
            },
        };
        json_output::write_json(std::io::stdout().lock(), &report)?;
        return Ok(());
    }

    if divide {
        for (uci, count) in &counts {
            println!("{}: {}", uci, count);
        }
        println!();
    }
    println!("Nodes searched: {}", nodes);
    Ok(())
}
