use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use casual_chess::config::{EngineConfig, DEFAULT_DEPTH};
use casual_chess::rules::{Color, Game};
use casual_chess::ui::ChessUI;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against a casual computer opponent", long_about = None)]
struct Args {
    /// Search depth in plies, counting the computer's own move
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Seed for the computer's tie-breaking, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Side the computer plays
    #[arg(long, value_enum, default_value_t = Side::Black)]
    computer_plays: Side,

    /// Pause before each computer move, in milliseconds
    #[arg(long, default_value_t = 500)]
    think_ms: u64,

    /// Start from this FEN instead of the initial position
    #[arg(long)]
    fen: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never mix with the board on stdout.
    // RUST_LOG, when set, wins over --debug.
    let default_level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = EngineConfig {
        depth: args.depth,
        seed: args.seed,
        computer_color: args.computer_plays.into(),
        think_delay: Duration::from_millis(args.think_ms),
    };

    let mut ui = match &args.fen {
        Some(fen) => ChessUI::from_game(Game::from_fen(fen)?, config)?,
        None => ChessUI::new(config)?,
    };

    let stdin = io::stdin();
    ui.play_game(stdin.lock(), io::stdout())?;
    Ok(())
}
