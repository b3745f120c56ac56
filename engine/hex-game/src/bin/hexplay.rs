//! Thin command-line runner for the Hex engine.
//!
//! Plays bot-vs-bot by default; `--human` puts you in the Blue seat,
//! entering moves as `<row> <letter>` (e.g. `3 a`). Flags map directly onto
//! the engine configuration.

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use hex_board::CellState;
use hex_game::{Game, HumanPlayer, MctsPlayer, Player};
use mcts::MctsConfig;

#[derive(Parser, Debug)]
#[command(name = "hexplay", about = "Play Hex against the MCTS engine or watch it play itself")]
struct Args {
    /// Board size (clamped to 2..=11)
    #[arg(long, default_value_t = 5)]
    size: usize,

    /// Decision time per engine move in milliseconds (minimum 100)
    #[arg(long, default_value_t = 1000)]
    time_ms: u64,

    /// Exploration constant of the UCT formula (clamped to 0.1..=2.0)
    #[arg(long, default_value_t = 1.41)]
    exploration: f64,

    /// Run one playout per core from each selected child
    #[arg(long)]
    parallel: bool,

    /// Print the full search trace (incompatible with --parallel)
    #[arg(long)]
    verbose: bool,

    /// Take the Blue seat yourself instead of watching two engines
    #[arg(long)]
    human: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = MctsConfig::default()
        .with_exploration(args.exploration.clamp(0.1, 2.0))
        .with_deadline(Duration::from_millis(args.time_ms.max(100)))
        .with_parallel(args.parallel)
        .with_verbose(args.verbose);

    let blue: Box<dyn Player> = if args.human {
        Box::new(HumanPlayer::new(io::stdin().lock()))
    } else {
        Box::new(MctsPlayer::new(config.clone())?)
    };
    let red: Box<dyn Player> = Box::new(MctsPlayer::new(config)?);

    let mut game = Game::new(args.size.clamp(2, 11), blue, red)?;
    let winner = game.play()?;

    println!("{}", game.board());
    let label = match winner {
        CellState::Blue => "Blue",
        CellState::Red => "Red",
        CellState::Empty => unreachable!("a finished game has a winner"),
    };
    println!("Player {label} ({winner}) wins!");
    Ok(())
}
