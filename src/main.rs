//! Tengen: a Go rules engine.
//!
//! ## Usage
//!
//! - `tengen` - Run the random-playout demo
//! - `tengen gtp` - Start a GTP session on stdin/stdout
//! - `tengen demo` - Play a random game and print the score
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tengen::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI, PLAYOUT_LENGTH_FACTOR};
use tengen::game::Game;
use tengen::gtp::GtpEngine;
use tengen::playout::random_playout;
use tengen::point::Player;
use tengen::state::{GamePhase, GameSettings, MoveType};

/// Tengen: a Go rules engine
#[derive(Parser)]
#[command(name = "tengen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args)]
struct GameArgs {
    /// Board size (NxN)
    #[arg(long, env = "TENGEN_BOARD_SIZE", default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,
    /// Komi awarded to White
    #[arg(long, env = "TENGEN_KOMI", default_value_t = DEFAULT_KOMI)]
    komi: f64,
}

impl GameArgs {
    fn settings(&self) -> GameSettings {
        GameSettings {
            board_size: self.size,
            komi: self.komi,
            ..GameSettings::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start a GTP (Go Text Protocol) session for use with GUI applications
    Gtp {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Play a random game, then print the final board and score
    Demo {
        #[command(flatten)]
        game: GameArgs,
        /// Seed for the random playout (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Maximum number of moves (defaults to three times the board area)
        #[arg(long)]
        max_moves: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp { game }) => {
            let game = Game::new(game.settings()).context("invalid game settings")?;
            let mut engine = GtpEngine::new(game);
            engine.run(io::stdin().lock(), io::stdout().lock())
        }
        Some(Commands::Demo {
            game,
            seed,
            max_moves,
        }) => run_demo(game.settings(), seed, max_moves),
        None => run_demo(GameSettings::with_size(9), None, None),
    }
}

fn run_demo(
    settings: GameSettings,
    seed: Option<u64>,
    max_moves: Option<usize>,
) -> anyhow::Result<()> {
    let size = settings.board_size;
    let mut game = Game::new(settings).context("invalid game settings")?;
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    let mut rng = fastrand::Rng::with_seed(seed);
    let limit = max_moves.unwrap_or(size * size * PLAYOUT_LENGTH_FACTOR);

    println!("Tengen: random playout on {size}x{size} (seed {seed})\n");
    let played = random_playout(&mut game, &mut rng, limit);

    // Move limit reached: close the game with two passes.
    while game.phase() == GamePhase::Playing {
        let player = game.current_player();
        game.make_move(player, MoveType::Pass, None)
            .context("passing to end the demo game")?;
    }

    let score = game.finalize_game().context("finalizing the demo game")?;
    let state = game.game_state();
    println!("{}", state.board);
    println!("Moves played: {played}");
    for player in [Player::Black, Player::White] {
        let s = score.player(player);
        let name = player.to_string();
        println!(
            "{name:>5}: territory {} + captures {} + komi {} = {}",
            s.territory, s.captures, s.komi, s.total
        );
    }
    println!("Result: {}", score.summary());
    Ok(())
}
