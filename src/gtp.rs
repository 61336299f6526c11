//! Go Text Protocol (GTP) front end.
//!
//! GTP is a text-based protocol for communicating with Go programs. This
//! module speaks the rules-keeping subset of GTP version 2 over any
//! `BufRead`/`Write` pair, so a GUI such as Sabaki or GoGui can use the engine
//! as a referee. A few extension commands expose dead-stone marking and state
//! snapshots.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`,
//!   `known_command <cmd>`, `quit`
//! - `boardsize <size>` - Start a new game on a `size` board
//! - `clear_board` - Start a new game with the same settings
//! - `komi <value>` - Set komi (before the first move)
//! - `play <color> <vertex|pass|resign>` - Make a move
//! - `showboard` - Print the board
//! - `captures <color>` - Stones captured by `color`
//! - `final_score` - Score preview while scoring, result once finished
//! - `mark_dead <vertex>` - Toggle the dead mark of a group while scoring
//! - `dead_stones` - List points marked dead
//! - `resume` - Leave scoring and continue play
//! - `finalize` - Freeze the score and finish the game
//! - `phase` - Current game phase
//! - `dump_state` - Game state as one line of JSON
//! - `load_state <json>` - Replace the game with a JSON state
//!
//! ## Example
//!
//! ```ignore
//! use tengen::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(Game::default());
//! engine.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::debug;

use crate::game::Game;
use crate::point::{Player, parse_coord, str_coord};
use crate::state::{GameSettingsOverrides, GameState, MoveType};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "captures",
    "clear_board",
    "dead_stones",
    "dump_state",
    "final_score",
    "finalize",
    "known_command",
    "komi",
    "list_commands",
    "load_state",
    "mark_dead",
    "name",
    "phase",
    "play",
    "protocol_version",
    "quit",
    "resume",
    "showboard",
    "version",
];

/// GTP session state.
pub struct GtpEngine {
    game: Game,
}

impl GtpEngine {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("reading GTP input")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            // Parse command and arguments
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();
            debug!(command = %command, args = ?args, "GTP command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n").context("writing GTP response")?;
            output.flush().context("flushing GTP response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        let size = self.game.game_state().board_size;

        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(board_size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                self.restart(GameSettingsOverrides {
                    board_size: Some(board_size),
                    ..Default::default()
                })
                .unwrap_or_else(|_| (false, "unacceptable size".to_string()))
            }

            "clear_board" => self
                .restart(GameSettingsOverrides::default())
                .unwrap_or_else(|e| (false, e)),

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(komi) = arg.parse::<f64>() else {
                    return (false, "invalid komi".to_string());
                };
                if !self.game.move_history().is_empty() {
                    return (false, "cannot change komi after the first move".to_string());
                }
                self.restart(GameSettingsOverrides {
                    komi: Some(komi),
                    ..Default::default()
                })
                .unwrap_or_else(|_| (false, "invalid komi".to_string()))
            }

            "play" => self.play(args, size),

            "showboard" => (true, format!("\n{}", self.game.game_state().board)),

            "captures" => {
                let Some(player) = args.first().and_then(|a| Player::parse(a)) else {
                    return (false, "invalid color".to_string());
                };
                let count = self.game.captured_stones().by(player).len();
                (true, count.to_string())
            }

            "final_score" => match self.game.current_score() {
                Some(score) => (true, score.summary()),
                None => (false, "game is still in play".to_string()),
            },

            "mark_dead" => {
                let Some(point) = args.first().and_then(|a| parse_coord(a, size)) else {
                    return (false, "invalid vertex".to_string());
                };
                if self.game.mark_dead_stones(point) {
                    (true, String::new())
                } else {
                    (false, "cannot mark that point".to_string())
                }
            }

            "dead_stones" => {
                let mut dead: Vec<_> = self.game.dead_stones().into_iter().collect();
                dead.sort();
                let coords: Vec<String> = dead.into_iter().map(|p| str_coord(p, size)).collect();
                (true, coords.join(" "))
            }

            "resume" => match self.game.resume_playing() {
                Ok(()) => (true, String::new()),
                Err(e) => (false, e.to_string()),
            },

            "finalize" => match self.game.finalize_game() {
                Ok(score) => (true, score.summary()),
                Err(e) => (false, e.to_string()),
            },

            "phase" => (true, self.game.phase().as_str().to_lowercase()),

            "dump_state" => match serde_json::to_string(&self.game.game_state()) {
                Ok(json) => (true, json),
                Err(e) => (false, format!("cannot serialize state: {e}")),
            },

            "load_state" => {
                let json = args.join(" ");
                let state: GameState = match serde_json::from_str(&json) {
                    Ok(s) => s,
                    Err(e) => return (false, format!("invalid state: {e}")),
                };
                match self.game.load_game_state(state) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, format!("invalid state: {e}")),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// `play <color> <vertex>`
    fn play(&mut self, args: &[&str], size: usize) -> (bool, String) {
        let [color, vertex, ..] = args else {
            return (false, "missing arguments".to_string());
        };
        let Some(player) = Player::parse(color) else {
            return (false, "invalid color".to_string());
        };

        let vertex = vertex.to_lowercase();
        let (move_type, point) = match vertex.as_str() {
            "pass" => (MoveType::Pass, None),
            "resign" => (MoveType::Resign, None),
            v => match parse_coord(v, size) {
                Some(p) => (MoveType::PlaceStone, Some(p)),
                None => return (false, "invalid vertex".to_string()),
            },
        };

        match self.game.make_move(player, move_type, point) {
            Ok(_) => (true, String::new()),
            Err(e) => (false, format!("illegal move: {e}")),
        }
    }

    /// Replace the game with a fresh one built from the current settings.
    fn restart(&mut self, overrides: GameSettingsOverrides) -> Result<(bool, String), String> {
        let game = self.game.new_game(overrides).map_err(|e| e.to_string())?;
        self.game = game;
        Ok((true, String::new()))
    }
}
