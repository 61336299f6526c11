//! Game state, settings and structural validation.
//!
//! [`GameState`] is a plain value: the executor and the scoring engine build a
//! new one for every transition and the manager swaps it in whole. Anything
//! loaded from outside goes through [`validate_game_state`] first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::Board;
use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_KOMI, MAX_BOARD_SIZE, MAX_CONSECUTIVE_PASSES, MIN_BOARD_SIZE,
};
use crate::error::{SettingsError, StateError};
use crate::point::{Player, Point};
use crate::scoring::GameScore;

/// Overall game progression.
///
/// `Playing -> Scoring` on the second consecutive pass, `Scoring -> Playing`
/// on resume, `Scoring -> Finished` on finalize, `Playing -> Finished` on
/// resignation. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Playing,
    Scoring,
    Finished,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Playing => "PLAYING",
            GamePhase::Scoring => "SCORING",
            GamePhase::Finished => "FINISHED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveType {
    PlaceStone,
    Pass,
    Resign,
}

/// One entry of the move history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub id: Uuid,
    pub player: Player,
    pub move_type: MoveType,
    /// Present iff `move_type` is `PlaceStone`.
    pub point: Option<Point>,
    /// 1-based position in the history.
    pub sequence: u32,
    pub timestamp: DateTime<Utc>,
}

impl Move {
    pub(crate) fn new(player: Player, move_type: MoveType, point: Option<Point>, sequence: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            move_type,
            point,
            sequence,
            timestamp: Utc::now(),
        }
    }
}

/// Stones captured *by* each player, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedStones {
    pub black: Vec<Point>,
    pub white: Vec<Point>,
}

impl CapturedStones {
    pub fn by(&self, player: Player) -> &[Point] {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    pub(crate) fn by_mut(&mut self, player: Player) -> &mut Vec<Point> {
        match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        }
    }
}

/// Clock configuration. Stored and round-tripped; enforcement is up to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSettings {
    pub main_time_secs: u32,
    pub byo_yomi_secs: u32,
    pub byo_yomi_periods: u32,
}

/// Display names of the two sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    pub black: String,
    pub white: String,
}

/// Everything needed to start a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub board_size: usize,
    pub komi: f64,
    pub time_settings: Option<TimeSettings>,
    pub players: Option<Players>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            time_settings: None,
            players: None,
        }
    }
}

impl GameSettings {
    /// Default settings on a `board_size` board.
    pub fn with_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_board_size(self.board_size)?;
        validate_komi(self.komi)
    }
}

/// Per-field replacements for [`Game::new_game`](crate::game::Game::new_game).
/// `None` keeps the current game's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSettingsOverrides {
    pub board_size: Option<usize>,
    pub komi: Option<f64>,
    pub time_settings: Option<TimeSettings>,
    pub players: Option<Players>,
}

impl GameSettingsOverrides {
    pub fn apply(self, base: &GameSettings) -> GameSettings {
        GameSettings {
            board_size: self.board_size.unwrap_or(base.board_size),
            komi: self.komi.unwrap_or(base.komi),
            time_settings: self.time_settings.or(base.time_settings),
            players: self.players.or_else(|| base.players.clone()),
        }
    }
}

fn validate_board_size(size: usize) -> Result<(), SettingsError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(SettingsError::BoardSize {
            size,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        });
    }
    Ok(())
}

fn validate_komi(komi: f64) -> Result<(), SettingsError> {
    if !komi.is_finite() || komi < 0.0 {
        return Err(SettingsError::Komi(komi));
    }
    Ok(())
}

/// Authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub board: Board,
    pub board_size: usize,
    pub current_player: Player,
    pub phase: GamePhase,
    pub move_history: Vec<Move>,
    pub captured_stones: CapturedStones,
    pub ko_point: Option<Point>,
    pub pass_count: u32,
    pub komi: f64,
    pub final_score: Option<GameScore>,
    pub time_settings: Option<TimeSettings>,
}

impl GameState {
    /// Fresh game: empty board, Black to move.
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            board: Board::new(settings.board_size),
            board_size: settings.board_size,
            current_player: Player::Black,
            phase: GamePhase::Playing,
            move_history: Vec::new(),
            captured_stones: CapturedStones::default(),
            ko_point: None,
            pass_count: 0,
            komi: settings.komi,
            final_score: None,
            time_settings: settings.time_settings,
        }
    }

    /// Sequence number the next move will get.
    pub fn next_sequence(&self) -> u32 {
        self.move_history.len() as u32 + 1
    }
}

/// Structural self-check of a game state.
///
/// Verifies the board matches `board_size`, every stone sits in its own cell,
/// the history is numbered and alternates, `current_player` follows from the
/// history, recorded points are on the board, and pass count and final score
/// agree with the phase.
pub fn validate_game_state(state: &GameState) -> Result<(), StateError> {
    validate_board_size(state.board_size)?;
    validate_komi(state.komi)?;

    let size = state.board_size;
    if state.board.size() != size {
        return Err(StateError::BoardDimension {
            expected: size,
            actual: state.board.size(),
        });
    }
    for y in 0..size {
        for x in 0..size {
            let cell = Point::new(x, y);
            if let Some(stone) = state.board.get(cell) {
                if stone.point != cell {
                    return Err(StateError::StoneMisplaced {
                        cell,
                        recorded: stone.point,
                    });
                }
            }
        }
    }

    let summary = validate_history(&state.move_history, size)?;
    if state.current_player != summary.to_move {
        return Err(StateError::CurrentPlayer {
            expected: summary.to_move,
            actual: state.current_player,
        });
    }
    if summary.resigned && state.phase != GamePhase::Finished {
        return Err(StateError::ResignNotFinished(state.phase.as_str()));
    }
    // Resuming from scoring zeroes the counter but leaves the passes in the
    // history, so only a run long enough to have reached scoring may exceed it.
    let pass_count_matches = if summary.trailing_passes >= MAX_CONSECUTIVE_PASSES {
        state.pass_count <= summary.trailing_passes
    } else {
        state.pass_count == summary.trailing_passes
    };
    if !pass_count_matches {
        return Err(StateError::PassHistory {
            pass_count: state.pass_count,
            trailing: summary.trailing_passes,
        });
    }

    if let Some(ko) = state.ko_point {
        if !ko.in_bounds(size) {
            return Err(StateError::PointOutOfBounds(ko));
        }
        if !state.board.is_empty_at(ko) {
            return Err(StateError::KoOccupied(ko));
        }
    }
    for &p in state
        .captured_stones
        .black
        .iter()
        .chain(state.captured_stones.white.iter())
    {
        if !p.in_bounds(size) {
            return Err(StateError::PointOutOfBounds(p));
        }
    }

    let phase = state.phase.as_str();
    match state.phase {
        GamePhase::Playing => {
            if state.pass_count >= MAX_CONSECUTIVE_PASSES {
                return Err(StateError::PassCount(state.pass_count, phase));
            }
            if state.final_score.is_some() {
                return Err(StateError::FinalScore(phase));
            }
        }
        GamePhase::Scoring => {
            if state.pass_count < MAX_CONSECUTIVE_PASSES {
                return Err(StateError::PassCount(state.pass_count, phase));
            }
            if state.final_score.is_some() {
                return Err(StateError::FinalScore(phase));
            }
        }
        GamePhase::Finished => {
            if state.final_score.is_none() {
                return Err(StateError::FinalScore(phase));
            }
        }
    }
    Ok(())
}

/// What a well-formed move history implies about the state that follows it.
struct HistorySummary {
    to_move: Player,
    trailing_passes: u32,
    resigned: bool,
}

/// Check numbering, alternation and point presence.
fn validate_history(history: &[Move], size: usize) -> Result<HistorySummary, StateError> {
    let mut to_move = Player::Black;
    let mut trailing_passes = 0;
    let mut resigned = false;

    for (index, mv) in history.iter().enumerate() {
        if mv.sequence as usize != index + 1 {
            return Err(StateError::MoveSequence {
                index,
                sequence: mv.sequence,
            });
        }
        if resigned {
            return Err(StateError::MoveAfterResign(mv.sequence));
        }
        if mv.player != to_move {
            return Err(StateError::MoveOrder {
                sequence: mv.sequence,
                player: mv.player,
            });
        }
        match (mv.move_type, mv.point) {
            (MoveType::PlaceStone, Some(p)) => {
                if !p.in_bounds(size) {
                    return Err(StateError::PointOutOfBounds(p));
                }
                to_move = to_move.opponent();
                trailing_passes = 0;
            }
            (MoveType::Pass, None) => {
                to_move = to_move.opponent();
                trailing_passes += 1;
            }
            (MoveType::Resign, None) => resigned = true,
            _ => return Err(StateError::MovePosition(mv.sequence)),
        }
    }
    Ok(HistorySummary {
        to_move,
        trailing_passes,
        resigned,
    })
}
