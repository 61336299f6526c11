//! Error types.
//!
//! Two tiers: [`MoveError`] and [`PhaseError`] are ordinary rule outcomes the
//! caller is expected to branch on; [`StateError`] and [`SettingsError`] mean
//! the caller handed the engine data that can never describe a real game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::{Player, Point};

/// Why a move was rejected. The game state is untouched when one is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveError {
    #[error("game is finished")]
    GameFinished,
    #[error("game is in the scoring phase; resume play first")]
    ScoringInProgress,
    #[error("not {0}'s turn")]
    WrongTurn(Player),
    #[error("invalid position")]
    InvalidPosition,
    #[error("position {0} is occupied")]
    PositionOccupied(Point),
    #[error("position {0} retakes ko")]
    KoViolation(Point),
    #[error("position {0} is suicide")]
    SuicideMove(Point),
}

/// Phase transition requested from the wrong phase.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseError {
    #[error("Can only resume from scoring phase")]
    NotScoringForResume,
    #[error("Can only finalize game during scoring phase")]
    NotScoringForFinalize,
}

/// Invalid game settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("board size {size} outside {min}..={max}")]
    BoardSize { size: usize, min: usize, max: usize },
    #[error("komi must be finite and non-negative, got {0}")]
    Komi(f64),
}

/// A game state that fails structural validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("board grid has {rows} rows but a row of {columns} columns")]
    BoardShape { rows: usize, columns: usize },
    #[error("unknown board glyph {0:?}")]
    Glyph(char),
    #[error("board is {actual}x{actual} but board_size is {expected}")]
    BoardDimension { expected: usize, actual: usize },
    #[error("stone recorded at {recorded} sits in cell {cell}")]
    StoneMisplaced { cell: Point, recorded: Point },
    #[error("move #{index} has sequence {sequence}")]
    MoveSequence { index: usize, sequence: u32 },
    #[error("move #{sequence} was played by {player} out of turn")]
    MoveOrder { sequence: u32, player: Player },
    #[error("move #{0} has a position that does not match its type")]
    MovePosition(u32),
    #[error("move #{0} follows a resignation")]
    MoveAfterResign(u32),
    #[error("current player {actual} inconsistent with history (expected {expected})")]
    CurrentPlayer { expected: Player, actual: Player },
    #[error("point {0} is off the board")]
    PointOutOfBounds(Point),
    #[error("ko point {0} is occupied")]
    KoOccupied(Point),
    #[error("pass count {0} inconsistent with phase {1}")]
    PassCount(u32, &'static str),
    #[error("pass count {pass_count} does not match {trailing} trailing passes in history")]
    PassHistory { pass_count: u32, trailing: u32 },
    #[error("history records a resignation but phase is {0}")]
    ResignNotFinished(&'static str),
    #[error("final score inconsistent with phase {0}")]
    FinalScore(&'static str),
}
