//! Move validation and execution.
//!
//! [`validate_move`] runs every check before anything changes, and
//! [`apply_move`] builds the successor state on a clone, so a rejected move
//! leaves the caller's state exactly as it was.

use tracing::{debug, info};

use crate::board::violates_ko_rule;
use crate::constants::MAX_CONSECUTIVE_PASSES;
use crate::error::MoveError;
use crate::point::{Player, Point, Stone};
use crate::scoring::resignation_score;
use crate::state::{GamePhase, GameState, Move, MoveType};

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub mv: Move,
    /// Stones removed by this move, sorted.
    pub captured: Vec<Point>,
}

/// Check whether `player` may make this move in `state`.
///
/// Checks run in order: finished game, scoring phase, turn, then for stone
/// placements position present, on the board, empty, not the ko point and not
/// suicide.
pub fn validate_move(
    state: &GameState,
    player: Player,
    move_type: MoveType,
    point: Option<Point>,
) -> Result<(), MoveError> {
    match state.phase {
        GamePhase::Finished => return Err(MoveError::GameFinished),
        GamePhase::Scoring => return Err(MoveError::ScoringInProgress),
        GamePhase::Playing => {}
    }
    if player != state.current_player {
        return Err(MoveError::WrongTurn(player));
    }
    if move_type != MoveType::PlaceStone {
        return Ok(());
    }

    let point = point.ok_or(MoveError::InvalidPosition)?;
    if !state.board.in_bounds(point) {
        return Err(MoveError::InvalidPosition);
    }
    if !state.board.is_empty_at(point) {
        return Err(MoveError::PositionOccupied(point));
    }
    if violates_ko_rule(point, state.ko_point) {
        return Err(MoveError::KoViolation(point));
    }
    if state.board.is_suicide_move(point, player) {
        return Err(MoveError::SuicideMove(point));
    }
    Ok(())
}

/// Validate and apply a move, returning the successor state.
pub fn apply_move(
    state: &GameState,
    player: Player,
    move_type: MoveType,
    point: Option<Point>,
) -> Result<(GameState, MoveOutcome), MoveError> {
    validate_move(state, player, move_type, point)?;

    let mut next = state.clone();
    let sequence = next.next_sequence();
    let mut captured = Vec::new();

    let recorded_point = match move_type {
        MoveType::PlaceStone => {
            let point = point.ok_or(MoveError::InvalidPosition)?;
            captured = place_stone(&mut next, state, player, point, sequence);
            Some(point)
        }
        MoveType::Pass => {
            next.pass_count += 1;
            next.ko_point = None;
            next.current_player = player.opponent();
            if next.pass_count >= MAX_CONSECUTIVE_PASSES {
                next.phase = GamePhase::Scoring;
                info!(game.id = %next.id, sequence, "Consecutive passes, entering scoring");
            }
            None
        }
        MoveType::Resign => {
            next.phase = GamePhase::Finished;
            next.ko_point = None;
            next.final_score = Some(resignation_score(
                next.captured_stones.black.len(),
                next.captured_stones.white.len(),
                next.komi,
                player,
            ));
            info!(game.id = %next.id, %player, "Player resigned, game finished");
            None
        }
    };

    let mv = Move::new(player, move_type, recorded_point, sequence);
    next.move_history.push(mv.clone());
    debug!(
        game.id = %next.id,
        sequence,
        %player,
        ?move_type,
        point = ?recorded_point,
        captured = captured.len(),
        "Move applied"
    );
    Ok((next, MoveOutcome { mv, captured }))
}

/// Place a stone on `next`, remove whatever it captures and update ko, pass
/// count and turn. Captures are found on `before`, the pre-placement board.
fn place_stone(
    next: &mut GameState,
    before: &GameState,
    player: Player,
    point: Point,
    sequence: u32,
) -> Vec<Point> {
    let mut captured: Vec<Point> = before
        .board
        .captured_groups(point, player)
        .into_iter()
        .flatten()
        .collect();
    captured.sort();

    next.board.set(
        point,
        Some(Stone {
            point,
            player,
            move_number: sequence,
        }),
    );
    next.board.remove_stones(&captured);
    next.captured_stones
        .by_mut(player)
        .extend(captured.iter().copied());

    // Only an immediate single-stone recapture is blocked; no superko.
    next.ko_point = match captured.as_slice() {
        [single] if next.board.group(point).len() == 1 => Some(*single),
        _ => None,
    };
    next.pass_count = 0;
    next.current_player = player.opponent();
    captured
}
