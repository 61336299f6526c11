//! Random playouts.
//!
//! Drives a [`Game`] with uniformly random legal moves until two consecutive
//! passes or a length limit. Used by the `demo` command and as a stress
//! driver in tests; it does not try to play well.

use crate::board::Board;
use crate::game::Game;
use crate::point::{Player, Point};
use crate::rules::validate_move;
use crate::state::{GamePhase, MoveType};

/// Play random moves until the game leaves the playing phase or `max_moves`
/// moves have been made. Returns the number of moves made.
pub fn random_playout(game: &mut Game, rng: &mut fastrand::Rng, max_moves: usize) -> usize {
    let mut played = 0;

    while played < max_moves && game.phase() == GamePhase::Playing {
        let player = game.current_player();
        match choose_random_move(game, rng) {
            Some(pt) => {
                // Chosen from validated candidates, so this cannot be rejected.
                if game.make_move(player, MoveType::PlaceStone, Some(pt)).is_err() {
                    break;
                }
            }
            None => {
                if game.make_move(player, MoveType::Pass, None).is_err() {
                    break;
                }
            }
        }
        played += 1;
    }
    played
}

/// Pick a random legal point for the side to move, skipping its own
/// single-point eyes. `None` means the side should pass.
pub fn choose_random_move(game: &Game, rng: &mut fastrand::Rng) -> Option<Point> {
    let state = game.game_state();
    let player = state.current_player;
    let size = state.board_size;

    let mut candidates: Vec<Point> = (0..size * size)
        .map(|i| Point::new(i % size, i / size))
        .filter(|&p| state.board.is_empty_at(p))
        .collect();
    rng.shuffle(&mut candidates);

    candidates.into_iter().find(|&pt| {
        !is_eyeish(&state.board, pt, player)
            && validate_move(&state, player, MoveType::PlaceStone, Some(pt)).is_ok()
    })
}

/// True if every on-board neighbor of `point` is a `player` stone.
/// May be a false eye.
pub fn is_eyeish(board: &Board, point: Point, player: Player) -> bool {
    board
        .neighbors(point)
        .all(|n| board.player_at(n) == Some(player))
}
