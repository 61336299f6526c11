//! Territory scoring.
//!
//! Territory is found by flood filling through empty points and dead stones
//! (dead stones count as already removed). A region bordered by live stones
//! of exactly one color belongs to that color; anything else, including the
//! shared points of a seki, is neutral and worth nothing.
//!
//! Totals are territory plus captures, with komi added for White. Dead stones
//! are credited to the opponent as captures.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::point::{Player, Point, PointSet};
use crate::state::GameState;

/// A connected region of empty (or dead) points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub points: BTreeSet<Point>,
    /// `None` for neutral or contested regions.
    pub owner: Option<Player>,
    /// Region size if owned, 0 if neutral.
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerScore {
    pub territory: usize,
    pub captures: usize,
    /// Live stones on the board (dead stones excluded). Informational only.
    pub stones: usize,
    pub komi: f64,
    pub total: f64,
}

impl PlayerScore {
    fn new(territory: usize, captures: usize, stones: usize, komi: f64) -> Self {
        Self {
            territory,
            captures,
            stones,
            komi,
            total: (territory + captures) as f64 + komi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    pub black: PlayerScore,
    pub white: PlayerScore,
    /// Higher total, `None` on an exact tie.
    pub winner: Option<Player>,
    #[serde(default)]
    pub resigned_by: Option<Player>,
}

impl GameScore {
    pub fn player(&self, player: Player) -> &PlayerScore {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    /// Result in the usual `B+3.5` / `W+R` / `0` notation.
    pub fn summary(&self) -> String {
        let letter = |p: Player| match p {
            Player::Black => 'B',
            Player::White => 'W',
        };
        match (self.winner, self.resigned_by) {
            (Some(w), Some(_)) => format!("{}+R", letter(w)),
            (Some(w), None) => {
                let margin = (self.black.total - self.white.total).abs();
                format!("{}+{margin}", letter(w))
            }
            (None, _) => "0".to_string(),
        }
    }
}

fn winner_of(black: &PlayerScore, white: &PlayerScore) -> Option<Player> {
    if black.total > white.total {
        Some(Player::Black)
    } else if white.total > black.total {
        Some(Player::White)
    } else {
        None
    }
}

/// Partition every empty or dead point into regions and classify them.
///
/// Regions come out in row-major order of their first point.
pub fn calculate_territories(board: &Board, dead: &PointSet) -> Vec<Territory> {
    let size = board.size();
    let is_open = |p: Point| board.get(p).is_none() || dead.contains(&p);
    let mut visited = vec![false; size * size];
    let mut territories = Vec::new();

    for y in 0..size {
        for x in 0..size {
            let start = Point::new(x, y);
            if visited[y * size + x] || !is_open(start) {
                continue;
            }

            let mut region = BTreeSet::new();
            let mut borders_black = false;
            let mut borders_white = false;
            let mut stack = vec![start];
            visited[y * size + x] = true;

            while let Some(pt) = stack.pop() {
                region.insert(pt);
                for n in board.neighbors(pt) {
                    if is_open(n) {
                        let i = n.y * size + n.x;
                        if !visited[i] {
                            visited[i] = true;
                            stack.push(n);
                        }
                    } else {
                        match board.player_at(n) {
                            Some(Player::Black) => borders_black = true,
                            Some(Player::White) => borders_white = true,
                            None => {}
                        }
                    }
                }
            }

            let owner = match (borders_black, borders_white) {
                (true, false) => Some(Player::Black),
                (false, true) => Some(Player::White),
                _ => None,
            };
            let value = if owner.is_some() { region.len() } else { 0 };
            territories.push(Territory {
                points: region,
                owner,
                value,
            });
        }
    }
    territories
}

/// Flip the dead mark of the whole group at `point`.
///
/// A group is either entirely dead or entirely alive; if any of its stones is
/// marked the whole group is revived, otherwise the whole group is marked.
/// An empty point leaves the marks unchanged.
pub fn toggle_dead_group(board: &Board, point: Point, dead: &PointSet) -> PointSet {
    let group = board.group(point);
    let mut next = dead.clone();
    if group.is_empty() {
        return next;
    }
    if group.iter().any(|p| dead.contains(p)) {
        for p in &group {
            next.remove(p);
        }
    } else {
        next.extend(group);
    }
    next
}

/// Final score from territory, captures, dead stones and komi.
pub fn calculate_final_score(
    board: &Board,
    captured_by_black: usize,
    captured_by_white: usize,
    komi: f64,
    dead: &PointSet,
) -> GameScore {
    let territories = calculate_territories(board, dead);
    let territory_of = |player: Player| -> usize {
        territories
            .iter()
            .filter(|t| t.owner == Some(player))
            .map(|t| t.value)
            .sum()
    };
    let dead_of = |player: Player| -> usize {
        dead.iter()
            .filter(|&&p| board.player_at(p) == Some(player))
            .count()
    };

    let dead_black = dead_of(Player::Black);
    let dead_white = dead_of(Player::White);

    let black = PlayerScore::new(
        territory_of(Player::Black),
        captured_by_black + dead_white,
        board.count_stones(Player::Black) - dead_black,
        0.0,
    );
    let white = PlayerScore::new(
        territory_of(Player::White),
        captured_by_white + dead_black,
        board.count_stones(Player::White) - dead_white,
        komi,
    );
    let winner = winner_of(&black, &white);
    GameScore {
        black,
        white,
        winner,
        resigned_by: None,
    }
}

/// Score recorded when `resigner` gives up: captures and komi only, and the
/// opponent wins regardless of totals.
pub fn resignation_score(
    captured_by_black: usize,
    captured_by_white: usize,
    komi: f64,
    resigner: Player,
) -> GameScore {
    GameScore {
        black: PlayerScore::new(0, captured_by_black, 0, 0.0),
        white: PlayerScore::new(0, captured_by_white, 0, komi),
        winner: Some(resigner.opponent()),
        resigned_by: Some(resigner),
    }
}

/// Dead-stone marks. Exists only while a game is in the scoring phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringState {
    dead: PointSet,
}

impl ScoringState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dead_stones(&self) -> &PointSet {
        &self.dead
    }

    /// Toggle the group at `point`. Returns false if `point` holds no stone.
    pub fn toggle(&mut self, board: &Board, point: Point) -> bool {
        if board.get(point).is_none() {
            return false;
        }
        self.dead = toggle_dead_group(board, point, &self.dead);
        true
    }

    /// Score of `state` with the current marks applied.
    pub fn score(&self, state: &GameState) -> GameScore {
        calculate_final_score(
            &state.board,
            state.captured_stones.black.len(),
            state.captured_stones.white.len(),
            state.komi,
            &self.dead,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_empty_board_is_one_neutral_region() {
        let board = Board::new(9);
        let territories = calculate_territories(&board, &PointSet::new());
        assert_eq!(territories.len(), 1);
        assert_eq!(territories[0].points.len(), 81);
        assert_eq!(territories[0].owner, None);
        assert_eq!(territories[0].value, 0);
    }

    #[test]
    fn test_enclosed_two_by_two_region() {
        let board = Board::from_diagram(&[
            "..X......", //
            "..X......", //
            "XXX......", //
            ".........", //
            ".........", //
            ".........", //
            ".........", //
            ".........", //
            ".........",
        ])
        .unwrap();
        let territories = calculate_territories(&board, &PointSet::new());
        let corner = territories
            .iter()
            .find(|t| t.points.contains(&p(0, 0)))
            .unwrap();
        assert_eq!(corner.owner, Some(Player::Black));
        assert_eq!(corner.value, 4);
        assert_eq!(corner.points.len(), 4);
    }

    #[test]
    fn test_region_bordered_by_both_is_neutral() {
        let board = Board::from_diagram(&[
            "..X..", //
            "..X..", //
            "OOX..", //
            ".....", //
            ".....",
        ])
        .unwrap();
        let territories = calculate_territories(&board, &PointSet::new());
        let corner = territories
            .iter()
            .find(|t| t.points.contains(&p(0, 0)))
            .unwrap();
        assert_eq!(corner.owner, None);
        assert_eq!(corner.value, 0);
    }

    #[test]
    fn test_regions_cover_every_open_point_once() {
        let board = Board::from_diagram(&[
            ".X.O.", //
            "XX.OO", //
            ".....", //
            "OO.XX", //
            ".O.X.",
        ])
        .unwrap();
        let territories = calculate_territories(&board, &PointSet::new());
        let covered: usize = territories.iter().map(|t| t.points.len()).sum();
        let empty = 25 - board.stones().count();
        assert_eq!(covered, empty);
    }

    #[test]
    fn test_dead_stones_become_open_space() {
        let board = Board::from_diagram(&[
            ".O.X.", //
            "...X.", //
            "XXXX.", //
            ".....", //
            ".....",
        ])
        .unwrap();
        let dead = board.group(p(1, 0));
        let territories = calculate_territories(&board, &dead);
        let corner = territories
            .iter()
            .find(|t| t.points.contains(&p(0, 0)))
            .unwrap();
        assert_eq!(corner.owner, Some(Player::Black));
        assert_eq!(corner.value, 6);
        assert!(corner.points.contains(&p(1, 0)));
    }

    #[test]
    fn test_toggle_dead_group_round_trip() {
        let board = Board::from_diagram(&[
            "OO...", //
            ".O...", //
            ".....", //
            ".....", //
            ".....",
        ])
        .unwrap();
        let empty = PointSet::new();
        let marked = toggle_dead_group(&board, p(1, 1), &empty);
        assert_eq!(marked, board.group(p(0, 0)));
        assert_eq!(marked.len(), 3);
        let unmarked = toggle_dead_group(&board, p(0, 0), &marked);
        assert!(unmarked.is_empty());
    }

    #[test]
    fn test_toggle_empty_point_is_noop() {
        let board = Board::new(5);
        let dead: PointSet = [p(0, 0)].into_iter().collect();
        assert_eq!(toggle_dead_group(&board, p(2, 2), &dead), dead);
    }

    #[test]
    fn test_komi_only_score() {
        let board = Board::new(9);
        let score = calculate_final_score(&board, 0, 0, 6.5, &PointSet::new());
        assert_eq!(score.white.total, 6.5);
        assert_eq!(score.black.total, 0.0);
        assert_eq!(score.winner, Some(Player::White));
        assert_eq!(score.summary(), "W+6.5");
    }

    #[test]
    fn test_exact_tie_has_no_winner() {
        let board = Board::new(9);
        let score = calculate_final_score(&board, 3, 3, 0.0, &PointSet::new());
        assert_eq!(score.winner, None);
        assert_eq!(score.summary(), "0");
    }

    #[test]
    fn test_dead_stones_count_as_captures() {
        let board = Board::from_diagram(&[
            ".O.X.", //
            "...X.", //
            "XXXX.", //
            ".....", //
            ".....",
        ])
        .unwrap();
        let dead = board.group(p(1, 0));
        let score = calculate_final_score(&board, 2, 0, 0.5, &dead);
        // Black: whole board minus its 6 stones is black area (19 points).
        assert_eq!(score.black.territory, 19);
        assert_eq!(score.black.captures, 3);
        assert_eq!(score.black.stones, 6);
        assert_eq!(score.white.stones, 0);
        assert_eq!(score.white.total, 0.5);
        assert_eq!(score.winner, Some(Player::Black));
    }

    #[test]
    fn test_resignation_score() {
        let score = resignation_score(4, 1, 6.5, Player::White);
        assert_eq!(score.black.territory, 0);
        assert_eq!(score.white.territory, 0);
        assert_eq!(score.black.total, 4.0);
        assert_eq!(score.white.total, 7.5);
        assert_eq!(score.winner, Some(Player::Black));
        assert_eq!(score.summary(), "B+R");
    }

    #[test]
    fn test_scoring_state_toggle() {
        let board = Board::from_diagram(&["X..", "...", "..O"]).unwrap();
        let mut scoring = ScoringState::new();
        assert!(!scoring.toggle(&board, p(1, 1)));
        assert!(scoring.toggle(&board, p(2, 2)));
        assert!(scoring.dead_stones().contains(&p(2, 2)));
        assert!(scoring.toggle(&board, p(2, 2)));
        assert!(scoring.dead_stones().is_empty());
    }
}
