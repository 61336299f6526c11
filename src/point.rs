//! Board coordinates, players and stones.
//!
//! Points are plain `(x, y)` pairs: `x` is the column counted from the left,
//! `y` the row counted from the top. Everything that stores points (groups,
//! territories, dead-stone marks) keys on the value, so two independently
//! built copies of the same point always compare and hash equal.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{COLUMN_LETTERS, MAX_BOARD_SIZE};

/// An intersection on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

/// A set of intersections keyed by coordinate value.
pub type PointSet = HashSet<Point>;

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// True if the point lies on a `size` x `size` board.
    #[inline]
    pub fn in_bounds(self, size: usize) -> bool {
        self.x < size && self.y < size
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Stone color / side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Parse a GTP color argument (`b`, `black`, `w`, `white`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Player::Black),
            "w" | "white" => Some(Player::White),
            _ => None,
        }
    }

    /// Single-character board glyph.
    pub fn glyph(self) -> char {
        match self {
            Player::Black => 'X',
            Player::White => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// A stone on the board. Never changes once placed; removal replaces the
/// cell with `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stone {
    pub point: Point,
    pub player: Player,
    /// Sequence number of the move that placed this stone.
    pub move_number: u32,
}

/// Parse a coordinate string (e.g., "D4") into a point on a `size` board.
///
/// Columns use letters A-Z skipping I; rows are 1-based from the bottom edge.
/// Returns `None` for malformed or off-board input.
pub fn parse_coord(s: &str, size: usize) -> Option<Point> {
    let bytes = s.trim().as_bytes();
    if bytes.len() < 2 || size > MAX_BOARD_SIZE {
        return None;
    }

    let col_char = bytes[0].to_ascii_uppercase();
    let x = COLUMN_LETTERS.iter().position(|&c| c == col_char)?;

    let digits = std::str::from_utf8(&bytes[1..]).ok()?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 || row > size {
        return None;
    }

    let point = Point::new(x, size - row);
    point.in_bounds(size).then_some(point)
}

/// Convert a point to a coordinate string (e.g., "D4") on a `size` board.
pub fn str_coord(point: Point, size: usize) -> String {
    let col = COLUMN_LETTERS.get(point.x).copied().unwrap_or(b'?') as char;
    format!("{col}{}", size.saturating_sub(point.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coord_corners() {
        assert_eq!(parse_coord("A1", 9), Some(Point::new(0, 8)));
        assert_eq!(parse_coord("A9", 9), Some(Point::new(0, 0)));
        assert_eq!(parse_coord("J1", 9), Some(Point::new(8, 8)));
        assert_eq!(parse_coord("J9", 9), Some(Point::new(8, 0)));
        assert_eq!(parse_coord("T19", 19), Some(Point::new(18, 0)));
    }

    #[test]
    fn test_parse_coord_skips_i() {
        let h5 = parse_coord("H5", 9).unwrap();
        let j5 = parse_coord("J5", 9).unwrap();
        assert_eq!(j5.x - h5.x, 1, "J should be one column after H (skipping I)");
        assert_eq!(parse_coord("I5", 9), None);
    }

    #[test]
    fn test_parse_coord_rejects_off_board() {
        assert_eq!(parse_coord("K1", 9), None);
        assert_eq!(parse_coord("A10", 9), None);
        assert_eq!(parse_coord("A0", 9), None);
        assert_eq!(parse_coord("pass", 9), None);
        assert_eq!(parse_coord("D", 9), None);
        assert_eq!(parse_coord("D-4", 9), None);
    }

    #[test]
    fn test_str_coord_roundtrip() {
        for size in [9, 13, 19] {
            for y in 0..size {
                for x in 0..size {
                    let p = Point::new(x, y);
                    let s = str_coord(p, size);
                    assert_eq!(parse_coord(&s, size), Some(p), "Roundtrip failed for {s}");
                }
            }
        }
    }

    #[test]
    fn test_player_opponent_and_parse() {
        assert_eq!(Player::Black.opponent(), Player::White);
        assert_eq!(Player::White.opponent(), Player::Black);
        assert_eq!(Player::parse("B"), Some(Player::Black));
        assert_eq!(Player::parse("white"), Some(Player::White));
        assert_eq!(Player::parse("red"), None);
    }

    #[test]
    fn test_point_set_keys_on_value() {
        let mut set = PointSet::new();
        set.insert(Point::new(3, 4));
        assert!(set.contains(&Point { x: 3, y: 4 }));
    }
}
