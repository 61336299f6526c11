//! Board representation and group analysis.
//!
//! The grid is a row-major `Vec<Option<Stone>>` behind an [`Arc`]. Cloning a
//! board is cheap and every write goes through [`Arc::make_mut`], so a write
//! never shows through to a board that was cloned earlier. Public methods never
//! mutate: [`Board::with_stone`] returns a new board.
//!
//! Group discovery uses an explicit stack rather than recursion so that large
//! groups on a 19x19 board cannot exhaust the call stack.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::COLUMN_LETTERS;
use crate::error::{MoveError, StateError};
use crate::point::{Player, Point, PointSet, Stone};

/// Rows of cells, the serialized form of a [`Board`].
pub type BoardRows = Vec<Vec<Option<Stone>>>;

/// A square Go board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardRows", try_from = "BoardRows")]
pub struct Board {
    size: usize,
    cells: Arc<Vec<Option<Stone>>>,
}

impl Board {
    /// Create an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: Arc::new(vec![None; size * size]),
        }
    }

    /// Build a board from a text diagram: one string per row, top row first,
    /// `X` for black, `O` for white, `.` for empty. Whitespace is ignored.
    /// Stones get move number 0.
    pub fn from_diagram(rows: &[&str]) -> Result<Self, StateError> {
        let size = rows.len();
        let mut board = Board::new(size);
        for (y, row) in rows.iter().enumerate() {
            let glyphs: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if glyphs.len() != size {
                return Err(StateError::BoardShape {
                    rows: size,
                    columns: glyphs.len(),
                });
            }
            for (x, ch) in glyphs.into_iter().enumerate() {
                let player = match ch {
                    'X' | 'x' => Player::Black,
                    'O' | 'o' => Player::White,
                    '.' | '+' => continue,
                    other => return Err(StateError::Glyph(other)),
                };
                let point = Point::new(x, y);
                board.set(
                    point,
                    Some(Stone {
                        point,
                        player,
                        move_number: 0,
                    }),
                );
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, point: Point) -> usize {
        point.y * self.size + point.x
    }

    #[inline]
    pub fn in_bounds(&self, point: Point) -> bool {
        point.in_bounds(self.size)
    }

    /// The stone at `point`, or `None` if empty or off the board.
    pub fn get(&self, point: Point) -> Option<Stone> {
        if !self.in_bounds(point) {
            return None;
        }
        self.cells[self.idx(point)]
    }

    /// Owner of the stone at `point`, if any.
    pub fn player_at(&self, point: Point) -> Option<Player> {
        self.get(point).map(|s| s.player)
    }

    pub fn is_empty_at(&self, point: Point) -> bool {
        self.in_bounds(point) && self.cells[self.idx(point)].is_none()
    }

    /// The up to four orthogonal neighbors of `point` that are on the board.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        let Point { x, y } = point;
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push(Point::new(x - 1, y));
        }
        if x + 1 < s {
            v.push(Point::new(x + 1, y));
        }
        if y > 0 {
            v.push(Point::new(x, y - 1));
        }
        if y + 1 < s {
            v.push(Point::new(x, y + 1));
        }
        v.into_iter()
    }

    /// Every stone on the board, in row-major order.
    pub fn stones(&self) -> impl Iterator<Item = Stone> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    pub fn count_stones(&self, player: Player) -> usize {
        self.stones().filter(|s| s.player == player).count()
    }

    /// Return a new board with the cell at `point` replaced.
    pub fn with_stone(&self, point: Point, stone: Option<Stone>) -> Result<Board, MoveError> {
        if !self.in_bounds(point) {
            return Err(MoveError::InvalidPosition);
        }
        let mut next = self.clone();
        next.set(point, stone);
        Ok(next)
    }

    /// Overwrite one cell in place. Callers check bounds first.
    pub(crate) fn set(&mut self, point: Point, stone: Option<Stone>) {
        debug_assert!(self.in_bounds(point), "set out of bounds: {point}");
        let i = self.idx(point);
        Arc::make_mut(&mut self.cells)[i] = stone;
    }

    /// Clear every point in `points`.
    pub(crate) fn remove_stones<'a>(&mut self, points: impl IntoIterator<Item = &'a Point>) {
        let size = self.size;
        let cells = Arc::make_mut(&mut self.cells);
        for p in points {
            cells[p.y * size + p.x] = None;
        }
    }

    /// Collect the group of same-colored stones connected to `start`.
    ///
    /// Returns an empty set if `start` is empty or off the board.
    pub fn group(&self, start: Point) -> PointSet {
        let mut group = PointSet::new();
        let Some(color) = self.player_at(start) else {
            return group;
        };
        let mut stack = vec![start];

        while let Some(pt) = stack.pop() {
            if !group.insert(pt) {
                continue;
            }
            for n in self.neighbors(pt) {
                if !group.contains(&n) && self.player_at(n) == Some(color) {
                    stack.push(n);
                }
            }
        }
        group
    }

    /// Empty points adjacent to any stone in `group`.
    pub fn group_liberties(&self, group: &PointSet) -> PointSet {
        group
            .iter()
            .flat_map(|&p| self.neighbors(p))
            .filter(|&n| self.is_empty_at(n))
            .collect()
    }

    /// True if `group` has at least one liberty. Exits on the first one found.
    pub fn has_liberties(&self, group: &PointSet) -> bool {
        group
            .iter()
            .flat_map(|&p| self.neighbors(p))
            .any(|n| self.is_empty_at(n))
    }

    /// Opponent groups that a `player` stone at `point` would capture.
    ///
    /// The stone is placed on a scratch copy first and every adjacent opponent
    /// group is then evaluated on that post-placement board. A single move can
    /// capture several disjoint groups; each is reported once.
    pub fn captured_groups(&self, point: Point, player: Player) -> Vec<PointSet> {
        if !self.in_bounds(point) {
            return Vec::new();
        }
        let mut after = self.clone();
        after.set(
            point,
            Some(Stone {
                point,
                player,
                move_number: 0,
            }),
        );
        after.dead_neighbor_groups(point, player.opponent())
    }

    /// Groups of `victim` adjacent to `point` with no liberties left.
    fn dead_neighbor_groups(&self, point: Point, victim: Player) -> Vec<PointSet> {
        let mut captured: Vec<PointSet> = Vec::new();
        for n in self.neighbors(point) {
            if self.player_at(n) != Some(victim) || captured.iter().any(|g| g.contains(&n)) {
                continue;
            }
            let group = self.group(n);
            if !self.has_liberties(&group) {
                captured.push(group);
            }
        }
        captured
    }

    /// True if a `player` stone at `point` captures nothing and leaves its own
    /// group without liberties.
    pub fn is_suicide_move(&self, point: Point, player: Player) -> bool {
        if !self.in_bounds(point) {
            return false;
        }
        let mut after = self.clone();
        after.set(
            point,
            Some(Stone {
                point,
                player,
                move_number: 0,
            }),
        );
        if !after.dead_neighbor_groups(point, player.opponent()).is_empty() {
            return false;
        }
        let own = after.group(point);
        !after.has_liberties(&own)
    }
}

/// True if playing at `point` would retake the ko.
#[inline]
pub fn violates_ko_rule(point: Point, ko_point: Option<Point>) -> bool {
    ko_point == Some(point)
}

impl From<Board> for BoardRows {
    fn from(board: Board) -> Self {
        board
            .cells
            .chunks(board.size.max(1))
            .take(board.size)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl TryFrom<BoardRows> for Board {
    type Error = StateError;

    fn try_from(rows: BoardRows) -> Result<Self, Self::Error> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(StateError::BoardShape {
                    rows: size,
                    columns: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Board {
            size,
            cells: Arc::new(cells),
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = COLUMN_LETTERS
            .iter()
            .take(self.size)
            .map(|&c| format!(" {}", c as char))
            .collect();
        writeln!(f, "   {letters}")?;
        for y in 0..self.size {
            write!(f, "{:>2} ", self.size - y)?;
            for x in 0..self.size {
                let ch = match self.player_at(Point::new(x, y)) {
                    Some(p) => p.glyph(),
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
