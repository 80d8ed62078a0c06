//! Win detection for Y.
//!
//! A color wins once one connected group of its stones touches all three
//! sides of the triangle. Every group that can win touches the left edge
//! (`x = 0`), so the search seeds from there and only has to track the
//! bottom edge (`y = size - 1`) and the diagonal edge (`x = y`).
//! Corner cells count for both of their sides.

use crate::board::{Board, Coord, Stone, on_board};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Neighbour offsets on the folded triangle.
///
/// `(1, 2)` touches `(1, 1)`, `(1, 3)`, `(0, 2)`, `(2, 2)`, `(2, 3)` and `(0, 1)`.
pub const NEIGHBOURS: [(isize, isize); 6] = [(0, -1), (0, 1), (-1, 0), (1, 0), (1, 1), (-1, -1)];

/// Cells already explored during one win check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visited {
    size: usize,
    marks: Vec<bool>,
}

impl Visited {
    /// Creates an empty set for a board of `size`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            marks: vec![false; size * size],
        }
    }

    fn slot(&self, coord: Coord) -> Option<usize> {
        (coord.x < self.size && coord.y < self.size).then(|| coord.x * self.size + coord.y)
    }

    /// Checks whether `coord` was explored.
    pub fn contains(&self, coord: Coord) -> bool {
        self.slot(coord).is_some_and(|i| self.marks[i])
    }

    /// Marks `coord`; returns `false` if it was already marked.
    pub fn insert(&mut self, coord: Coord) -> bool {
        match self.slot(coord) {
            Some(i) if !self.marks[i] => {
                self.marks[i] = true;
                true
            }
            _ => false,
        }
    }

    /// Number of explored cells.
    pub fn len(&self) -> usize {
        self.marks.iter().filter(|m| **m).count()
    }

    /// Whether nothing was explored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sides of the triangle a group touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reach {
    /// Touches column `a`.
    pub left: bool,
    /// Touches the last row.
    pub bottom: bool,
    /// Touches the diagonal `x = y`.
    pub diagonal: bool,
}

impl Reach {
    /// A group reaching all three sides wins.
    pub fn is_win(&self) -> bool {
        self.left && self.bottom && self.diagonal
    }

    fn touch(&mut self, coord: Coord, size: usize) {
        self.left |= coord.x == 0;
        self.bottom |= coord.y + 1 == size;
        self.diagonal |= coord.x == coord.y;
    }
}

/// Explores the group of `stone` containing `seed`.
///
/// Cells already in `visited` are skipped, and everything explored is added
/// to it, so consecutive calls over the same set never walk a group twice.
/// Exploration stops as soon as the group reaches all three sides; the
/// returned [`Reach`] then reports a win.
pub fn trace_group(board: &Board, seed: Coord, stone: Stone, visited: &mut Visited) -> Reach {
    let mut reach = Reach::default();
    if board.stone_at(seed) != Some(stone) || !visited.insert(seed) {
        return reach;
    }

    let size = board.size();
    let mut stack = vec![seed];
    while let Some(coord) = stack.pop() {
        reach.touch(coord, size);
        if reach.is_win() {
            break;
        }

        for (dx, dy) in NEIGHBOURS {
            let nx = coord.x as isize + dx;
            let ny = coord.y as isize + dy;
            if !on_board(size, nx, ny) {
                continue;
            }
            let next = Coord::new(nx as usize, ny as usize);
            if board.stone_at(next) == Some(stone) && visited.insert(next) {
                stack.push(next);
            }
        }
    }

    reach
}

/// Checks whether `stone` has a group touching all three sides.
#[instrument(skip(board), fields(size = board.size()))]
pub fn connects_all_sides(board: &Board, stone: Stone) -> bool {
    let mut visited = Visited::new(board.size());
    for y in 0..board.size() {
        let reach = trace_group(board, Coord::new(0, y), stone, &mut visited);
        if reach.is_win() {
            debug!(?stone, seed_row = y, "Winning group found");
            return true;
        }
    }
    false
}

/// Returns the color that has connected all three sides, if any.
#[instrument(skip(board), fields(size = board.size()))]
pub fn check_winner(board: &Board) -> Option<Stone> {
    Stone::iter().find(|stone| connects_all_sides(board, *stone))
}
