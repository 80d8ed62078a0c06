//! The Y board: a triangle folded into a square grid.
//!
//! ```text
//!      . 1
//!     . . 2
//!    . . . 3
//!   . . . . 4
//!   a b c d
//! ```
//!
//! Cell `(x, y)` is column `x`, row `y`. Only cells with `x <= y` are part
//! of the triangle; the rest of the square is filled with [`Cell::Invalid`]
//! so that it matches neither color.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::instrument;

/// Smallest supported board.
pub const MIN_SIZE: usize = 2;
/// Largest supported board, bounded by the column alphabet.
pub const MAX_SIZE: usize = 26;
/// Board size of a new table.
pub const DEFAULT_SIZE: usize = 19;

/// A stone color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Stone {
    /// Moves first.
    White,
    /// Moves second; may swap White's opening stone.
    Black,
}

impl Stone {
    /// Returns the other color.
    pub fn opponent(self) -> Self {
        match self {
            Stone::White => Stone::Black,
            Stone::Black => Stone::White,
        }
    }
}

/// The content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Playable and free.
    Empty,
    /// Outside the triangle; never playable.
    Invalid,
    /// Holds a stone.
    Stone(Stone),
}

/// A column/row pair on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column, `a` = 0.
    pub x: usize,
    /// Row, `1` = 0.
    pub y: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// The triangle geometry rule: `0 <= x <= y < size`.
///
/// Takes signed values so neighbour offsets can be checked before they are
/// turned into indices.
pub fn on_board(size: usize, x: isize, y: isize) -> bool {
    0 <= x && x <= y && (y as usize) < size
}

/// Why a board operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// Requested size is outside [`MIN_SIZE`]..=[`MAX_SIZE`].
    #[display("Board size {} is out of range ({}-{})", _0, MIN_SIZE, MAX_SIZE)]
    SizeOutOfRange(usize),

    /// The coordinate is not on the triangle.
    #[display("{} is out of bounds", _0)]
    OutOfBounds(Coord),

    /// The cell already holds a stone.
    #[display("{} is already occupied", _0)]
    Occupied(Coord),

    /// The cell holds no stone to recolor.
    #[display("{} has no stone", _0)]
    NoStone(Coord),
}

impl std::error::Error for BoardError {}

/// A Y board of a fixed size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    /// Column-major: cell `(x, y)` lives at `x * size + y`.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::SizeOutOfRange`] outside [`MIN_SIZE`]..=[`MAX_SIZE`].
    #[instrument]
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::SizeOutOfRange(size));
        }

        Ok(Self::build(size))
    }

    fn build(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for x in 0..size {
            for y in 0..size {
                cells.push(if x > y { Cell::Invalid } else { Cell::Empty });
            }
        }
        Self { size, cells }
    }

    /// Returns the side length.
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        (coord.x < self.size && coord.y < self.size).then(|| coord.x * self.size + coord.y)
    }

    /// Checks the triangle geometry for this board's size.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x <= coord.y && coord.y < self.size
    }

    /// Returns the cell at `coord`, or `None` off the grid.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Returns the stone at `coord`, if any.
    pub fn stone_at(&self, coord: Coord) -> Option<Stone> {
        match self.get(coord)? {
            Cell::Stone(stone) => Some(stone),
            Cell::Empty | Cell::Invalid => None,
        }
    }

    /// Checks whether `coord` is a free playable cell.
    pub fn is_empty(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Cell::Empty))
    }

    /// Places a stone on a free playable cell.
    ///
    /// # Errors
    ///
    /// Refuses cells off the triangle or already occupied; the board is
    /// left untouched.
    pub fn set(&mut self, coord: Coord, stone: Stone) -> Result<(), BoardError> {
        let index = self
            .index(coord)
            .filter(|_| self.contains(coord))
            .ok_or(BoardError::OutOfBounds(coord))?;
        match self.cells[index] {
            Cell::Empty => {
                self.cells[index] = Cell::Stone(stone);
                Ok(())
            }
            Cell::Stone(_) => Err(BoardError::Occupied(coord)),
            Cell::Invalid => Err(BoardError::OutOfBounds(coord)),
        }
    }

    /// Flips the stone at `coord` to the other color, returning the new one.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoStone`] when the cell holds no stone.
    pub fn recolor(&mut self, coord: Coord) -> Result<Stone, BoardError> {
        let index = self.index(coord).ok_or(BoardError::OutOfBounds(coord))?;
        match self.cells[index] {
            Cell::Stone(stone) => {
                let flipped = stone.opponent();
                self.cells[index] = Cell::Stone(flipped);
                Ok(flipped)
            }
            Cell::Empty | Cell::Invalid => Err(BoardError::NoStone(coord)),
        }
    }

    /// Counts the free playable cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// Counts the cells of the triangle, occupied or not.
    pub fn playable_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Invalid).count()
    }

    /// Iterates over every coordinate of the triangle, column by column.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |x| (x..self.size).map(move |y| Coord::new(x, y)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::build(DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_sizes_out_of_range() {
        assert_eq!(Board::new(1), Err(BoardError::SizeOutOfRange(1)));
        assert_eq!(Board::new(27), Err(BoardError::SizeOutOfRange(27)));
        assert!(Board::new(2).is_ok());
        assert!(Board::new(26).is_ok());
    }

    #[test]
    fn test_size_three_layout() {
        let board = Board::new(3).expect("valid size");
        let playable: Vec<Coord> = board.coords().collect();
        assert_eq!(
            playable,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 2),
                Coord::new(1, 1),
                Coord::new(1, 2),
                Coord::new(2, 2),
            ]
        );
        assert_eq!(board.get(Coord::new(1, 0)), Some(Cell::Invalid));
        assert_eq!(board.get(Coord::new(3, 3)), None);
        assert_eq!(board.empty_count(), 6);
    }

    #[test]
    fn test_set_refuses_invalid_and_occupied() {
        let mut board = Board::new(3).expect("valid size");
        let before = board.clone();
        assert_eq!(
            board.set(Coord::new(2, 1), Stone::White),
            Err(BoardError::OutOfBounds(Coord::new(2, 1)))
        );
        assert_eq!(
            board.set(Coord::new(0, 5), Stone::White),
            Err(BoardError::OutOfBounds(Coord::new(0, 5)))
        );
        assert_eq!(board, before);

        board.set(Coord::new(0, 0), Stone::White).expect("free cell");
        let before = board.clone();
        assert_eq!(
            board.set(Coord::new(0, 0), Stone::Black),
            Err(BoardError::Occupied(Coord::new(0, 0)))
        );
        assert_eq!(board, before);
        assert_eq!(board.empty_count(), 5);
    }

    #[test]
    fn test_recolor() {
        let mut board = Board::new(4).expect("valid size");
        assert_eq!(
            board.recolor(Coord::new(1, 2)),
            Err(BoardError::NoStone(Coord::new(1, 2)))
        );
        board.set(Coord::new(1, 2), Stone::White).expect("free cell");
        assert_eq!(board.recolor(Coord::new(1, 2)), Ok(Stone::Black));
        assert_eq!(board.stone_at(Coord::new(1, 2)), Some(Stone::Black));
    }

    #[test]
    fn test_on_board_rule() {
        assert!(on_board(3, 0, 0));
        assert!(on_board(3, 2, 2));
        assert!(!on_board(3, -1, 0));
        assert!(!on_board(3, 1, 0));
        assert!(!on_board(3, 0, 3));
    }
}
