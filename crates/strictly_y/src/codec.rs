//! Move tokens: `<column-letter><row-number>`, e.g. `g22`.

use crate::board::{Coord, on_board};
use tracing::instrument;

/// Column letters, `a` = column 0.
pub const COLUMNS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Why a move token was refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CodecError {
    /// Nothing to parse.
    #[display("No move given")]
    Empty,

    /// Token is not two or three characters long.
    #[display("{} is not a move; use a letter and a number, like a1", _0)]
    Length(String),

    /// First character is not a column letter.
    #[display("{} does not start with a column letter", _0)]
    Column(String),

    /// Characters after the letter are not a row number.
    #[display("{} does not end with a row number", _0)]
    Row(String),

    /// Token is well formed but off the triangle.
    #[display("{} is out of bounds", _0)]
    OutOfBounds(String),
}

impl std::error::Error for CodecError {}

/// Parses one move token against a board of `size`.
///
/// # Errors
///
/// Checks, in order: length, column letter, row digits, board geometry.
#[instrument]
pub fn parse_token(token: &str, size: usize) -> Result<Coord, CodecError> {
    let lowered = token.to_ascii_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    if !(2..=3).contains(&chars.len()) {
        return Err(CodecError::Length(token.to_string()));
    }

    let x = COLUMNS
        .find(chars[0])
        .ok_or_else(|| CodecError::Column(token.to_string()))?;

    let digits = &chars[1..];
    if !digits.iter().all(char::is_ascii_digit) {
        return Err(CodecError::Row(token.to_string()));
    }
    let row: isize = digits
        .iter()
        .collect::<String>()
        .parse()
        .map_err(|_| CodecError::Row(token.to_string()))?;
    let y = row - 1;

    if !on_board(size, x as isize, y) {
        return Err(CodecError::OutOfBounds(token.to_string()));
    }

    Ok(Coord::new(x, y as usize))
}

/// Parses every move in a command's arguments.
///
/// Any non-alphanumeric character separates moves, so `a2 b2`, `a2-b2`,
/// `a2,b2` and `a2/b2` all yield two coordinates.
///
/// # Errors
///
/// Fails on the first bad token, or when there are no tokens at all.
#[instrument]
pub fn parse_moves(args: &[String], size: usize) -> Result<Vec<Coord>, CodecError> {
    let joined: String = args
        .join(" ")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let coords = joined
        .split_whitespace()
        .map(|token| parse_token(token, size))
        .collect::<Result<Vec<_>, _>>()?;

    if coords.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(coords)
}

/// Formats a coordinate as a move token.
pub fn encode(coord: Coord) -> String {
    coord.to_string()
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match COLUMNS.chars().nth(self.x) {
            Some(letter) => write!(f, "{}{}", letter, self.y + 1),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}
