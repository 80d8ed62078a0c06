//! Text rendering of a Y board.

use crate::board::{Board, Coord, Stone};
use crate::codec::COLUMNS;

/// Renders the board as markup lines.
///
/// One line per row, indented so the triangle leans left, with `o` for
/// White, `x` for Black and alternating `,`/`.` for empty cells. Cells in
/// `highlight` get a background marker. Two axis lines follow.
pub fn render_board(board: &Board, highlight: &[Coord]) -> Vec<String> {
    let size = board.size();
    let mut lines = Vec::with_capacity(size + 2);
    let mut slash_line = String::from(" ");
    let mut letter_line = String::new();

    for row in 0..size {
        let slash_color = if row % 2 == 0 { "^K" } else { "^W" };
        slash_line.push_str(slash_color);
        slash_line.push_str("/^~ ");
        letter_line.push(COLUMNS.chars().nth(row).unwrap_or('?'));
        letter_line.push(' ');

        let mut line = " ".repeat(size - row + 1);
        for col in 0..=row {
            let coord = Coord::new(col, row);
            if highlight.contains(&coord) {
                line.push_str("^5");
            }
            line.push_str(match board.stone_at(coord) {
                Some(Stone::Black) => "^Kx^~ ",
                Some(Stone::White) => "^Wo^~ ",
                None if col % 2 == 0 => "^m,^~ ",
                None => "^M.^~ ",
            });
        }
        line.push_str(&format!("- {}", row + 1));
        lines.push(line);
    }

    lines.push(slash_line);
    lines.push(letter_line);
    lines
}
