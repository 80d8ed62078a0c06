//! Property tests for board geometry, the move codec and win detection.

use proptest::prelude::*;
use strictly_y::{
    Board, Cell, Coord, MAX_SIZE, MIN_SIZE, Stone, check_winner, encode, parse_token,
};

fn size() -> impl Strategy<Value = usize> {
    MIN_SIZE..=MAX_SIZE
}

/// A size together with a valid cell on a board of that size.
fn size_and_cell() -> impl Strategy<Value = (usize, Coord)> {
    size()
        .prop_flat_map(|size| (Just(size), 0..size))
        .prop_flat_map(|(size, y)| (Just(size), 0..=y, Just(y)))
        .prop_map(|(size, x, y)| (size, Coord::new(x, y)))
}

proptest! {
    #[test]
    fn prop_valid_cell_count(size in size()) {
        let board = Board::new(size).expect("size in range");
        prop_assert_eq!(board.playable_count(), size * (size + 1) / 2);
        prop_assert_eq!(board.empty_count(), board.playable_count());
    }

    #[test]
    fn prop_invalid_iff_x_above_y(size in size(), x in 0..MAX_SIZE, y in 0..MAX_SIZE) {
        prop_assume!(x < size && y < size);
        let board = Board::new(size).expect("size in range");
        let cell = board.get(Coord::new(x, y));
        if x > y {
            prop_assert_eq!(cell, Some(Cell::Invalid));
        } else {
            prop_assert_eq!(cell, Some(Cell::Empty));
        }
    }

    #[test]
    fn prop_encode_then_parse((size, coord) in size_and_cell()) {
        let token = encode(coord);
        prop_assert_eq!(parse_token(&token, size), Ok(coord));
        prop_assert_eq!(parse_token(&token.to_uppercase(), size), Ok(coord));
    }

    #[test]
    fn prop_out_of_range_sizes_rejected(size in (MAX_SIZE + 1)..200usize) {
        prop_assert!(Board::new(size).is_err());
    }

    #[test]
    fn prop_full_single_color_board_wins(size in size(), stone in prop_oneof![Just(Stone::White), Just(Stone::Black)]) {
        let mut board = Board::new(size).expect("size in range");
        let coords: Vec<Coord> = board.coords().collect();
        for coord in coords {
            board.set(coord, stone).expect("empty cell");
        }
        prop_assert_eq!(check_winner(&board), Some(stone));
    }

    #[test]
    fn prop_left_edge_alone_never_wins(size in 3..=MAX_SIZE) {
        // A column of stones on the left edge, stopping short of the bottom.
        let mut board = Board::new(size).expect("size in range");
        for y in 0..size - 1 {
            board.set(Coord::new(0, y), Stone::White).expect("empty cell");
        }
        prop_assert_eq!(check_winner(&board), None);
    }
}
