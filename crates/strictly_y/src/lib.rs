//! Shannon's Y for the Strictly Tables server.
//!
//! Two players alternate placing stones on a triangular board; the first
//! to connect all three sides with one group wins. Black may swap White's
//! opening stone on the second turn. Master Y plays two stones per turn.
//!
//! # Architecture
//!
//! - **Board**: triangle folded into a square grid ([`Board`], [`Cell`])
//! - **Codec**: `g22`-style move tokens ([`parse_token`], [`parse_moves`])
//! - **Win**: connectivity search from the left edge ([`check_winner`])
//! - **Phase**: explicit transition table ([`Phase`])
//! - **Game**: the [`YGame`] table implementing [`strictly_table::TableGame`]

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod codec;
mod game;
mod phase;
mod record;
mod render;
mod win;

pub use board::{Board, BoardError, Cell, Coord, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, Stone, on_board};
pub use codec::{COLUMNS, CodecError, encode, parse_moves, parse_token};
pub use game::{PREFIX, SeatColor, YGame};
pub use phase::{Phase, PhaseError};
pub use record::MoveRecord;
pub use render::render_board;
pub use win::{NEIGHBOURS, Reach, Visited, check_winner, connects_all_sides, trace_group};
