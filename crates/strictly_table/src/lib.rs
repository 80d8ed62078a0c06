//! Strictly Tables hosting contract.
//!
//! Everything a table game needs from its host, and everything the host
//! needs from a game, without either side knowing the other's internals.
//!
//! # Architecture
//!
//! - **Contract**: [`TableGame`], the capability set every game implements
//! - **Seating**: [`Seat`] and [`Seating`], typed playing slots
//! - **Channel**: [`Channel`], fire-and-forget delivery to table listeners
//! - **Roster**: [`Roster`], lookup of logged-in players by name
//! - **Commands**: [`Command`] parsing and the [`CommandError`] taxonomy
//! - **Markup**: caret color codes and their ANSI/plain rendering

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod channel;
mod command;
mod contract;
mod error;
mod markup;
mod player;
mod seat;

pub use channel::{Channel, Delivery, RecordingChannel};
pub use command::{Command, booleanize};
pub use contract::{COMMON_HELP, TableContext, TableGame};
pub use error::CommandError;
pub use markup::{MarkupStyle, render_markup, strip_markup};
pub use player::{MAX_NAME_LENGTH, PlayerId, Roster, name_is_valid};
pub use seat::{Seat, Seating};
