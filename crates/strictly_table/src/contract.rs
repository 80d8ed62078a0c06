//! The capability set every hosted game implements.

use crate::channel::Channel;
use crate::error::CommandError;
use crate::player::{PlayerId, Roster};
use derive_getters::Getters;
use derive_new::new;
use std::sync::Arc;

/// What a game receives from its host when a table is created.
#[derive(Debug, Clone, Getters, new)]
pub struct TableContext {
    /// The table's name as typed by its creator.
    table_name: String,
    /// Channel reaching everyone at the table.
    channel: Arc<dyn Channel>,
    /// Everyone logged in to the server.
    roster: Arc<dyn Roster>,
}

/// Help lines for the commands every host handles itself.
pub const COMMON_HELP: &[&str] = &[
    "",
    "VIEWING:",
    "",
    "                ^!kibitz^., ^!watch^.     Watch the game as it happens.",
    "                 ^!list^., ^!who^., ^!w^.     List players and kibitzers.",
    "                ^!show^., ^!look^., ^!l^.     Look at the game itself.",
    "        ^!show_config^., ^!showconf^.     Show the game's configuration.",
    "",
    "PARTICIPATING:",
    "",
    "   ^!join^. [<seat>], ^!add^., ^!sit^., ^!j^.     Join the game [in seat <seat>].",
    "                 ^!leave^., ^!stand^.     Leave the game.",
    " ^!replace^. <seat> <player>, ^!switch^.     Put <player> in seat <seat>.",
    "            ^!terminate^., ^!finish^.     Terminate game.",
];

/// A turn-based game hosted at one table.
///
/// The host serializes every call for a given table, so implementations
/// can mutate freely without interior locking. Output goes through the
/// context's [`Channel`]; refusals come back as [`CommandError`] and are
/// reported by the host to the acting player.
pub trait TableGame: Send {
    /// Creates the game for a freshly opened table.
    fn new(context: TableContext) -> Self
    where
        Self: Sized;

    /// Short lower-case key used to create tables (`y`).
    fn game_name(&self) -> &'static str;

    /// Human-facing game name (`Y`).
    fn display_name(&self) -> &'static str;

    /// Interprets one command line from `player`.
    fn handle(&mut self, player: &PlayerId, command: &str) -> Result<(), CommandError>;

    /// Renders the current state to one observer.
    fn show(&self, player: &PlayerId);

    /// Sends game-specific help. The host sends [`COMMON_HELP`] first.
    fn show_help(&self, player: &PlayerId);

    /// Sends the current configuration.
    fn show_config(&self, player: &PlayerId);

    /// Called by the host after every dispatch; games that start or advance
    /// on their own do it here.
    fn tick(&mut self) {}

    /// Forgets a player who left the table or the server.
    fn remove_player(&mut self, player: &PlayerId);

    /// Ends the game immediately.
    fn terminate(&mut self, player: &PlayerId);

    /// Whether the game has reached its terminal phase.
    fn is_finished(&self) -> bool;
}
