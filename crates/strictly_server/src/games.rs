//! The games this server can host.
//!
//! Each hosted game is one variant of [`AnyGame`]. The host only talks to
//! tables through [`TableGame`], which `AnyGame` implements by delegating to
//! the variant it holds.

use strictly_table::{CommandError, PlayerId, TableContext, TableGame};
use strictly_y::YGame;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::instrument;

/// A game a table can be created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameKind {
    /// Shannon's Y connection game.
    #[default]
    Y,
}

impl GameKind {
    /// Human-readable game name.
    pub fn display_name(self) -> &'static str {
        match self {
            GameKind::Y => "Y",
        }
    }

    /// Short tags shown in the game list.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            GameKind::Y => &["abstract", "connection", "2p"],
        }
    }

    /// Builds a fresh game of this kind for a table.
    #[instrument(skip(context), fields(table = %context.table_name()))]
    pub fn create(self, context: TableContext) -> AnyGame {
        match self {
            GameKind::Y => AnyGame::Y(YGame::new(context)),
        }
    }

    /// Every hostable game, in listing order.
    pub fn all() -> Vec<GameKind> {
        GameKind::iter().collect()
    }
}

/// A hosted game of any supported kind.
#[derive(Debug)]
pub enum AnyGame {
    /// A table of Y.
    Y(YGame),
}

impl AnyGame {
    /// Which kind of game this is.
    pub fn kind(&self) -> GameKind {
        match self {
            AnyGame::Y(_) => GameKind::Y,
        }
    }
}

impl TableGame for AnyGame {
    /// Builds the default game kind.
    fn new(context: TableContext) -> Self {
        GameKind::default().create(context)
    }

    fn game_name(&self) -> &'static str {
        match self {
            AnyGame::Y(game) => game.game_name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            AnyGame::Y(game) => game.display_name(),
        }
    }

    fn handle(&mut self, player: &PlayerId, command: &str) -> Result<(), CommandError> {
        match self {
            AnyGame::Y(game) => game.handle(player, command),
        }
    }

    fn show(&self, player: &PlayerId) {
        match self {
            AnyGame::Y(game) => game.show(player),
        }
    }

    fn show_help(&self, player: &PlayerId) {
        match self {
            AnyGame::Y(game) => game.show_help(player),
        }
    }

    fn show_config(&self, player: &PlayerId) {
        match self {
            AnyGame::Y(game) => game.show_config(player),
        }
    }

    fn tick(&mut self) {
        match self {
            AnyGame::Y(game) => game.tick(),
        }
    }

    fn remove_player(&mut self, player: &PlayerId) {
        match self {
            AnyGame::Y(game) => game.remove_player(player),
        }
    }

    fn terminate(&mut self, player: &PlayerId) {
        match self {
            AnyGame::Y(game) => game.terminate(player),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            AnyGame::Y(game) => game.is_finished(),
        }
    }
}
