//! Table registry and command dispatch.
//!
//! The host owns every open table. Each table's game sits behind its own
//! mutex, so at most one command runs against a table at a time while
//! different tables proceed independently. The registry lock is only held
//! to look tables up, insert them or remove them.

use crate::config::ServerConfig;
use crate::directory::{PlayerDirectory, TableChannel};
use crate::error::HostError;
use crate::games::{AnyGame, GameKind};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use strictly_table::{
    COMMON_HELP, Channel, Command, PlayerId, Roster, TableContext, TableGame, name_is_valid,
};
use tracing::{debug, info, instrument, warn};

/// One open table.
#[derive(Debug)]
pub struct Table {
    name: String,
    kind: GameKind,
    channel: Arc<TableChannel>,
    game: Mutex<AnyGame>,
}

impl Table {
    /// Table name as its creator typed it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which game is played here.
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// The table's broadcast channel.
    pub fn channel(&self) -> &Arc<TableChannel> {
        &self.channel
    }

    /// Locks the game for exclusive use.
    pub fn game(&self) -> MutexGuard<'_, AnyGame> {
        self.game.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Hosts every table on the server.
#[derive(Debug)]
pub struct GameHost {
    directory: Arc<PlayerDirectory>,
    max_tables: usize,
    tables: Mutex<HashMap<String, Arc<Table>>>,
}

impl GameHost {
    /// Creates a host delivering through `directory`.
    pub fn new(directory: Arc<PlayerDirectory>, max_tables: usize) -> Self {
        Self {
            directory,
            max_tables,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a host and its player directory from configuration.
    #[instrument(skip(config))]
    pub fn from_config(config: &ServerConfig) -> Self {
        let directory = Arc::new(PlayerDirectory::new(config.markup_style()));
        Self::new(directory, *config.max_tables())
    }

    /// The logged-in players.
    pub fn directory(&self) -> &Arc<PlayerDirectory> {
        &self.directory
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Table>>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn tell(&self, player: &PlayerId, line: &str) {
        self.directory.send(player, line);
    }

    /// Looks a table up by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<Arc<Table>> {
        self.lock().get(&name.to_lowercase()).cloned()
    }

    /// Number of open tables.
    pub fn table_count(&self) -> usize {
        self.lock().len()
    }

    /// Opens a new table of `game` called `table`, with `player` watching.
    ///
    /// # Errors
    ///
    /// Fails on a malformed or duplicate table name, an unknown game, or
    /// when the server already hosts its maximum number of tables.
    #[instrument(skip(self))]
    pub fn create_table(
        &self,
        player: &PlayerId,
        game: &str,
        table: &str,
    ) -> Result<Arc<Table>, HostError> {
        if !name_is_valid(table) {
            return Err(HostError::new("Invalid table name."));
        }
        let kind = GameKind::from_str(game)
            .map_err(|_| HostError::new(format!("No such game ^R{}^~.", game)))?;

        let mut tables = self.lock();
        let key = table.to_lowercase();
        if tables.contains_key(&key) {
            return Err(HostError::new(format!(
                "A table named ^R{}^~ already exists.",
                table
            )));
        }
        if tables.len() >= self.max_tables {
            warn!(max = self.max_tables, "Table limit reached");
            return Err(HostError::new(
                "The server cannot open any more tables right now.",
            ));
        }

        let channel = Arc::new(TableChannel::new(table, Arc::clone(&self.directory)));
        let context = TableContext::new(
            table.to_string(),
            channel.clone(),
            Arc::clone(&self.directory) as Arc<dyn Roster>,
        );
        let entry = Arc::new(Table {
            name: table.to_string(),
            kind,
            channel: Arc::clone(&channel),
            game: Mutex::new(kind.create(context)),
        });
        tables.insert(key, Arc::clone(&entry));
        drop(tables);

        channel.connect(player);
        channel.broadcast(&format!(
            "{} created a new table of ^M{}^~.",
            player,
            kind.display_name()
        ));
        self.tell(
            player,
            &format!(
                "A new table of ^M{}^~ called ^R{}^~ has been created.",
                kind.display_name(),
                table
            ),
        );
        info!(%player, table, game = %kind, "Table created");
        Ok(entry)
    }

    /// Routes one command line from `player` to a table.
    ///
    /// Common commands are handled here; everything else goes to the game.
    /// Game refusals are reported to the player only. After every command
    /// the game is ticked, and a finished table is closed.
    ///
    /// # Errors
    ///
    /// Fails when no table has that name.
    #[instrument(skip(self))]
    pub fn dispatch(&self, player: &PlayerId, table: &str, command: &str) -> Result<(), HostError> {
        let entry = self.table(table).ok_or_else(|| {
            HostError::new(format!("Game table ^M{}^~ does not exist.", table))
        })?;

        let finished = {
            let mut game = entry.game();
            self.run_command(&entry, &mut game, player, command);
            game.tick();
            game.is_finished()
        };

        if finished {
            self.close_table(&entry);
        }
        Ok(())
    }

    fn run_command(&self, table: &Table, game: &mut AnyGame, player: &PlayerId, command: &str) {
        if let Some(cmd) = Command::parse(command)
            && self.run_common(table, game, player, &cmd)
        {
            return;
        }

        if let Err(e) = game.handle(player, command) {
            debug!(table = %table.name, %player, error = %e, "Command refused");
            self.tell(player, &format!("(^R{}^~): {}", game.display_name(), e));
        }
    }

    /// Handles the verbs every table understands. Returns whether the
    /// command was one of them.
    fn run_common(&self, table: &Table, game: &mut AnyGame, player: &PlayerId, cmd: &Command) -> bool {
        if cmd.is(&["help", "h", "?"]) {
            for line in COMMON_HELP {
                self.tell(player, line);
            }
            game.show_help(player);
        } else if cmd.is(&["kibitz", "watch"]) {
            if table.channel.is_connected(player) {
                self.tell(
                    player,
                    &format!(
                        "(^R{}^~): You're already watching this game!",
                        game.display_name()
                    ),
                );
            } else {
                table.channel.connect(player);
                game.show(player);
            }
        } else if cmd.is(&["show", "look", "l"]) {
            game.show(player);
        } else if cmd.is(&["show_config", "showconf"]) {
            game.show_config(player);
        } else if cmd.is(&["terminate", "finish", "flip"]) {
            game.terminate(player);
        } else {
            return false;
        }
        true
    }

    fn close_table(&self, table: &Arc<Table>) {
        let removed = {
            let mut tables = self.lock();
            let key = table.name.to_lowercase();
            // A table reopened under the same name is not ours to close.
            if tables.get(&key).is_some_and(|open| Arc::ptr_eq(open, table)) {
                tables.remove(&key).is_some()
            } else {
                false
            }
        };
        if removed {
            table
                .channel
                .broadcast(&format!("Table ^Y{}^~ is now closed.", table.name));
            info!(table = %table.name, game = %table.kind, "Deleting finished table");
        }
    }

    /// Removes a departing player from every table.
    #[instrument(skip(self))]
    pub fn remove_player(&self, player: &PlayerId) {
        let tables: Vec<Arc<Table>> = self.lock().values().cloned().collect();
        for table in tables {
            table.game().remove_player(player);
            table.channel.disconnect(player);
        }
    }

    /// Removes a player from every table and logs them out.
    #[instrument(skip(self))]
    pub fn logout(&self, player: &PlayerId) {
        self.remove_player(player);
        self.directory.unregister(player);
    }

    /// Sends the list of hostable games.
    pub fn list_games(&self, player: &PlayerId) {
        self.tell(player, "");
        self.tell(player, "Games available:");
        self.tell(player, "");
        for (i, kind) in GameKind::all().into_iter().enumerate() {
            let color = if i % 2 == 0 { "^M" } else { "^R" };
            self.tell(
                player,
                &format!(
                    "   {}{}^~ [{}] {}",
                    color,
                    kind,
                    kind.tags().join(" "),
                    kind.display_name()
                ),
            );
        }
        self.tell(player, "");
    }

    /// Sends the list of open tables.
    pub fn list_tables(&self, player: &PlayerId) {
        let mut tables: Vec<Arc<Table>> = self.lock().values().cloned().collect();
        tables.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        self.tell(player, "");
        self.tell(player, "^RACTIVE GAMES^~:");
        if tables.is_empty() {
            self.tell(player, "   ^!None found!  You should start a game.^.");
        }
        for (i, table) in tables.iter().enumerate() {
            let (table_color, game_color) = if i % 2 == 0 { ("^M", "^G") } else { ("^Y", "^C") };
            self.tell(
                player,
                &format!(
                    "   {}{}^~ ({}{}^~)",
                    table_color,
                    table.name,
                    game_color,
                    table.kind.display_name()
                ),
            );
        }
        self.tell(player, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_table::MarkupStyle;
    use tokio::sync::mpsc;

    #[test]
    fn test_stale_close_keeps_reopened_table() {
        let host = GameHost::new(Arc::new(PlayerDirectory::new(MarkupStyle::Plain)), 8);
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = host.directory().register("alice", tx).expect("free name");

        let old = host.create_table(&alice, "y", "oak").expect("new table");
        host.dispatch(&alice, "oak", "terminate").expect("table exists");
        assert!(host.table("oak").is_none());

        let fresh = host.create_table(&alice, "y", "Oak").expect("name is free again");
        host.close_table(&old);
        let open = host.table("oak").expect("reopened table survives");
        assert!(Arc::ptr_eq(&open, &fresh));

        host.close_table(&fresh);
        assert!(host.table("oak").is_none());
    }
}
