//! Connected players and delivery of lines to them.
//!
//! Every logged-in player owns an unbounded queue drained by the writer half
//! of their connection. Sending never awaits; a line for a player whose
//! connection already closed is dropped.

use crate::error::HostError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use strictly_table::{Channel, MarkupStyle, PlayerId, Roster, name_is_valid, render_markup};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Sending half of a player's outbound queue.
pub type Outbox = mpsc::UnboundedSender<String>;

#[derive(Debug)]
struct Entry {
    id: PlayerId,
    outbox: Outbox,
}

/// Every player currently logged in, keyed by lower-cased name.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    style: MarkupStyle,
    players: Mutex<HashMap<String, Entry>>,
}

impl PlayerDirectory {
    /// Creates an empty directory rendering markup with `style`.
    pub fn new(style: MarkupStyle) -> Self {
        Self {
            style,
            players: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.players.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Logs a player in under `name`.
    ///
    /// # Errors
    ///
    /// Fails when the name is malformed or already taken (ignoring case).
    #[instrument(skip(self, outbox))]
    pub fn register(&self, name: &str, outbox: Outbox) -> Result<PlayerId, HostError> {
        if !name_is_valid(name) {
            return Err(HostError::new(
                "Invalid name.  Use up to 16 letters and digits, starting with a letter.",
            ));
        }
        let mut players = self.lock();
        let key = name.to_lowercase();
        if players.contains_key(&key) {
            warn!(name, "Name already in use");
            return Err(HostError::new("That name is already taken."));
        }
        let id = PlayerId::new(name);
        players.insert(
            key,
            Entry {
                id: id.clone(),
                outbox,
            },
        );
        info!(player = %id, "Player logged in");
        Ok(id)
    }

    /// Logs a player out.
    #[instrument(skip(self))]
    pub fn unregister(&self, player: &PlayerId) {
        if self.lock().remove(&player.name().to_lowercase()).is_some() {
            info!(%player, "Player logged out");
        }
    }

    /// Checks whether a player is logged in.
    pub fn is_online(&self, player: &PlayerId) -> bool {
        self.lock().contains_key(&player.name().to_lowercase())
    }

    /// Renders and queues one line for a player.
    pub fn send(&self, player: &PlayerId, line: &str) {
        let players = self.lock();
        let Some(entry) = players.get(&player.name().to_lowercase()) else {
            debug!(%player, "Dropping line for offline player");
            return;
        };
        if entry.outbox.send(render_markup(line, self.style)).is_err() {
            debug!(%player, "Outbox closed");
        }
    }
}

impl Roster for PlayerDirectory {
    fn find_player(&self, name: &str) -> Option<PlayerId> {
        self.lock().get(&name.to_lowercase()).map(|e| e.id.clone())
    }
}

/// The broadcast channel of one hosted table.
#[derive(Debug)]
pub struct TableChannel {
    table: String,
    directory: Arc<PlayerDirectory>,
    listeners: Mutex<Vec<PlayerId>>,
}

impl TableChannel {
    /// Creates a channel with no listeners.
    pub fn new(table: impl Into<String>, directory: Arc<PlayerDirectory>) -> Self {
        Self {
            table: table.into(),
            directory,
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PlayerId>> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Channel for TableChannel {
    fn tell(&self, player: &PlayerId, line: &str) {
        self.directory.send(player, line);
    }

    fn broadcast(&self, line: &str) {
        for listener in self.listeners() {
            self.directory.send(&listener, line);
        }
    }

    #[instrument(skip(self), fields(table = %self.table))]
    fn connect(&self, player: &PlayerId) {
        let mut listeners = self.lock();
        if !listeners.contains(player) {
            debug!(%player, "Listener connected");
            listeners.push(player.clone());
        }
    }

    #[instrument(skip(self), fields(table = %self.table))]
    fn disconnect(&self, player: &PlayerId) {
        self.lock().retain(|l| l != player);
    }

    fn is_connected(&self, player: &PlayerId) -> bool {
        self.lock().contains(player)
    }

    fn listeners(&self) -> Vec<PlayerId> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_taken_and_bad_names() {
        let directory = PlayerDirectory::new(MarkupStyle::Plain);
        let (tx, _rx) = mpsc::unbounded_channel();
        directory.register("alice", tx.clone()).expect("free name");
        assert!(directory.register("ALICE", tx.clone()).is_err());
        assert!(directory.register("9lives", tx.clone()).is_err());
        assert!(directory.register("", tx).is_err());
        assert_eq!(directory.find_player("Alice"), Some(PlayerId::from("alice")));
        assert_eq!(directory.find_player("ALICE2"), None);
    }

    #[test]
    fn test_send_renders_markup() {
        let directory = PlayerDirectory::new(MarkupStyle::Plain);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = directory.register("alice", tx).expect("free name");
        directory.send(&alice, "^Rhello^~");
        assert_eq!(rx.try_recv().ok().as_deref(), Some("hello"));

        directory.unregister(&alice);
        directory.send(&alice, "gone");
        assert!(rx.try_recv().is_err());
        assert!(!directory.is_online(&alice));
    }

    #[test]
    fn test_broadcast_reaches_listeners_only() {
        let directory = Arc::new(PlayerDirectory::new(MarkupStyle::Plain));
        let (atx, mut arx) = mpsc::unbounded_channel();
        let (btx, mut brx) = mpsc::unbounded_channel();
        let alice = directory.register("alice", atx).expect("free name");
        directory.register("bob", btx).expect("free name");

        let channel = TableChannel::new("oak", directory);
        channel.connect(&alice);
        channel.connect(&alice);
        assert_eq!(channel.listeners().len(), 1);

        channel.broadcast("news");
        assert_eq!(arx.try_recv().ok().as_deref(), Some("news"));
        assert!(brx.try_recv().is_err());

        channel.disconnect(&alice);
        assert!(!channel.is_connected(&alice));
    }
}
