//! Delivery of table output to players.
//!
//! Games never write to connections themselves. They hand finished lines to a
//! [`Channel`], which forwards them to whoever is listening at the table.
//! Delivery is fire-and-forget: nothing here blocks or reports failure.

use crate::player::PlayerId;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};

/// A table's broadcast channel.
pub trait Channel: Send + Sync + std::fmt::Debug {
    /// Sends one line to a single player.
    fn tell(&self, player: &PlayerId, line: &str);

    /// Sends one line to every listener.
    fn broadcast(&self, line: &str);

    /// Adds a listener. Connecting twice is a no-op.
    fn connect(&self, player: &PlayerId);

    /// Removes a listener.
    fn disconnect(&self, player: &PlayerId);

    /// Checks whether a player is listening.
    fn is_connected(&self, player: &PlayerId) -> bool;

    /// Returns the current listeners in connection order.
    fn listeners(&self) -> Vec<PlayerId>;
}

/// One line delivered through a [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// A line sent to one player.
    Tell {
        /// Recipient.
        to: PlayerId,
        /// The line.
        line: String,
    },
    /// A line sent to all listeners.
    Broadcast(String),
}

#[derive(Debug, Default)]
struct Recording {
    listeners: Vec<PlayerId>,
    deliveries: Vec<Delivery>,
}

/// In-memory channel that records every delivery.
///
/// Used by tests and by local tooling that wants to inspect table output.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    inner: Mutex<Recording>,
}

impl RecordingChannel {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns every delivery so far.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.lock().deliveries.clone()
    }

    /// Returns every broadcast line so far.
    pub fn broadcasts(&self) -> Vec<String> {
        self.lock()
            .deliveries
            .iter()
            .filter_map(|d| match d {
                Delivery::Broadcast(line) => Some(line.clone()),
                Delivery::Tell { .. } => None,
            })
            .collect()
    }

    /// Returns every line told directly to `player`.
    pub fn tells_to(&self, player: &PlayerId) -> Vec<String> {
        self.lock()
            .deliveries
            .iter()
            .filter_map(|d| match d {
                Delivery::Tell { to, line } if to == player => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets recorded deliveries, keeping listeners.
    pub fn clear(&self) {
        self.lock().deliveries.clear();
    }
}

impl Channel for RecordingChannel {
    fn tell(&self, player: &PlayerId, line: &str) {
        self.lock().deliveries.push(Delivery::Tell {
            to: player.clone(),
            line: line.to_string(),
        });
    }

    fn broadcast(&self, line: &str) {
        self.lock()
            .deliveries
            .push(Delivery::Broadcast(line.to_string()));
    }

    #[instrument(skip(self))]
    fn connect(&self, player: &PlayerId) {
        let mut inner = self.lock();
        if !inner.listeners.contains(player) {
            debug!(%player, "Listener connected");
            inner.listeners.push(player.clone());
        }
    }

    #[instrument(skip(self))]
    fn disconnect(&self, player: &PlayerId) {
        self.lock().listeners.retain(|p| p != player);
    }

    fn is_connected(&self, player: &PlayerId) -> bool {
        self.lock().listeners.contains(player)
    }

    fn listeners(&self) -> Vec<PlayerId> {
        self.lock().listeners.clone()
    }
}
