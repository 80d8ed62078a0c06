//! Player identity.

use derive_more::Display;
use tracing::instrument;

/// Longest name a player or table may carry.
pub const MAX_NAME_LENGTH: usize = 16;

/// Identity of a connected player.
///
/// Games only ever hold this handle; the connection behind it is owned by
/// the host and may disappear at any time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player identity from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the player's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Lookup of logged-in players by name.
///
/// Games use this to seat someone other than the acting player.
pub trait Roster: Send + Sync + std::fmt::Debug {
    /// Finds a logged-in player, ignoring case.
    fn find_player(&self, name: &str) -> Option<PlayerId>;
}

impl Roster for Vec<PlayerId> {
    fn find_player(&self, name: &str) -> Option<PlayerId> {
        self.iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .cloned()
    }
}

/// Checks that a player or table name is acceptable.
///
/// Names are alphanumeric, start with a letter and are at most
/// [`MAX_NAME_LENGTH`] characters long.
#[instrument]
pub fn name_is_valid(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.chars().count() <= MAX_NAME_LENGTH
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric())
}
