//! Seats and seating for turn-based table games.
//!
//! A seat binds at most one player by identity; it never owns the player.
//! Game-specific data (colors, hands, scores) lives in the typed `D`
//! parameter instead of a free-form property bag.

use crate::error::CommandError;
use crate::player::PlayerId;
use tracing::{debug, info, instrument};

/// One playing slot at a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat<D> {
    name: String,
    data: D,
    player: Option<PlayerId>,
    active: bool,
}

impl<D> Seat<D> {
    /// Creates an empty, inactive seat.
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            data,
            player: None,
            active: false,
        }
    }

    /// Returns the seat's label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the game data attached to this seat.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Returns the occupant, if any.
    pub fn player(&self) -> Option<&PlayerId> {
        self.player.as_ref()
    }

    /// Returns the occupant's name, or the seat label when empty.
    pub fn player_name(&self) -> &str {
        self.player.as_ref().map_or(self.name.as_str(), PlayerId::name)
    }

    /// Checks whether a player sits here.
    pub fn is_occupied(&self) -> bool {
        self.player.is_some()
    }

    /// Whether this seat must be filled for the table to be active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the seat as required (or not).
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Seats a player and marks the seat active.
    pub fn sit(&mut self, player: PlayerId) {
        self.player = Some(player);
        self.active = true;
    }

    /// Empties the seat. The active flag is kept.
    pub fn stand(&mut self) -> Option<PlayerId> {
        self.player.take()
    }
}

impl<D> std::fmt::Display for Seat<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The ordered seats of one table plus its player limits.
#[derive(Debug, Clone)]
pub struct Seating<D> {
    seats: Vec<Seat<D>>,
    min_players: usize,
    max_players: usize,
}

impl<D> Seating<D> {
    /// Creates seating from an ordered list of seats.
    pub fn new(seats: Vec<Seat<D>>, min_players: usize, max_players: usize) -> Self {
        Self {
            seats,
            min_players,
            max_players,
        }
    }

    /// Returns all seats in order.
    pub fn seats(&self) -> &[Seat<D>] {
        &self.seats
    }

    /// Returns one seat by index.
    pub fn seat(&self, index: usize) -> Option<&Seat<D>> {
        self.seats.get(index)
    }

    /// Returns one seat mutably by index.
    pub fn seat_mut(&mut self, index: usize) -> Option<&mut Seat<D>> {
        self.seats.get_mut(index)
    }

    /// Number of occupied seats.
    pub fn player_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    /// Index of the seat a player occupies.
    pub fn index_of(&self, player: &PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player() == Some(player))
    }

    /// The seat a player occupies.
    pub fn seat_of(&self, player: &PlayerId) -> Option<&Seat<D>> {
        self.index_of(player).and_then(|i| self.seats.get(i))
    }

    /// Finds a seat by label, ignoring case.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.seats
            .iter()
            .position(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Checks that every active seat is occupied.
    pub fn is_active(&self) -> bool {
        self.seats
            .iter()
            .all(|s| !s.is_active() || s.is_occupied())
    }

    /// Checks that every seat is occupied.
    pub fn all_occupied(&self) -> bool {
        self.seats.iter().all(Seat::is_occupied)
    }

    /// Enough players to start, with every active seat filled.
    pub fn has_quorum(&self) -> bool {
        self.player_count() >= self.min_players && self.is_active()
    }

    /// Seats a player, in the named seat or the first free one.
    ///
    /// Returns the index of the seat taken.
    #[instrument(skip(self))]
    pub fn add_player(
        &mut self,
        player: &PlayerId,
        seat_name: Option<&str>,
    ) -> Result<usize, CommandError> {
        if self.player_count() >= self.max_players {
            return Err(CommandError::illegal("Game already full."));
        }
        if self.index_of(player).is_some() {
            return Err(CommandError::illegal("You're already playing."));
        }

        let index = match seat_name {
            Some(name) => {
                let index = self
                    .find(name)
                    .ok_or_else(|| CommandError::illegal(format!("Seat {} does not exist.", name)))?;
                if self.seats[index].is_occupied() {
                    return Err(CommandError::illegal(format!(
                        "Seat {} is unavailable.",
                        name
                    )));
                }
                index
            }
            None => self
                .seats
                .iter()
                .position(|s| !s.is_occupied())
                .ok_or_else(|| CommandError::illegal("Game already full."))?,
        };

        self.seats[index].sit(player.clone());
        info!(%player, seat = %self.seats[index], "Player seated");
        Ok(index)
    }

    /// Puts `player` in the named seat, standing whoever sat there.
    ///
    /// Returns the seat index and the previous occupant.
    #[instrument(skip(self))]
    pub fn replace(
        &mut self,
        seat_name: &str,
        player: &PlayerId,
    ) -> Result<(usize, Option<PlayerId>), CommandError> {
        if self.index_of(player).is_some() {
            return Err(CommandError::illegal(format!(
                "Player ^Y{}^~ is already playing.",
                player
            )));
        }
        let index = self.find(seat_name).ok_or_else(|| {
            CommandError::illegal(format!("Seat ^G{}^~ does not exist.", seat_name))
        })?;

        let previous = self.seats[index].stand();
        self.seats[index].sit(player.clone());
        info!(%player, ?previous, seat = %self.seats[index], "Seat replaced");
        Ok((index, previous))
    }

    /// Stands a player up wherever they sit. Returns the seat index.
    #[instrument(skip(self))]
    pub fn remove_player(&mut self, player: &PlayerId) -> Option<usize> {
        let index = self.index_of(player)?;
        self.seats[index].stand();
        debug!(%player, index, "Player left seat");
        Some(index)
    }

    /// Renders the seat listing shown by `list`.
    pub fn listing(&self) -> String {
        let mut msg = String::from("   ");
        for (i, seat) in self.seats.iter().filter(|s| s.is_active()).enumerate() {
            let name = seat.player().map_or("[empty]", PlayerId::name);
            if i % 2 == 0 {
                msg.push_str(&format!("^Y{}^~: {} ", seat, name));
            } else {
                msg.push_str(&format!("^M{}^~: ^!{}^. ", seat, name));
            }
        }
        if msg == "   " {
            msg.push_str("^!None yet!^.");
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_seats() -> Seating<u8> {
        Seating::new(vec![Seat::new("White", 0), Seat::new("Black", 1)], 2, 2)
    }

    #[test]
    fn test_first_free_seat() {
        let mut seating = two_seats();
        assert_eq!(seating.add_player(&"alice".into(), None), Ok(0));
        assert_eq!(seating.add_player(&"bob".into(), None), Ok(1));
        assert!(seating.all_occupied());
    }

    #[test]
    fn test_named_seat_case_insensitive() {
        let mut seating = two_seats();
        assert_eq!(seating.add_player(&"alice".into(), Some("black")), Ok(1));
        let err = seating.add_player(&"bob".into(), Some("BLACK"));
        assert!(matches!(err, Err(CommandError::IllegalAction(_))));
    }

    #[test]
    fn test_rejects_duplicates_and_unknown_seats() {
        let mut seating = two_seats();
        let alice = PlayerId::from("alice");
        seating.add_player(&alice, None).expect("free seat");
        assert_eq!(
            seating.add_player(&alice, None),
            Err(CommandError::illegal("You're already playing."))
        );
        assert_eq!(
            seating.add_player(&"bob".into(), Some("Red")),
            Err(CommandError::illegal("Seat Red does not exist."))
        );
    }

    #[test]
    fn test_full_table() {
        let mut seating = two_seats();
        seating.add_player(&"a".into(), None).expect("seat");
        seating.add_player(&"b".into(), None).expect("seat");
        assert_eq!(
            seating.add_player(&"c".into(), None),
            Err(CommandError::illegal("Game already full."))
        );
    }

    #[test]
    fn test_leaving_deactivates_table() {
        let mut seating = two_seats();
        let alice = PlayerId::from("alice");
        seating.add_player(&alice, None).expect("seat");
        seating.add_player(&"bob".into(), None).expect("seat");
        assert!(seating.is_active());
        assert_eq!(seating.remove_player(&alice), Some(0));
        assert!(!seating.is_active());
        assert_eq!(seating.seat(0).map(Seat::player_name), Some("White"));
    }

    #[test]
    fn test_quorum_needs_min_players() {
        let mut seating = Seating::new(
            vec![Seat::new("North", 0), Seat::new("East", 1), Seat::new("South", 2)],
            2,
            3,
        );
        seating.add_player(&"a".into(), None).expect("seat");
        assert!(!seating.has_quorum());
        seating.add_player(&"b".into(), None).expect("seat");
        assert!(seating.has_quorum());
        assert!(!seating.all_occupied());
    }

    #[test]
    fn test_replace_fills_or_swaps() {
        let mut seating = two_seats();
        let alice = PlayerId::from("alice");
        let carol = PlayerId::from("carol");

        assert_eq!(seating.replace("white", &alice), Ok((0, None)));
        assert_eq!(seating.replace("White", &carol), Ok((0, Some(alice.clone()))));
        assert_eq!(seating.seat(0).and_then(Seat::player), Some(&carol));
        assert_eq!(seating.index_of(&alice), None);

        assert_eq!(
            seating.replace("black", &carol),
            Err(CommandError::illegal("Player ^Ycarol^~ is already playing."))
        );
        assert_eq!(
            seating.replace("red", &alice),
            Err(CommandError::illegal("Seat ^Gred^~ does not exist."))
        );
    }

    #[test]
    fn test_listing() {
        let mut seating = two_seats();
        assert!(seating.listing().contains("None yet"));
        seating.add_player(&"alice".into(), None).expect("seat");
        assert!(seating.listing().contains("^YWhite^~: alice"));
    }
}
