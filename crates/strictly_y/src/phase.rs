//! Table phases and the transitions allowed between them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Macro-state of a Y table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Phase {
    /// Board size and variants may be changed.
    #[default]
    Config,
    /// Waiting for both seats to fill.
    NeedPlayers,
    /// Moves are being made.
    Playing,
    /// Terminal.
    Finished,
}

/// Every transition a table may take, in order of the normal game flow.
/// The last two entries are early termination.
const TRANSITIONS: &[(Phase, Phase)] = &[
    (Phase::Config, Phase::NeedPlayers),
    (Phase::NeedPlayers, Phase::Playing),
    (Phase::Playing, Phase::Finished),
    (Phase::Config, Phase::Finished),
    (Phase::NeedPlayers, Phase::Finished),
];

/// A transition missing from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Cannot move from {} to {}", from, to)]
pub struct PhaseError {
    /// Phase the table was in.
    pub from: Phase,
    /// Phase that was requested.
    pub to: Phase,
}

impl std::error::Error for PhaseError {}

impl Phase {
    /// Checks the transition table.
    pub fn can_advance_to(self, to: Phase) -> bool {
        TRANSITIONS.contains(&(self, to))
    }

    /// Moves to `to` if the transition table allows it.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] and leaves the phase unchanged otherwise.
    pub fn advance(&mut self, to: Phase) -> Result<(), PhaseError> {
        if !self.can_advance_to(to) {
            return Err(PhaseError { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}
