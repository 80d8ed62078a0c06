//! Host error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Hosting error with location tracking.
///
/// Raised for table management failures: bad or duplicate table names,
/// unknown tables or games, full registries, taken player names.
#[derive(Debug, Clone, Display, Error)]
#[display("Host error: {} at {}:{}", message, file, line)]
pub struct HostError {
    /// Error message, shown to the player as-is.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl HostError {
    /// Creates a new host error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The message without location, as a player should see it.
    pub fn message(&self) -> &str {
        &self.message
    }
}
