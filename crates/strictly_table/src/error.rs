//! Errors reported back to the player who issued a command.

use derive_more::Display;

/// Why a table refused a command.
///
/// None of these are fatal: the table state is unchanged and the host
/// reports the message to the acting player only.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CommandError {
    /// The command's arguments could not be parsed.
    #[display("{}", _0)]
    MalformedInput(String),

    /// The command is well formed but not allowed right now.
    #[display("{}", _0)]
    IllegalAction(String),

    /// A configuration value is outside its permitted range.
    #[display("{}", _0)]
    Configuration(String),

    /// The verb means nothing in the current phase.
    #[display("Invalid command.")]
    InvalidCommand,
}

impl CommandError {
    /// Shorthand for [`CommandError::MalformedInput`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Shorthand for [`CommandError::IllegalAction`].
    pub fn illegal(message: impl Into<String>) -> Self {
        Self::IllegalAction(message.into())
    }

    /// Shorthand for [`CommandError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl std::error::Error for CommandError {}
