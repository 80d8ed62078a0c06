//! Command line splitting shared by the host and every game.

use tracing::instrument;

/// A command split into a lower-cased verb and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The verb, lower-cased.
    pub primary: String,
    /// Remaining whitespace-separated words, as typed.
    pub args: Vec<String>,
}

impl Command {
    /// Splits a raw command line. Returns `None` for a blank line.
    #[instrument]
    pub fn parse(line: &str) -> Option<Self> {
        let mut bits = line.split_whitespace();
        let primary = bits.next()?.to_lowercase();
        Some(Self {
            primary,
            args: bits.map(str::to_string).collect(),
        })
    }

    /// Checks the verb against a list of aliases.
    pub fn is(&self, aliases: &[&str]) -> bool {
        aliases.contains(&self.primary.as_str())
    }
}

/// Reads an on/off style word.
///
/// Returns `Some(true)` for words like `on`/`yes`, `Some(false)` for
/// `off`/`no`, and `None` for anything else.
#[instrument]
pub fn booleanize(word: &str) -> Option<bool> {
    match word.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases_verb_only() {
        let cmd = Command::parse("  MOVE A1  ").expect("non-blank");
        assert_eq!(cmd.primary, "move");
        assert_eq!(cmd.args, vec!["A1".to_string()]);
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_booleanize() {
        assert_eq!(booleanize("On"), Some(true));
        assert_eq!(booleanize("no"), Some(false));
        assert_eq!(booleanize("maybe"), None);
    }
}
