//! Move history entries.

use crate::board::Coord;
use serde::{Deserialize, Serialize};

/// One entry of a table's move history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRecord {
    /// Stones placed in one turn: one cell, or two in Master Y.
    Place(Vec<Coord>),
    /// Black took over White's opening stone.
    Swap,
    /// The mover resigned.
    Resign,
}

impl MoveRecord {
    /// The cell a swap would recolor: the first cell of a placement.
    pub fn opening_cell(&self) -> Option<Coord> {
        match self {
            MoveRecord::Place(cells) => cells.first().copied(),
            MoveRecord::Swap | MoveRecord::Resign => None,
        }
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveRecord::Place(cells) => {
                let tokens: Vec<String> = cells.iter().map(ToString::to_string).collect();
                write!(f, "{}", tokens.join(", "))
            }
            MoveRecord::Swap => write!(f, "swap"),
            MoveRecord::Resign => write!(f, "resign"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let record = MoveRecord::Place(vec![Coord::new(0, 0), Coord::new(1, 3)]);
        assert_eq!(record.to_string(), "a1, b4");
        assert_eq!(MoveRecord::Swap.to_string(), "swap");
        assert_eq!(record.opening_cell(), Some(Coord::new(0, 0)));
        assert_eq!(MoveRecord::Resign.opening_cell(), None);
    }

    #[test]
    fn test_history_snapshot_json() {
        let history = vec![MoveRecord::Place(vec![Coord::new(2, 4)]), MoveRecord::Swap];
        let json = serde_json::to_string(&history).expect("serializable");
        assert_eq!(json, r#"[{"Place":[{"x":2,"y":4}]},"Swap"]"#);
        let back: Vec<MoveRecord> = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, history);
    }
}
