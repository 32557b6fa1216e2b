//! Game data carried inside events.
//!
//! These are the values clients render: who is `X` and who is `O`, what
//! the 9 cells hold, and whose turn it is. Field names and shapes here
//! are the wire contract, so the JSON form is pinned down by the tests
//! at the bottom of this file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the board. Cells are addressed `0..CELL_COUNT`,
/// row-major, with no row/column abstraction on the wire.
pub const CELL_COUNT: usize = 9;

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// One of the two seats in a room, and the mark that seat places.
///
/// Serialized as the bare strings `"X"` and `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Both symbols, `X` first.
    pub const ALL: [Symbol; 2] = [Symbol::X, Symbol::O];

    /// Returns the other symbol.
    pub fn opposite(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// Client-chosen room identifier.
///
/// Opaque: the server never validates its format, it only enforces that
/// two live rooms never share one. Serialized as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Creates a room id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The 9 cells of a room's board.
///
/// Serialized as a 9-element array of `null`, `"X"` or `"O"`. The board
/// itself enforces no game rules; the turn engine in the room layer
/// decides which writes are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([Option<Symbol>; CELL_COUNT]);

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of the cell at `index`.
    ///
    /// The outer `Option` is `None` when `index` is off the board; the
    /// inner one is `None` when the cell is empty.
    pub fn get(&self, index: usize) -> Option<Option<Symbol>> {
        self.0.get(index).copied()
    }

    /// Writes `symbol` into the cell at `index`. Off-board indices are
    /// ignored.
    pub fn fill(&mut self, index: usize, symbol: Symbol) {
        if let Some(cell) = self.0.get_mut(index) {
            *cell = Some(symbol);
        }
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.0 = [None; CELL_COUNT];
    }

    /// Returns all cells in index order.
    pub fn cells(&self) -> &[Option<Symbol>; CELL_COUNT] {
        &self.0
    }

    /// Number of non-empty cells.
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|c| c.is_some()).count()
    }

    /// Returns `true` if no cell holds a symbol.
    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    /// Returns `true` if every cell holds a symbol.
    pub fn is_full(&self) -> bool {
        self.filled() == CELL_COUNT
    }
}

/// Compact single-line form for logs: `X.O|...|..X`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 && i % 3 == 0 {
                f.write_str("|")?;
            }
            match cell {
                Some(symbol) => write!(f, "{symbol}")?,
                None => f.write_str(".")?,
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Board and turn state shared by both seats (`updateBoard` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Symbol,
}

impl GameSnapshot {
    /// Tags the snapshot with the recipient's own seat.
    pub fn for_seat(self, symbol: Symbol) -> SeatSnapshot {
        SeatSnapshot {
            symbol,
            board: self.board,
            current_player: self.current_player,
        }
    }
}

/// A [`GameSnapshot`] addressed to one seat (`init` and `restartGame`
/// payloads). `symbol` is the recipient's seat, not the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSnapshot {
    pub symbol: Symbol,
    pub board: Board,
    pub current_player: Symbol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_serializes_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Symbol::X).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Symbol::O).unwrap(), "\"O\"");
    }

    #[test]
    fn test_symbol_rejects_lowercase() {
        assert!(serde_json::from_str::<Symbol>("\"x\"").is_err());
    }

    #[test]
    fn test_symbol_opposite_is_an_involution() {
        for s in Symbol::ALL {
            assert_ne!(s.opposite(), s);
            assert_eq!(s.opposite().opposite(), s);
        }
    }

    #[test]
    fn test_room_id_is_a_plain_string() {
        let id = RoomId::from("R1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"R1\"");
        assert_eq!(id.to_string(), "R1");
        assert_eq!(id.as_str(), "R1");
    }

    #[test]
    fn test_empty_board_is_nine_nulls() {
        let json = serde_json::to_value(Board::new()).unwrap();
        assert_eq!(json, serde_json::Value::Array(vec![serde_json::Value::Null; 9]));
    }

    #[test]
    fn test_board_with_marks_json_shape() {
        let mut board = Board::new();
        board.fill(0, Symbol::X);
        board.fill(4, Symbol::O);
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["X", null, null, null, "O", null, null, null, null])
        );
    }

    #[test]
    fn test_board_rejects_wrong_length() {
        let short = "[null, null, null]";
        assert!(serde_json::from_str::<Board>(short).is_err());
    }

    #[test]
    fn test_board_get_distinguishes_off_board_from_empty() {
        let mut board = Board::new();
        board.fill(8, Symbol::O);
        assert_eq!(board.get(0), Some(None));
        assert_eq!(board.get(8), Some(Some(Symbol::O)));
        assert_eq!(board.get(9), None);
    }

    #[test]
    fn test_board_fill_off_board_is_ignored() {
        let mut board = Board::new();
        board.fill(42, Symbol::X);
        assert!(board.is_empty());
    }

    #[test]
    fn test_board_full_and_clear() {
        let mut board = Board::new();
        for i in 0..CELL_COUNT {
            board.fill(i, if i % 2 == 0 { Symbol::X } else { Symbol::O });
        }
        assert!(board.is_full());
        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.filled(), 0);
    }

    #[test]
    fn test_board_display() {
        let mut board = Board::new();
        board.fill(0, Symbol::X);
        board.fill(2, Symbol::O);
        board.fill(8, Symbol::X);
        assert_eq!(board.to_string(), "X.O|...|..X");
    }

    #[test]
    fn test_game_snapshot_uses_camel_case() {
        let snap = GameSnapshot {
            board: Board::new(),
            current_player: Symbol::O,
        };
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["currentPlayer"], "O");
        assert!(json.get("current_player").is_none());
    }

    #[test]
    fn test_for_seat_keeps_turn_and_adds_symbol() {
        let snap = GameSnapshot {
            board: Board::new(),
            current_player: Symbol::X,
        };
        let seat = snap.for_seat(Symbol::O);
        assert_eq!(seat.symbol, Symbol::O);
        assert_eq!(seat.current_player, Symbol::X);

        let json = serde_json::to_value(seat).unwrap();
        assert_eq!(json["symbol"], "O");
        assert_eq!(json["currentPlayer"], "X");
        assert_eq!(json["board"], serde_json::Value::Array(vec![serde_json::Value::Null; 9]));
    }
}
