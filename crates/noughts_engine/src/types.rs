//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Stable identifier of a player record.
///
/// Games and history entries refer to players through this id; the player
/// records themselves live in a directory owned by the caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(i32);

impl PlayerId {
    /// Wraps a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Stable identifier of a game record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(i32);

impl GameId {
    /// Wraps a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// A player's mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Symbol {
    /// Placed by the first player.
    X,
    /// Placed by the second player.
    O,
}

impl Symbol {
    /// Returns the other symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// Character used in the row-string form of the board.
    pub fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No mark yet.
    #[default]
    Empty,
    /// Holds a player's mark.
    Marked(Symbol),
}

impl Cell {
    /// Character used in the row-string form of the board (`_` when empty).
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::Marked(symbol) => symbol.as_char(),
        }
    }

    /// Parses a row-string character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '_' => Some(Cell::Empty),
            'X' => Some(Cell::Marked(Symbol::X)),
            'O' => Some(Cell::Marked(Symbol::O)),
            _ => None,
        }
    }

    /// Returns the mark, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::Marked(symbol) => Some(symbol),
        }
    }
}
