//! Errors raised by the game engine.

use crate::PlayerId;

/// Error that can occur when validating or applying a move.
///
/// Every variant except [`GameError::InvalidCompletion`] is a rejected
/// request: the game is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameError {
    /// The game has already ended or was cancelled.
    #[display("Game has already ended")]
    GameAlreadyEnded,

    /// The acting player is not the one whose move is expected.
    #[display("It is player {expected}'s turn")]
    WrongTurn {
        /// Player whose move is expected.
        expected: PlayerId,
    },

    /// Row or column outside `0..=2`.
    #[display("Cell ({row}, {col}) is off the board; row and col must be between 0 and 2")]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Cell ({row}, {col}) is not empty")]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// Both sides of a game were the same player.
    #[display("A player cannot play against themselves")]
    SamePlayer,

    /// A row-string board could not be parsed.
    #[display("Malformed board row '{row}'")]
    MalformedBoard {
        /// The offending row text.
        row: String,
    },

    /// Completion was requested with neither a winner nor a draw (or both).
    ///
    /// This is an engine bug, never a client error.
    #[display("Game completion requires exactly one of winner or draw")]
    InvalidCompletion,
}

impl GameError {
    /// Returns true if the error is caused by bad client input rather than an
    /// internal fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GameError::InvalidCompletion)
    }
}
