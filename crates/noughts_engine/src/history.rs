//! Move history records.

use crate::PlayerId;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Result annotation carried by a history entry.
///
/// Only the entry of the move that ends the game is ever stamped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
pub enum MoveResult {
    /// Regular move; the game went on.
    #[default]
    #[display("")]
    Pending,
    /// This move won the game.
    #[display("won")]
    Won,
    /// This move filled the board without a winner.
    #[display("drawn")]
    Drawn,
}

/// One accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct HistoryEntry {
    /// 1-based position in the game's move sequence.
    sequence: u32,
    /// The player who moved.
    player: PlayerId,
    /// Row of the move.
    row: usize,
    /// Column of the move.
    col: usize,
    /// Outcome annotation.
    result: MoveResult,
}

impl HistoryEntry {
    pub(crate) fn new(sequence: u32, player: PlayerId, row: usize, col: usize) -> Self {
        Self {
            sequence,
            player,
            row,
            col,
            result: MoveResult::Pending,
        }
    }

    pub(crate) fn stamp(&mut self, result: MoveResult) {
        self.result = result;
    }

    /// Coordinates in the `"row,col"` form used on the wire.
    pub fn move_label(&self) -> String {
        format!("{},{}", self.row, self.col)
    }
}
