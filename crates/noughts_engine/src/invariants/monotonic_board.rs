//! Board monotonicity: marks never disappear or change hands.

use super::Invariant;
use crate::{Cell, Game};

/// Invariant: the board holds exactly one mark per accepted move, each in
/// the cell the move named and with the mover's symbol.
pub struct MonotonicBoardInvariant;

impl Invariant<Game> for MonotonicBoardInvariant {
    fn holds(game: &Game) -> bool {
        let count_matches = game.board().marks() == *game.turns_played() as usize;

        let moves_present = game.history().iter().all(|entry| {
            let expected = game.symbol_of(*entry.player()).map(Cell::Marked);
            game.board().get(*entry.row(), *entry.col()).ok() == expected
        });

        count_matches && moves_present
    }

    fn description() -> &'static str {
        "Number of marked cells equals turns played and every move's mark is in place"
    }
}
