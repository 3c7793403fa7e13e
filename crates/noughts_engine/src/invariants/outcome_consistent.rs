//! Outcome consistency between status flags and the board.

use super::Invariant;
use crate::{Game, GameStatus};

/// Invariant: a winner exists exactly when the game ended without a draw,
/// and the status agrees with what the board shows.
pub struct OutcomeConsistentInvariant;

impl Invariant<Game> for OutcomeConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let flags_ok = game.winner().is_some() == (game.game_ended() && !game.draw());
        let board = game.board();

        let board_ok = match *game.status() {
            GameStatus::Won(player) => board.winning_symbol() == game.symbol_of(player),
            GameStatus::Drawn => board.is_full() && board.winning_symbol().is_none(),
            GameStatus::InProgress | GameStatus::Cancelled => {
                board.winning_symbol().is_none() && !board.is_full()
            }
        };

        flags_ok && board_ok
    }

    fn description() -> &'static str {
        "Winner is set iff the game ended without a draw, matching the board"
    }
}
