//! History consistency: one ordered entry per accepted move.

use super::Invariant;
use crate::{Game, MoveResult};

/// Invariant: history has `turns_played` entries numbered `1..=n`, movers
/// alternate starting with X, and only the final entry of an ended game
/// carries a result.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let history = game.history();
        if history.len() != *game.turns_played() as usize {
            return false;
        }

        let ordered = history.iter().enumerate().all(|(idx, entry)| {
            let expected_player = if idx % 2 == 0 {
                *game.player_x()
            } else {
                *game.player_o()
            };
            *entry.sequence() as usize == idx + 1 && *entry.player() == expected_player
        });

        let stamped = history
            .iter()
            .filter(|entry| *entry.result() != MoveResult::Pending)
            .count();
        let last_stamped = history
            .last()
            .is_some_and(|entry| *entry.result() != MoveResult::Pending);
        let stamps_ok = if game.game_ended() {
            stamped == 1 && last_stamped
        } else {
            stamped == 0
        };

        ordered && stamps_ok
    }

    fn description() -> &'static str {
        "History is numbered 1..=turns played, alternates from X, \
         and only the final move is stamped"
    }
}
