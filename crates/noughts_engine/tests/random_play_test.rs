//! Randomized play: arbitrary move attempts never break a game.

use noughts_engine::{Game, GameError, MoveOutcome, PlayerId};
use proptest::prelude::*;

const X: PlayerId = PlayerId::new(1);
const O: PlayerId = PlayerId::new(2);

/// A move attempt: who tries (true = X) and where, including off-board cells.
fn attempt() -> impl Strategy<Value = (bool, usize, usize)> {
    (any::<bool>(), 0usize..4, 0usize..4)
}

proptest! {
    #[test]
    fn arbitrary_attempts_keep_invariants(attempts in prop::collection::vec(attempt(), 0..40)) {
        let (mut game, _) = Game::new(X, O).unwrap();
        let mut previous_turn = game.next_turn();

        for (is_x, row, col) in attempts {
            let player = if is_x { X } else { O };
            let before = game.clone();

            match game.apply_move(player, row, col) {
                Ok(report) => {
                    prop_assert_eq!(Some(player), previous_turn);
                    if let MoveOutcome::InProgress { next } = *report.outcome() {
                        prop_assert_ne!(next, player);
                    }
                }
                Err(err) => {
                    prop_assert_eq!(&game, &before);
                    match err {
                        GameError::GameAlreadyEnded => prop_assert!(before.game_ended()),
                        GameError::WrongTurn { expected } => prop_assert_ne!(expected, player),
                        GameError::OutOfRange { .. } => prop_assert!(row > 2 || col > 2),
                        GameError::CellOccupied { .. } => {
                            prop_assert!(!before.board().is_empty(row, col).unwrap())
                        }
                        other => prop_assert!(false, "unexpected error {other}"),
                    }
                }
            }

            prop_assert!(game.check_invariants().is_ok());
            prop_assert!(!(game.winner().is_some() && game.draw()));
            previous_turn = game.next_turn();
        }
    }
}
