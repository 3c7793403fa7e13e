//! Walks every legal game from the empty board.
//!
//! Small enough to enumerate completely: every reachable state is checked
//! against the invariants and every terminal state against its outcome.

use noughts_engine::{
    Game, GameError, GameInvariants, InvariantSet, MoveOutcome, PlayerId, StatDelta,
};

const X: PlayerId = PlayerId::new(1);
const O: PlayerId = PlayerId::new(2);

#[derive(Debug, Default)]
struct Tally {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    positions: usize,
}

fn walk(game: &Game, tally: &mut Tally) {
    tally.positions += 1;
    assert!(GameInvariants::check_all(game).is_ok(), "{game:?}");

    let mover = game.next_turn().expect("Walk only visits live games");
    let waiting = game.opponent_of(mover).expect("Participant");

    for (row, col) in game.board().empty_cells() {
        // The waiting player is always refused, whatever the cell.
        let mut probe = game.clone();
        assert_eq!(
            probe.apply_move(waiting, row, col),
            Err(GameError::WrongTurn { expected: mover })
        );
        assert_eq!(&probe, game);

        let mut next = game.clone();
        let report = next.apply_move(mover, row, col).expect("Empty cell");
        assert_eq!(*next.turns_played() as usize, next.history().len());

        match *report.outcome() {
            MoveOutcome::InProgress { next: to_move } => {
                assert_eq!(to_move, waiting);
                assert!(report.deltas().is_empty());
                walk(&next, tally);
            }
            MoveOutcome::Won { winner, loser } => {
                assert_eq!(winner, mover);
                assert!(next.winner() == Some(winner) && !next.draw());
                assert_eq!(
                    *report.deltas(),
                    vec![StatDelta::won(winner), StatDelta::lost(loser)]
                );
                if winner == X {
                    tally.x_wins += 1;
                } else {
                    tally.o_wins += 1;
                }
                assert_eq!(next.apply_move(waiting, 0, 0), Err(GameError::GameAlreadyEnded));
            }
            MoveOutcome::Drawn => {
                assert!(next.board().is_full());
                assert!(next.draw() && next.winner().is_none());
                tally.draws += 1;
            }
        }
    }
}

#[test]
fn test_every_game_respects_invariants() {
    let (game, _) = Game::new(X, O).unwrap();
    let mut tally = Tally::default();
    walk(&game, &mut tally);

    assert_eq!(tally.x_wins, 131_184);
    assert_eq!(tally.o_wins, 77_904);
    assert_eq!(tally.draws, 46_080);
    assert_eq!(tally.x_wins + tally.o_wins + tally.draws, 255_168);
}
