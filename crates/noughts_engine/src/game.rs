//! Move application state machine.
//!
//! A [`Game`] owns its board and history and refers to its two players by
//! id. Every transition validates first and mutates second: a rejected call
//! leaves the game untouched, and an accepted one returns the counter
//! changes ([`StatDelta`]) the player directory must apply together with the
//! new snapshot.

use crate::invariants::{GameInvariants, InvariantSet};
use crate::{Board, GameError, HistoryEntry, MoveResult, PlayerId, StatDelta, Symbol};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are being accepted.
    InProgress,
    /// Ended with a winner.
    Won(PlayerId),
    /// Ended with a full board and no winner.
    Drawn,
    /// Abandoned before it ended.
    Cancelled,
}

impl GameStatus {
    /// True for every state that accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// What an accepted move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The game goes on and `next` must move.
    InProgress {
        /// Player whose move is expected now.
        next: PlayerId,
    },
    /// The move completed a line.
    Won {
        /// The mover.
        winner: PlayerId,
        /// The other participant.
        loser: PlayerId,
    },
    /// The move filled the board without completing a line.
    Drawn,
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveReport {
    /// Where the game stands now.
    outcome: MoveOutcome,
    /// The history entry recorded for the move.
    entry: HistoryEntry,
    /// Counter changes to apply atomically with the new snapshot.
    deltas: Vec<StatDelta>,
}

/// A game between two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Game {
    /// Player marking X; moves first.
    player_x: PlayerId,
    /// Player marking O.
    player_o: PlayerId,
    /// The grid.
    board: Board,
    #[getter(skip)]
    next_turn: PlayerId,
    /// Accepted moves so far.
    turns_played: u32,
    /// Lifecycle state.
    status: GameStatus,
    #[getter(skip)]
    history: Vec<HistoryEntry>,
}

// ─────────────────────────────────────────────────────────────
//  Construction
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Starts a game with an empty board and `player_x` to move.
    ///
    /// Returns the game together with the `games_in_progress` increments for
    /// both players.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SamePlayer`] if both ids are equal.
    #[instrument]
    pub fn new(
        player_x: PlayerId,
        player_o: PlayerId,
    ) -> Result<(Self, [StatDelta; 2]), GameError> {
        if player_x == player_o {
            warn!(%player_x, "Refusing to start a game against oneself");
            return Err(GameError::SamePlayer);
        }

        let game = Self {
            player_x,
            player_o,
            board: Board::new(),
            next_turn: player_x,
            turns_played: 0,
            status: GameStatus::InProgress,
            history: Vec::new(),
        };
        info!(%player_x, %player_o, "Game started");
        Ok((
            game,
            [StatDelta::started(player_x), StatDelta::started(player_o)],
        ))
    }
}

// ─────────────────────────────────────────────────────────────
//  Transitions
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Applies a move by `player` at `(row, col)`.
    ///
    /// Checks run in a fixed order: ended, turn, range, occupancy. The
    /// symbol comes from the player's seat, never from the caller.
    ///
    /// # Errors
    ///
    /// [`GameError::GameAlreadyEnded`], [`GameError::WrongTurn`],
    /// [`GameError::OutOfRange`], [`GameError::CellOccupied`]; on any of
    /// these the game is unchanged.
    #[instrument(skip(self), fields(turn = self.turns_played + 1))]
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        row: usize,
        col: usize,
    ) -> Result<MoveReport, GameError> {
        if self.status.is_terminal() {
            debug!(status = ?self.status, "Move on finished game rejected");
            return Err(GameError::GameAlreadyEnded);
        }
        if player != self.next_turn {
            debug!(expected = %self.next_turn, "Move out of turn rejected");
            return Err(GameError::WrongTurn {
                expected: self.next_turn,
            });
        }
        if !self.board.is_empty(row, col)? {
            debug!("Move on occupied cell rejected");
            return Err(GameError::CellOccupied { row, col });
        }

        // Work on a copy so nothing leaks out if finalization trips.
        let mut next = self.clone();
        let symbol = next.seat_symbol(player);
        next.board.place(row, col, symbol)?;
        next.turns_played += 1;
        next.history
            .push(HistoryEntry::new(next.turns_played, player, row, col));

        let (outcome, deltas) = if let Some(winning) = next.board.winning_symbol() {
            let deltas = next.finalize(Some(winning), false)?;
            let winner = next.seat_player(winning);
            (
                MoveOutcome::Won {
                    winner,
                    loser: next.other(winner),
                },
                deltas,
            )
        } else if next.board.is_full() {
            (MoveOutcome::Drawn, next.finalize(None, true)?)
        } else {
            next.next_turn = next.other(player);
            (
                MoveOutcome::InProgress {
                    next: next.next_turn,
                },
                Vec::new(),
            )
        };

        debug_assert!(
            GameInvariants::check_all(&next).is_ok(),
            "invariants violated after move: {:?}",
            GameInvariants::check_all(&next)
        );

        let entry = next
            .history
            .last()
            .cloned()
            .ok_or(GameError::InvalidCompletion)?;
        *self = next;

        info!(%player, row, col, %symbol, outcome = ?outcome, "Move accepted");
        Ok(MoveReport {
            outcome,
            entry,
            deltas,
        })
    }

    /// Cancels a game that has not ended.
    ///
    /// Returns the `games_in_progress` decrements for both players; no other
    /// counter is touched.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameAlreadyEnded`] from any terminal state.
    #[instrument(skip(self), fields(turns_played = self.turns_played))]
    pub fn cancel(&mut self) -> Result<[StatDelta; 2], GameError> {
        if self.status.is_terminal() {
            debug!(status = ?self.status, "Cancel on finished game rejected");
            return Err(GameError::GameAlreadyEnded);
        }
        self.status = GameStatus::Cancelled;
        info!(player_x = %self.player_x, player_o = %self.player_o, "Game cancelled");
        Ok([
            StatDelta::cancelled(self.player_x),
            StatDelta::cancelled(self.player_o),
        ])
    }

    /// Ends the game, stamps the last history entry and returns the
    /// completion deltas for both players.
    fn finalize(
        &mut self,
        winner: Option<Symbol>,
        draw: bool,
    ) -> Result<Vec<StatDelta>, GameError> {
        let (status, stamp, deltas) = match (winner, draw) {
            (Some(symbol), false) => {
                let winner = self.seat_player(symbol);
                let loser = self.other(winner);
                (
                    GameStatus::Won(winner),
                    MoveResult::Won,
                    vec![StatDelta::won(winner), StatDelta::lost(loser)],
                )
            }
            (None, true) => (
                GameStatus::Drawn,
                MoveResult::Drawn,
                vec![
                    StatDelta::drawn(self.player_x),
                    StatDelta::drawn(self.player_o),
                ],
            ),
            _ => {
                error!(?winner, draw, "Completion needs exactly one of winner or draw");
                return Err(GameError::InvalidCompletion);
            }
        };

        let last = self.history.last_mut().ok_or_else(|| {
            error!("Completion with empty history");
            GameError::InvalidCompletion
        })?;
        last.stamp(stamp);
        self.status = status;
        Ok(deltas)
    }
}

// ─────────────────────────────────────────────────────────────
//  Queries
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Player whose move is expected, or `None` once the game is over.
    pub fn next_turn(&self) -> Option<PlayerId> {
        (!self.status.is_terminal()).then_some(self.next_turn)
    }

    /// True once the game has been won or drawn.
    pub fn game_ended(&self) -> bool {
        matches!(self.status, GameStatus::Won(_) | GameStatus::Drawn)
    }

    /// True if the game ended without a winner.
    pub fn draw(&self) -> bool {
        self.status == GameStatus::Drawn
    }

    /// The winner, if the game was won.
    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }

    /// True if the game was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == GameStatus::Cancelled
    }

    /// Ordered move history.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// True if `player` sits at this game.
    pub fn involves(&self, player: PlayerId) -> bool {
        player == self.player_x || player == self.player_o
    }

    /// The symbol `player` marks with, if they play in this game.
    pub fn symbol_of(&self, player: PlayerId) -> Option<Symbol> {
        self.involves(player).then(|| self.seat_symbol(player))
    }

    /// The other participant, if `player` plays in this game.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.involves(player).then(|| self.other(player))
    }

    /// Checks every game invariant, reporting the broken ones.
    ///
    /// # Errors
    ///
    /// Returns the descriptions of all violated invariants.
    pub fn check_invariants(&self) -> Result<(), Vec<crate::InvariantViolation>> {
        GameInvariants::check_all(self)
    }

    fn seat_symbol(&self, player: PlayerId) -> Symbol {
        if player == self.player_x {
            Symbol::X
        } else {
            Symbol::O
        }
    }

    fn seat_player(&self, symbol: Symbol) -> PlayerId {
        match symbol {
            Symbol::X => self.player_x,
            Symbol::O => self.player_o,
        }
    }

    fn other(&self, player: PlayerId) -> PlayerId {
        if player == self.player_x {
            self.player_o
        } else {
            self.player_x
        }
    }
}
