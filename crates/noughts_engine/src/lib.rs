//! Tic-tac-toe game engine.
//!
//! Pure game logic with no I/O: a 3x3 [`Board`], the [`Game`] state machine
//! that validates and applies moves, detects wins and draws, records an
//! append-only history, and reports the player counter changes
//! ([`StatDelta`]) each transition implies.
//!
//! # Example
//!
//! ```
//! use noughts_engine::{Game, MoveOutcome, PlayerId};
//!
//! let alice = PlayerId::new(1);
//! let bob = PlayerId::new(2);
//! let (mut game, _started) = Game::new(alice, bob)?;
//!
//! let report = game.apply_move(alice, 1, 1)?;
//! assert_eq!(*report.outcome(), MoveOutcome::InProgress { next: bob });
//! # Ok::<(), noughts_engine::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod game;
mod history;
mod player;
mod types;

pub mod invariants;
pub mod rules;

pub use board::{Board, SIZE};
pub use error::GameError;
pub use game::{Game, GameStatus, MoveOutcome, MoveReport};
pub use history::{HistoryEntry, MoveResult};
pub use invariants::{GameInvariants, Invariant, InvariantSet, InvariantViolation};
pub use player::{Player, StatDelta};
pub use types::{Cell, GameId, PlayerId, Symbol};
