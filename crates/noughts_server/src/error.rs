//! Errors surfaced by the directories and the service layer.

use crate::DbError;
use derive_more::{Display, Error};
use noughts_engine::{GameError, GameId, PlayerId};

/// Failure of a player or game directory.
#[derive(Debug, Clone, Display, Error)]
pub enum StoreError {
    /// The backing database failed.
    #[display("{_0}")]
    Database(DbError),

    /// The game changed (or vanished) since it was read.
    #[display("Game {id} was modified by another request; reload and retry")]
    StaleGame {
        /// The contested game.
        id: GameId,
    },

    /// A player with this name is already registered.
    #[display("A User with that name already exists!")]
    DuplicateName {
        /// The requested name.
        name: String,
    },

    /// A counter update targeted a player that does not exist.
    #[display("Player {id} does not exist")]
    UnknownPlayer {
        /// The missing player.
        id: PlayerId,
    },

    /// A stored snapshot failed its integrity checks.
    #[display("Stored game {id} is corrupt: {reason}")]
    Corrupt {
        /// The damaged game.
        id: GameId,
        /// What failed.
        reason: String,
    },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Database(err)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(DbError::from(err))
    }
}

/// Error returned by [`GameService`](crate::GameService) operations.
#[derive(Debug, Clone, Display, Error)]
pub enum ServiceError {
    /// A referenced game or player does not exist.
    #[display("{entity} {key} does not exist")]
    NotFound {
        /// Kind of record ("Game", "User").
        entity: &'static str,
        /// The lookup key.
        key: String,
    },

    /// Nobody has registered yet.
    #[display("No users found")]
    NoPlayers,

    /// A move came from someone other than the player to move.
    #[display("It is {expected}'s turn")]
    NotYourTurn {
        /// Name of the player to move.
        expected: String,
    },

    /// The request conflicts with existing state.
    #[display("{message}")]
    Conflict {
        /// Explanation for the caller.
        message: String,
    },

    /// The game engine rejected the transition.
    #[display("{_0}")]
    Game(GameError),

    /// A directory failed.
    #[display("{_0}")]
    Store(StoreError),
}

impl ServiceError {
    /// A missing game.
    pub fn game_not_found(id: GameId) -> Self {
        Self::NotFound {
            entity: "Game",
            key: id.to_string(),
        }
    }

    /// A missing user.
    pub fn user_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "User",
            key: name.into(),
        }
    }
}

impl From<GameError> for ServiceError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName { .. } | StoreError::StaleGame { .. } => Self::Conflict {
                message: err.to_string(),
            },
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_becomes_conflict() {
        let err = ServiceError::from(StoreError::DuplicateName {
            name: "alice".into(),
        });
        assert!(matches!(
            err,
            ServiceError::Conflict { ref message }
                if message == "A User with that name already exists!"
        ));
    }

    #[test]
    fn test_stale_game_becomes_conflict() {
        let err = ServiceError::from(StoreError::StaleGame { id: GameId::new(3) });
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ServiceError::game_not_found(GameId::new(9)).to_string(),
            "Game 9 does not exist"
        );
    }
}
