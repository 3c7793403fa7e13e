//! Storage seams between the service and its backends.
//!
//! Both directories are synchronous; every call is a short transaction.
//! Writes that touch a game take the [`GameRecord`] that was read, and fail
//! with [`StoreError::StaleGame`] when another writer got there first.

use derive_getters::Getters;
use noughts_engine::{Game, GameId, Player, PlayerId, StatDelta};

use crate::StoreError;

/// A persisted game with its optimistic-lock version.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameRecord {
    /// Store-assigned identifier.
    id: GameId,
    /// Incremented on every commit.
    version: i32,
    /// The engine state.
    game: Game,
}

impl GameRecord {
    /// Wraps a loaded game.
    pub fn new(id: GameId, version: i32, game: Game) -> Self {
        Self { id, version, game }
    }

    /// Mutable access for applying a transition before commit.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Consumes the record, keeping the game.
    pub fn into_game(self) -> Game {
        self.game
    }
}

/// Player registry.
pub trait PlayerDirectory {
    /// Registers a player with zeroed counters.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateName`] if the name is taken.
    fn create_player(&self, name: &str, email: Option<&str>) -> Result<Player, StoreError>;

    /// Looks a player up by id.
    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    /// Looks a player up by exact name.
    fn player_by_name(&self, name: &str) -> Result<Option<Player>, StoreError>;

    /// All players in registration order.
    fn list_players(&self) -> Result<Vec<Player>, StoreError>;
}

/// Game snapshot store.
///
/// Every write applies its `deltas` to the player counters in the same
/// transaction as the snapshot change.
pub trait GameDirectory {
    /// Persists a new game.
    fn insert_game(&self, game: &Game, deltas: &[StatDelta]) -> Result<GameRecord, StoreError>;

    /// Loads a game by id.
    fn game(&self, id: GameId) -> Result<Option<GameRecord>, StoreError>;

    /// Replaces the snapshot of `record`, provided its version is still
    /// current, and returns the record with the bumped version.
    fn commit_game(&self, record: &GameRecord, deltas: &[StatDelta])
    -> Result<GameRecord, StoreError>;

    /// Removes the game, provided its version is still current.
    fn delete_game(&self, record: &GameRecord, deltas: &[StatDelta]) -> Result<(), StoreError>;

    /// Games `player` takes part in that have not ended, ordered by id.
    fn active_games_for(&self, player: PlayerId) -> Result<Vec<GameRecord>, StoreError>;
}

/// A backend providing both directories, shareable across request tasks.
pub trait Store: PlayerDirectory + GameDirectory + Send + Sync + 'static {}

impl<T> Store for T where T: PlayerDirectory + GameDirectory + Send + Sync + 'static {}
