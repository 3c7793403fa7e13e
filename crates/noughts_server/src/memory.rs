//! In-process store for tests and `serve --memory`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use noughts_engine::{Game, GameId, Player, PlayerId, StatDelta};
use tracing::{debug, instrument, warn};

use crate::{GameDirectory, GameRecord, PlayerDirectory, StoreError};

#[derive(Debug, Default)]
struct Tables {
    players: BTreeMap<PlayerId, Player>,
    games: BTreeMap<GameId, GameRecord>,
    next_player: i32,
    next_game: i32,
}

impl Tables {
    /// Applies every delta or none of them.
    fn apply_deltas(&mut self, deltas: &[StatDelta]) -> Result<(), StoreError> {
        if let Some(missing) = deltas
            .iter()
            .find(|d| !self.players.contains_key(d.player()))
        {
            warn!(player = %missing.player(), "Counter update for unknown player");
            return Err(StoreError::UnknownPlayer {
                id: *missing.player(),
            });
        }
        for delta in deltas {
            if let Some(player) = self.players.get_mut(delta.player()) {
                player.apply(delta);
            }
        }
        Ok(())
    }

    fn check_version(&self, record: &GameRecord) -> Result<(), StoreError> {
        match self.games.get(record.id()) {
            Some(current) if current.version() == record.version() => Ok(()),
            _ => Err(StoreError::StaleGame { id: *record.id() }),
        }
    }
}

/// Store keeping everything behind one mutex.
///
/// Each call holds the lock for its whole read-check-write, which gives the
/// same atomicity as a SQLite transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Mutations follow all checks, so poisoned data is still consistent.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl PlayerDirectory for MemoryStore {
    #[instrument(skip(self))]
    fn create_player(&self, name: &str, email: Option<&str>) -> Result<Player, StoreError> {
        let mut tables = self.lock();
        if tables.players.values().any(|p| p.name() == name) {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            });
        }
        tables.next_player += 1;
        let id = PlayerId::new(tables.next_player);
        let player = Player::new(id, name, email.map(str::to_string));
        tables.players.insert(id, player.clone());
        debug!(%id, "Player created");
        Ok(player)
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.lock().players.get(&id).cloned())
    }

    fn player_by_name(&self, name: &str) -> Result<Option<Player>, StoreError> {
        Ok(self
            .lock()
            .players
            .values()
            .find(|p| p.name() == name)
            .cloned())
    }

    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.lock().players.values().cloned().collect())
    }
}

impl GameDirectory for MemoryStore {
    #[instrument(skip(self, game, deltas))]
    fn insert_game(&self, game: &Game, deltas: &[StatDelta]) -> Result<GameRecord, StoreError> {
        let mut tables = self.lock();
        tables.apply_deltas(deltas)?;
        tables.next_game += 1;
        let id = GameId::new(tables.next_game);
        let record = GameRecord::new(id, 0, game.clone());
        tables.games.insert(id, record.clone());
        debug!(%id, "Game stored");
        Ok(record)
    }

    fn game(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.lock().games.get(&id).cloned())
    }

    #[instrument(skip(self, record, deltas), fields(game_id = %record.id()))]
    fn commit_game(
        &self,
        record: &GameRecord,
        deltas: &[StatDelta],
    ) -> Result<GameRecord, StoreError> {
        let mut tables = self.lock();
        tables.check_version(record)?;
        tables.apply_deltas(deltas)?;
        let committed = GameRecord::new(*record.id(), record.version() + 1, record.game().clone());
        tables.games.insert(*record.id(), committed.clone());
        Ok(committed)
    }

    #[instrument(skip(self, record, deltas), fields(game_id = %record.id()))]
    fn delete_game(&self, record: &GameRecord, deltas: &[StatDelta]) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.check_version(record)?;
        tables.apply_deltas(deltas)?;
        tables.games.remove(record.id());
        Ok(())
    }

    fn active_games_for(&self, player: PlayerId) -> Result<Vec<GameRecord>, StoreError> {
        Ok(self
            .lock()
            .games
            .values()
            .filter(|r| !r.game().game_ended() && r.game().involves(player))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_rejected() {
        let store = MemoryStore::new();
        store.create_player("alice", None).unwrap();
        let err = store.create_player("alice", None).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));
    }

    #[test]
    fn test_stale_commit_rejected() {
        let store = MemoryStore::new();
        let a = store.create_player("a", None).unwrap();
        let b = store.create_player("b", None).unwrap();
        let (game, started) = Game::new(*a.id(), *b.id()).unwrap();
        let record = store.insert_game(&game, &started).unwrap();

        store.commit_game(&record, &[]).unwrap();
        let err = store.commit_game(&record, &[]).unwrap_err();
        assert!(matches!(err, StoreError::StaleGame { .. }));
    }

    #[test]
    fn test_unknown_player_leaves_counters_untouched() {
        let store = MemoryStore::new();
        let a = store.create_player("a", None).unwrap();
        let (game, _) = Game::new(*a.id(), PlayerId::new(99)).unwrap();
        let deltas = [
            StatDelta::started(*a.id()),
            StatDelta::started(PlayerId::new(99)),
        ];
        assert!(store.insert_game(&game, &deltas).is_err());
        let a = store.player(*a.id()).unwrap().unwrap();
        assert_eq!(*a.games_in_progress(), 0);
    }
}
