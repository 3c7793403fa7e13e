//! Diesel-backed implementation of both directories.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use noughts_engine::{Game, GameId, Player, PlayerId, StatDelta};
use tracing::{debug, error, info, instrument, warn};

use crate::db::{DbError, DbErrorKind, GameRow, NewGame, NewUser, UserRow, schema};
use crate::{GameDirectory, GameRecord, PlayerDirectory, StoreError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on another writer's lock before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite store opening one connection per call.
///
/// `":memory:"` is not useful here since each connection would see its own
/// empty database; use [`MemoryStore`](crate::MemoryStore) instead.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
    busy_timeout: Duration,
}

impl SqliteStore {
    /// Creates a store for the database file at `db_path`.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        Self::with_busy_timeout(db_path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Creates a store whose connections wait up to `busy_timeout` for a
    /// concurrent writer to release the database.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn with_busy_timeout(db_path: String, busy_timeout: Duration) -> Self {
        info!(path = %db_path, ?busy_timeout, "Creating SqliteStore");
        Self {
            db_path,
            busy_timeout,
        }
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to configure '{}': {}", self.db_path, e),
            )
        })?;
        Ok(conn)
    }

    /// Applies pending embedded migrations, returning how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }
}

// ─────────────────────────────────────────────────────────────
//  Row helpers
// ─────────────────────────────────────────────────────────────

#[instrument(skip(conn, deltas), fields(count = deltas.len()))]
fn apply_deltas(conn: &mut SqliteConnection, deltas: &[StatDelta]) -> Result<(), StoreError> {
    use schema::users::dsl;

    for delta in deltas {
        let updated = diesel::update(dsl::users.find(delta.player().get()))
            .set((
                dsl::games_in_progress.eq(dsl::games_in_progress + *delta.in_progress_delta()),
                dsl::games_completed.eq(dsl::games_completed + *delta.completed_delta()),
                dsl::games_won.eq(dsl::games_won + *delta.won_delta()),
                dsl::games_drawn.eq(dsl::games_drawn + *delta.drawn_delta()),
                dsl::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)?;
        if updated == 0 {
            warn!(player = %delta.player(), "Counter update for unknown player");
            return Err(StoreError::UnknownPlayer {
                id: *delta.player(),
            });
        }
    }
    Ok(())
}

/// Error carried through `immediate_transaction`.
///
/// Diesel converts its own `BEGIN`/`COMMIT` failures with `From`, so those
/// arrive as `Diesel` and are located at the store call site by
/// [`immediate`].
enum TxError {
    Diesel(DieselError),
    Store(StoreError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

/// Runs `body` inside `BEGIN IMMEDIATE`, rolling back on any error.
#[track_caller]
fn immediate<T>(
    conn: &mut SqliteConnection,
    body: impl FnOnce(&mut SqliteConnection) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    match conn.immediate_transaction(|conn| body(conn).map_err(TxError::Store)) {
        Ok(value) => Ok(value),
        Err(TxError::Store(err)) => Err(err),
        Err(TxError::Diesel(err)) => Err(StoreError::Database(DbError::new(
            DbErrorKind::Query,
            format!("Transaction failed: {err}"),
        ))),
    }
}

#[instrument(skip(row), fields(game_id = row.id()))]
fn record_from_row(row: GameRow) -> Result<GameRecord, StoreError> {
    let id = row.game_id();
    let game = row.decode().map_err(|e| StoreError::Corrupt {
        id,
        reason: e.message,
    })?;
    if let Err(violations) = game.check_invariants() {
        let reason = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        error!(%id, %reason, "Stored game failed integrity checks");
        return Err(StoreError::Corrupt { id, reason });
    }
    Ok(GameRecord::new(id, *row.version(), game))
}

fn encode(game: &Game) -> Result<String, StoreError> {
    serde_json::to_string(game).map_err(|e| StoreError::Database(DbError::from(e)))
}

// ─────────────────────────────────────────────────────────────
//  Directories
// ─────────────────────────────────────────────────────────────

impl PlayerDirectory for SqliteStore {
    #[instrument(skip(self))]
    fn create_player(&self, name: &str, email: Option<&str>) -> Result<Player, StoreError> {
        debug!(name, "Creating player");
        let mut conn = self.connection()?;

        let new_user = NewUser::new(name.to_string(), email.map(str::to_string));
        let inserted = diesel::insert_into(schema::users::table)
            .values(&new_user)
            .returning(UserRow::as_returning())
            .get_result(&mut conn);

        match inserted {
            Ok(row) => {
                info!(player_id = row.id(), name = %row.name(), "Player created");
                Ok(row.into())
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                warn!(name, "Player name already taken");
                Err(StoreError::DuplicateName {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let mut conn = self.connection()?;
        let row = schema::users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Player::from))
    }

    #[instrument(skip(self))]
    fn player_by_name(&self, name: &str) -> Result<Option<Player>, StoreError> {
        let mut conn = self.connection()?;
        let row = schema::users::table
            .filter(schema::users::name.eq(name))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = row.is_some(), "Player lookup by name");
        Ok(row.map(Player::from))
    }

    #[instrument(skip(self))]
    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let mut conn = self.connection()?;
        let rows = schema::users::table
            .order(schema::users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)?;
        info!(count = rows.len(), "Players loaded");
        Ok(rows.into_iter().map(Player::from).collect())
    }
}

impl GameDirectory for SqliteStore {
    #[instrument(skip(self, game, deltas))]
    fn insert_game(&self, game: &Game, deltas: &[StatDelta]) -> Result<GameRecord, StoreError> {
        let new_game = NewGame::from_game(game)?;
        let mut conn = self.connection()?;

        let row = immediate(&mut conn, |conn| {
            let row = diesel::insert_into(schema::games::table)
                .values(&new_game)
                .returning(GameRow::as_returning())
                .get_result(conn)?;
            apply_deltas(conn, deltas)?;
            Ok(row)
        })?;

        info!(game_id = row.id(), "Game stored");
        Ok(GameRecord::new(row.game_id(), *row.version(), game.clone()))
    }

    #[instrument(skip(self))]
    fn game(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        let mut conn = self.connection()?;
        let row = schema::games::table
            .find(id.get())
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(record_from_row).transpose()
    }

    #[instrument(
        skip(self, record, deltas),
        fields(game_id = %record.id(), version = record.version())
    )]
    fn commit_game(
        &self,
        record: &GameRecord,
        deltas: &[StatDelta],
    ) -> Result<GameRecord, StoreError> {
        use schema::games::dsl;

        let state = encode(record.game())?;
        let mut conn = self.connection()?;

        immediate(&mut conn, |conn| {
            let updated = diesel::update(
                dsl::games
                    .filter(dsl::id.eq(record.id().get()))
                    .filter(dsl::version.eq(*record.version())),
            )
            .set((
                dsl::state.eq(&state),
                dsl::game_ended.eq(record.game().game_ended()),
                dsl::version.eq(dsl::version + 1),
                dsl::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)?;
            if updated == 0 {
                warn!("Game changed since it was read");
                return Err(StoreError::StaleGame { id: *record.id() });
            }
            apply_deltas(conn, deltas)
        })?;

        debug!("Game committed");
        Ok(GameRecord::new(
            *record.id(),
            record.version() + 1,
            record.game().clone(),
        ))
    }

    #[instrument(skip(self, record, deltas), fields(game_id = %record.id()))]
    fn delete_game(&self, record: &GameRecord, deltas: &[StatDelta]) -> Result<(), StoreError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        immediate(&mut conn, |conn| {
            let deleted = diesel::delete(
                dsl::games
                    .filter(dsl::id.eq(record.id().get()))
                    .filter(dsl::version.eq(*record.version())),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(StoreError::StaleGame { id: *record.id() });
            }
            apply_deltas(conn, deltas)
        })?;

        info!("Game deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn active_games_for(&self, player: PlayerId) -> Result<Vec<GameRecord>, StoreError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        let rows = dsl::games
            .filter(dsl::game_ended.eq(false))
            .filter(
                dsl::player_x_id
                    .eq(player.get())
                    .or(dsl::player_o_id.eq(player.get())),
            )
            .order(dsl::id.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        debug!(count = rows.len(), "Active games loaded");
        rows.into_iter().map(record_from_row).collect()
    }
}
