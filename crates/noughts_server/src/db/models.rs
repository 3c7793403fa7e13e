//! Row types for the `users` and `games` tables.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use noughts_engine::{Game, GameId, Player, PlayerId};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored player profile and counters.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct UserRow {
    id: i32,
    name: String,
    email: Option<String>,
    games_in_progress: i32,
    games_completed: i32,
    games_won: i32,
    games_drawn: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<UserRow> for Player {
    fn from(row: UserRow) -> Self {
        Player::from_parts(
            PlayerId::new(row.id),
            row.name,
            row.email,
            row.games_in_progress,
            row.games_completed,
            row.games_won,
            row.games_drawn,
        )
    }
}

/// Insertable user; counters start at their column defaults.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    name: String,
    email: Option<String>,
}

/// Stored game snapshot.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: i32,
    player_x_id: i32,
    player_o_id: i32,
    game_ended: bool,
    version: i32,
    state: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Decodes the JSON snapshot.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn decode(&self) -> Result<Game, DbError> {
        Ok(serde_json::from_str(&self.state)?)
    }

    /// Typed identifier.
    pub fn game_id(&self) -> GameId {
        GameId::new(self.id)
    }
}

/// Insertable game snapshot.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    player_x_id: i32,
    player_o_id: i32,
    game_ended: bool,
    state: String,
}

impl NewGame {
    /// Encodes a fresh engine game for insertion.
    #[instrument(skip(game))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        Ok(Self::new(
            game.player_x().get(),
            game.player_o().get(),
            game.game_ended(),
            serde_json::to_string(game)?,
        ))
    }
}
