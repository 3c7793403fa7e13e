//! SQLite persistence for players and game snapshots.

mod error;
mod models;
mod schema;
mod store;

pub use error::{DbError, DbErrorKind};
pub use models::{GameRow, NewGame, NewUser, UserRow};
pub use store::SqliteStore;
