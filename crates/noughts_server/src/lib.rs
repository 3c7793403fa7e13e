//! Noughts game server.
//!
//! Players register by name, start games against each other, and take
//! turns over a JSON HTTP API. Games are persisted as engine snapshots in
//! SQLite next to the players' counters; every move commits the snapshot and
//! the counter changes in one transaction, guarded by an optimistic version
//! check. After each committed move the opponent is notified.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod directory;
mod error;
mod leaderboard;
mod memory;
mod notify;
mod service;
mod views;

pub mod api;
pub mod cli;

pub use config::{ConfigError, DB_PATH_ENV, ServerConfig};
pub use db::{DbError, DbErrorKind, GameRow, NewGame, NewUser, SqliteStore, UserRow};
pub use directory::{GameDirectory, GameRecord, PlayerDirectory, Store};
pub use error::{ServiceError, StoreError};
pub use leaderboard::{Ranking, rank_players};
pub use memory::MemoryStore;
pub use notify::{
    LogMailer, LogNotifier, MailError, Mailer, Notification, NotificationKind, NotificationSink,
    QueueNotifier, SUBJECT, deliver,
};
pub use service::GameService;
pub use views::{
    ActiveGameView, CreateUserRequest, GameView, HistoryView, MessageView, MoveRequest,
    NewGameRequest, PlayerView,
};
