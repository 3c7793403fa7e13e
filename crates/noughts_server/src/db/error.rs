//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What part of the storage stack failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// Opening the SQLite file failed.
    #[display("connection")]
    Connection,
    /// A query or transaction failed.
    #[display("query")]
    Query,
    /// Applying embedded migrations failed.
    #[display("migration")]
    Migration,
    /// A game snapshot could not be encoded or decoded.
    #[display("snapshot")]
    Snapshot,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(DbErrorKind::Snapshot, err.to_string())
    }
}
