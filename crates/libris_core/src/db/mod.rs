//! SQLite storage bootstrap, schema migrations and transaction scoping.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the catalog.
//! - Apply schema migrations in deterministic order.
//! - Run use-case work inside one commit-or-rollback transaction scope.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Every returned connection has `foreign_keys=ON`.
//! - Core code must not read/write catalog data before migrations succeed.
//! - Catalog writes happen only inside [`Database::with_transaction`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod tx;

pub use open::{open_db, open_db_in_memory};
pub use tx::Database;

/// Result of a storage-layer call.
pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, migrate or query the catalog file.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build of the catalog.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A schema step failed; nothing from the pending steps was kept.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// A statement given to [`Database::query_scalar`] would modify data.
    NotReadOnly(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than this build supports ({latest_supported})"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema step {version} ({name}) failed: {source}"),
            Self::NotReadOnly(sql) => write!(f, "refusing to run writing statement `{sql}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::NotReadOnly(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
