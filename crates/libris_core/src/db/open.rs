//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory catalog databases.
//! - Configure connection pragmas required by loan bookkeeping.
//! - Trigger schema migrations before handing out a usable [`Database`].
//!
//! # Invariants
//! - Returned databases have `foreign_keys=ON`.
//! - Returned databases have migrations fully applied.

use super::migrations::apply_migrations;
use super::{Database, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the catalog database file at `path`.
///
/// The path is the single configuration value of the storage layer; callers
/// resolve it and pass it in explicitly.
///
/// # Side effects
/// - Creates the file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Database> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory catalog database.
///
/// Mostly useful for tests; contents vanish when the handle is dropped.
pub fn open_db_in_memory() -> DbResult<Database> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Database> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(Database::new(conn))
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
