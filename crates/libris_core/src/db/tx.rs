//! Scoped transaction handle over the catalog connection.
//!
//! # Invariants
//! - Work passed to [`Database::with_transaction`] either commits as a unit
//!   or leaves no trace.
//! - Transactions are `IMMEDIATE`: the write lock is held from the first
//!   read, so read-then-write sequences see no interleaved writers.

use super::migrations::schema_version;
use super::{DbError, DbResult};
use log::{debug, warn};
use rusqlite::types::FromSql;
use rusqlite::{Connection, Params, Transaction, TransactionBehavior};

/// Owned, migrated catalog connection.
///
/// Obtain one through [`super::open_db`] or [`super::open_db_in_memory`].
pub struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Schema version recorded in the open file.
    pub fn schema_version(&self) -> DbResult<u32> {
        schema_version(&self.conn)
    }

    /// Runs a read-only statement and returns the first column of its
    /// single row.
    ///
    /// # Errors
    /// - `NotReadOnly` when `sql` would write; nothing is executed.
    pub fn query_scalar<T, P>(&self, sql: &str, params: P) -> DbResult<T>
    where
        T: FromSql,
        P: Params,
    {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(DbError::NotReadOnly(sql.trim().to_string()));
        }
        Ok(stmt.query_row(params, |row| row.get(0))?)
    }

    /// Runs `work` inside one transaction.
    ///
    /// Commits when `work` returns `Ok`. On `Err` the transaction is rolled
    /// back and the error from `work` is returned unchanged; a failing rollback
    /// is logged but never masks that error.
    pub fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                match tx.rollback() {
                    Ok(()) => debug!("event=tx_rollback module=db status=ok"),
                    Err(rollback_err) => warn!(
                        "event=tx_rollback module=db status=error error={}",
                        rollback_err
                    ),
                }
                Err(err)
            }
        }
    }
}
