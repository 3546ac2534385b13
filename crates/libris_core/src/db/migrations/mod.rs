//! Embedded schema versions and the runner that applies them.
//!
//! # Invariants
//! - Steps are listed in strictly increasing `version` order.
//! - All pending steps commit together or not at all.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "catalog_init",
    sql: include_str!("0001_init.sql"),
}];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the schema up to [`latest_version`]. Returns the number of steps
/// applied.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` when a step's SQL fails; the file keeps its old version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let current = schema_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > current)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    for step in &pending {
        info!(
            "event=schema_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    Ok(pending.len())
}

pub(crate) fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, schema_version, SCHEMA_STEPS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn steps_are_strictly_increasing() {
        assert!(SCHEMA_STEPS
            .windows(2)
            .all(|pair| pair[0].version < pair[1].version));
        assert!(latest_version() >= 1);
    }

    #[test]
    fn second_run_applies_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(apply_migrations(&mut conn).unwrap(), SCHEMA_STEPS.len());
        assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
    }

    #[test]
    fn fresh_schema_enforces_copy_bounds() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), latest_version());

        let above_total = conn.execute(
            "INSERT INTO Book (title, author, copies_available, copies_total)
             VALUES ('Dune', 'Frank Herbert', 2, 1);",
            [],
        );
        let negative = conn.execute(
            "INSERT INTO Book (title, author, copies_available, copies_total)
             VALUES ('Dune', 'Frank Herbert', -1, 1);",
            [],
        );

        assert!(above_total.is_err());
        assert!(negative.is_err());
    }

    #[test]
    fn failing_step_is_named_and_leaves_version_untouched() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE Loan (legacy TEXT);").unwrap();

        let err = apply_migrations(&mut conn).unwrap_err();

        assert!(matches!(
            err,
            DbError::Migration {
                version: 1,
                name: "catalog_init",
                ..
            }
        ));
        assert!(err.to_string().starts_with("schema step 1 (catalog_init) failed"));
        assert_eq!(schema_version(&conn).unwrap(), 0);
    }
}
