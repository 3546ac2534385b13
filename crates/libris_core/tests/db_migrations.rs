use libris_core::db::migrations::latest_version;
use libris_core::{open_db, open_db_in_memory, CatalogService, DbError, NewMember};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let db = open_db_in_memory().unwrap();

    assert_eq!(db.schema_version().unwrap(), latest_version());
    for table in ["Book", "Member", "Loan"] {
        let exists: i64 = db
            .query_scalar(
                "SELECT EXISTS(
                    SELECT 1
                    FROM sqlite_master
                    WHERE type = 'table' AND name = ?1
                );",
                [table],
            )
            .unwrap();
        assert_eq!(exists, 1, "table {table} does not exist");
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let mut first = open_db(&path).unwrap();
    CatalogService::new(&mut first)
        .add_member(&NewMember::new("Alice"))
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(second.schema_version().unwrap(), latest_version());
    let members: i64 = second
        .query_scalar("SELECT COUNT(*) FROM Member;", [])
        .unwrap();
    assert_eq!(members, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).err().unwrap();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn catalog_handle_refuses_direct_writes() {
    let db = open_db_in_memory().unwrap();

    let err = db
        .query_scalar::<i64, _>(
            "UPDATE Book SET copies_available = copies_total + 1;",
            [],
        )
        .unwrap_err();

    assert!(matches!(err, DbError::NotReadOnly(_)));
}
