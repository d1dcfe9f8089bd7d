use staffdir_core::db::{open_db, open_db_in_memory, schema_version, DbError, SCHEMA_VERSION};
use staffdir_core::{KeyValueStore, SqliteKeyValueStore, StorageError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn reopening_file_database_keeps_stored_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffdir.db");

    {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        kv.set_item("employees", "[]").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert_eq!(kv.get_item("employees").unwrap().as_deref(), Some("[]"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unopenable_path_reports_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("staffdir.db");

    let err = open_db(&path).unwrap_err();

    assert!(matches!(err, DbError::Open { .. }));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn kv_store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, StorageError::Backend(_)));
}

#[test]
fn kv_store_upserts_and_removes() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();

    assert_eq!(kv.get_item("k").unwrap(), None);
    kv.set_item("k", "one").unwrap();
    kv.set_item("k", "two").unwrap();
    assert_eq!(kv.get_item("k").unwrap().as_deref(), Some("two"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    kv.remove_item("k").unwrap();
    kv.remove_item("k").unwrap();
    assert_eq!(kv.get_item("k").unwrap(), None);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
