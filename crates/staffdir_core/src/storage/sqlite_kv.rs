//! SQLite-backed key-value store.
//!
//! # Invariants
//! - One row per key in `kv_store`; writes are upserts.
//! - The connection must come from `open_db`/`open_db_in_memory`.

use super::{KeyValueStore, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// `KeyValueStore` over the `kv_store` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `StorageError::Backend` when `kv_store` does not exist.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StorageError::Backend(
                "kv_store table missing; open the connection through open_db".to_string(),
            ));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}
