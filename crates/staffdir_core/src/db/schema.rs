//! Ordered schema steps for the directory database.

use crate::db::{DbError, DbResult};
use rusqlite::{Connection, TransactionBehavior};

/// Step `n` moves a database from version `n` to `n + 1`.
const STEPS: [&str; 1] = [include_str!("sql/0001_kv_store.sql")];

/// Schema version produced by [`migrate`].
pub const SCHEMA_VERSION: u32 = STEPS.len() as u32;

/// Versions before and after a [`migrate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: u32,
    pub to: u32,
}

impl SchemaUpgrade {
    pub fn changed(self) -> bool {
        self.from != self.to
    }
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`SCHEMA_VERSION`] inside one immediate transaction.
///
/// # Errors
/// - `SchemaTooNew` when the file was written by a newer build.
/// - `Sqlite` when a step fails; nothing is applied in that case.
pub fn migrate(conn: &mut Connection) -> DbResult<SchemaUpgrade> {
    let from = schema_version(conn)?;
    if from > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found: from,
            supported: SCHEMA_VERSION,
        });
    }

    let upgrade = SchemaUpgrade {
        from,
        to: SCHEMA_VERSION,
    };
    if !upgrade.changed() {
        return Ok(upgrade);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    for step in &STEPS[from as usize..] {
        tx.execute_batch(step)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(upgrade)
}
