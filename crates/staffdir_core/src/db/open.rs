//! Opening directory databases.

use super::schema::migrate;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the database file at `path` and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let conn = Connection::open(path).map_err(|source| DbError::Open {
        target: path.display().to_string(),
        source,
    });
    prepare(conn, "file")
}

/// Opens a private in-memory database, migrated and ready for storage.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
        target: ":memory:".to_string(),
        source,
    });
    prepare(conn, "memory")
}

fn prepare(conn: DbResult<Connection>, mode: &'static str) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = conn.and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let upgrade = migrate(&mut conn)?;
        Ok((conn, upgrade))
    });

    match result {
        Ok((conn, upgrade)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} schema_from={} schema_to={} duration_ms={}",
                upgrade.from,
                upgrade.to,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!("event=db_open module=db status=error mode={mode} error={err}");
            Err(err)
        }
    }
}
