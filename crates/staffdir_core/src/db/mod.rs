//! SQLite file that backs the key-value storage.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the number of schema steps applied.
//! - Connections handed out by this module are fully migrated.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{migrate, schema_version, SchemaUpgrade, SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database could not be opened at all.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    /// Written by a newer build; refusing to touch it.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open database {target}: {source}"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "directory database uses schema {found}; this build understands up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sqlite(source) => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
