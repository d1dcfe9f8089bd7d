//! Key-value persistence port and its implementations.
//!
//! # Responsibility
//! - Define the single-slot storage contract used by the employee store.
//! - Keep SQLite details out of store/list/form logic.
//! - Encode and decode the employee collection blob.
//!
//! # Invariants
//! - Port calls are synchronous; a returned `Ok` means the write is durable
//!   for the backing implementation.
//! - Undecodable payloads are reported as absent, never as hard errors.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_persistence;
pub mod memory_kv;
pub mod sqlite_kv;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the storage backend itself (not of payload decoding).
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode(serde_json::Error),
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode payload: {err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string key-value slot storage.
pub trait KeyValueStore {
    /// Returns the stored value for `key`, or `None` when the slot is empty.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the value stored for `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Clears the slot. Clearing an empty slot is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}
