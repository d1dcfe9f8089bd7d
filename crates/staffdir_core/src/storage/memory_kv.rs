//! In-process key-value store.
//!
//! Used by tests and demos where a SQLite file is not wanted.

use super::{KeyValueStore, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Map-backed `KeyValueStore` with optional write-failure injection.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot already filled.
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Makes every following `set_item`/`remove_item` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes (set or remove) so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Backend("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.slots.borrow_mut().remove(key);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStore;
    use crate::storage::KeyValueStore;

    #[test]
    fn set_get_remove_cycle() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);

        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));

        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
        assert_eq!(store.write_count(), 3);
    }

    #[test]
    fn injected_failure_blocks_writes_only() {
        let store = MemoryKeyValueStore::with_item("k", "v");
        store.set_fail_writes(true);

        assert!(store.set_item("k", "other").is_err());
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.write_count(), 0);
    }
}
