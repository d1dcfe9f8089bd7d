//! Employee collection persistence over a key-value slot.
//!
//! # Responsibility
//! - Serialize the full collection as JSON under one key.
//! - Load it back, tolerating absent, corrupt or unreadable slots.
//!
//! # Invariants
//! - `load` never returns an error; anything unusable reads as `None`.
//! - `decode(encode(x)) == x` for every collection, dates at day granularity.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::model::employee::Employee;
use log::{debug, error, warn};

/// Storage key holding the whole employee collection.
pub const EMPLOYEES_KEY: &str = "employees";

/// Reads and writes the employee collection through a `KeyValueStore`.
pub struct EmployeePersistence<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> EmployeePersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads the persisted collection.
    ///
    /// Returns `None` for an empty slot, a backend read failure, or a payload
    /// that does not decode. Failures are logged, not propagated.
    pub fn load(&self) -> Option<Vec<Employee>> {
        let raw = match self.storage.get_item(EMPLOYEES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=storage_load module=storage status=skipped reason=absent");
                return None;
            }
            Err(err) => {
                error!(
                    "event=storage_load module=storage status=error error_code=read_failed error={err}"
                );
                return None;
            }
        };

        match decode_employees(&raw) {
            Ok(employees) => {
                debug!(
                    "event=storage_load module=storage status=ok count={}",
                    employees.len()
                );
                Some(employees)
            }
            Err(err) => {
                warn!(
                    "event=storage_load module=storage status=error error_code=corrupt_payload bytes={} error={err}",
                    raw.len()
                );
                None
            }
        }
    }

    /// Replaces the persisted collection.
    pub fn save(&self, employees: &[Employee]) -> StorageResult<()> {
        let payload = encode_employees(employees)?;
        self.storage.set_item(EMPLOYEES_KEY, &payload)?;
        debug!(
            "event=storage_save module=storage status=ok count={}",
            employees.len()
        );
        Ok(())
    }

    /// Returns the underlying storage port.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Encodes a collection into the persisted JSON form.
pub fn encode_employees(employees: &[Employee]) -> StorageResult<String> {
    serde_json::to_string(employees).map_err(StorageError::Encode)
}

/// Decodes the persisted JSON form.
pub fn decode_employees(raw: &str) -> Result<Vec<Employee>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::{decode_employees, EmployeePersistence, EMPLOYEES_KEY};
    use crate::storage::memory_kv::MemoryKeyValueStore;

    #[test]
    fn corrupt_payload_reads_as_absent() {
        let storage = MemoryKeyValueStore::with_item(EMPLOYEES_KEY, "{not json");
        let persistence = EmployeePersistence::new(&storage);
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn wrong_shape_reads_as_absent() {
        let storage = MemoryKeyValueStore::with_item(EMPLOYEES_KEY, r#"{"id": 1}"#);
        let persistence = EmployeePersistence::new(&storage);
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn decodes_browser_era_timestamps() {
        let raw = r#"[{
            "id": 7,
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "position": "QA",
            "startDate": "2021-06-20T00:00:00.000Z",
            "skills": [{"skill": "CSS", "yearExperience": 5}]
        }]"#;
        let employees = decode_employees(raw).unwrap();
        assert_eq!(employees[0].id, 7);
        assert_eq!(employees[0].start_date.to_string(), "2021-06-20");
    }
}
