//! Core logic for the staff directory.
//! This crate is the single source of truth for employee data invariants.

pub mod config;
pub mod db;
pub mod form;
pub mod list;
pub mod logging;
pub mod model;
pub mod reactive;
pub mod storage;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use form::{
    EmployeeDocument, FieldError, FormController, FormEvent, FormField, FormMode, SkillField,
    SkillRow, SubmitOutcome, ValidationReport,
};
pub use list::{ListBinding, ListViewModel, SortDirection, SortField, SortKey};
pub use logging::{
    default_log_level, init_logging, logging_status, LoggingError, LoggingStatus,
};
pub use model::employee::{
    Employee, EmployeeId, EmployeeValidationError, NewEmployee, Position, Skill,
    AVAILABLE_SKILLS, POSITIONS,
};
pub use reactive::Subscription;
pub use storage::employee_persistence::{EmployeePersistence, EMPLOYEES_KEY};
pub use storage::memory_kv::MemoryKeyValueStore;
pub use storage::sqlite_kv::SqliteKeyValueStore;
pub use storage::{KeyValueStore, StorageError, StorageResult};
pub use store::{EmployeeSnapshot, EmployeeStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
