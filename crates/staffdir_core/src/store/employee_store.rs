//! Employee store: in-memory source of truth with persistence side effects.
//!
//! # Invariants
//! - A mutation either persists, commits and notifies, or does none of these.
//! - Subscribers receive snapshots in commit order.
//! - Update/delete of an unknown id is a silent no-op (`Ok(false)`).

use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError, NewEmployee};
use crate::reactive::{ObserverRegistry, Subscription};
use crate::storage::employee_persistence::EmployeePersistence;
use crate::storage::{KeyValueStore, StorageError};
use crate::store::sample::sample_employees;
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Immutable view of the collection at one point in time.
pub type EmployeeSnapshot = Rc<[Employee]>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Mutation failure. The collection is unchanged when one is returned.
#[derive(Debug)]
pub enum StoreError {
    Validation(EmployeeValidationError),
    Storage(StorageError),
    IdSpaceExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "failed to persist employees: {err}"),
            Self::IdSpaceExhausted => write!(f, "no employee id left to assign"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::IdSpaceExhausted => None,
        }
    }
}

impl From<EmployeeValidationError> for StoreError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Observable employee collection backed by a key-value slot.
pub struct EmployeeStore<S: KeyValueStore> {
    persistence: EmployeePersistence<S>,
    current: RefCell<EmployeeSnapshot>,
    observers: ObserverRegistry<EmployeeSnapshot>,
}

impl<S: KeyValueStore> EmployeeStore<S> {
    /// Loads the persisted collection and optionally seeds demo data.
    ///
    /// Missing or corrupt storage starts an empty collection. When the
    /// collection is empty and `seed_sample_data` is set, the four sample
    /// employees are installed and persisted right away.
    pub fn initialize(storage: S, seed_sample_data: bool) -> Self {
        let persistence = EmployeePersistence::new(storage);
        let loaded = persistence.load().unwrap_or_default();
        let mut source = if loaded.is_empty() { "empty" } else { "storage" };
        let mut employees = loaded;

        if employees.is_empty() && seed_sample_data {
            let samples = sample_employees();
            if let Err(err) = persistence.save(&samples) {
                warn!(
                    "event=store_seed module=store status=error error_code=seed_persist_failed error={err}"
                );
            }
            employees = samples;
            source = "sample";
        }

        info!(
            "event=store_init module=store status=ok source={source} count={}",
            employees.len()
        );

        Self {
            persistence,
            current: RefCell::new(employees.into()),
            observers: ObserverRegistry::new(),
        }
    }

    /// Registers `observer`, calling it with the current snapshot and again
    /// after every committed mutation.
    ///
    /// Outside a notification the first call happens before this returns.
    /// From inside another observer it is queued behind pending commits.
    pub fn subscribe(&self, observer: impl FnMut(&EmployeeSnapshot) + 'static) -> Subscription {
        self.observers.subscribe_with(self.snapshot(), observer)
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> EmployeeSnapshot {
        Rc::clone(&self.current.borrow())
    }

    pub fn len(&self) -> usize {
        self.current.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.borrow().is_empty()
    }

    /// Looks up one employee in the current snapshot.
    pub fn get_by_id(&self, id: EmployeeId) -> Option<Employee> {
        self.current
            .borrow()
            .iter()
            .find(|employee| employee.id == id)
            .cloned()
    }

    /// Appends a new employee with the next id and returns the stored record.
    pub fn add(&self, employee: NewEmployee) -> StoreResult<Employee> {
        employee.validate()?;

        let current = self.snapshot();
        let id = next_id(&current).ok_or(StoreError::IdSpaceExhausted)?;
        let created = employee.with_id(id);

        let mut next = current.to_vec();
        next.push(created.clone());
        self.commit(next, "add")?;

        debug!("event=store_add module=store status=ok id={id}");
        Ok(created)
    }

    /// Replaces the employee with the same id.
    ///
    /// Returns `Ok(false)` without writing or notifying when the id is unknown.
    pub fn update(&self, employee: Employee) -> StoreResult<bool> {
        let current = self.snapshot();
        let Some(index) = current.iter().position(|e| e.id == employee.id) else {
            debug!(
                "event=store_update module=store status=skipped reason=not_found id={}",
                employee.id
            );
            return Ok(false);
        };
        employee.validate()?;

        let id = employee.id;
        let mut next = current.to_vec();
        next[index] = employee;
        self.commit(next, "update")?;

        debug!("event=store_update module=store status=ok id={id}");
        Ok(true)
    }

    /// Removes the employee with `id`.
    ///
    /// Returns `Ok(false)` without writing or notifying when the id is unknown.
    pub fn delete(&self, id: EmployeeId) -> StoreResult<bool> {
        let current = self.snapshot();
        if !current.iter().any(|employee| employee.id == id) {
            debug!("event=store_delete module=store status=skipped reason=not_found id={id}");
            return Ok(false);
        }

        let next: Vec<Employee> = current
            .iter()
            .filter(|employee| employee.id != id)
            .cloned()
            .collect();
        self.commit(next, "delete")?;

        debug!("event=store_delete module=store status=ok id={id}");
        Ok(true)
    }

    /// Returns the persistence adapter, e.g. to inspect the backing slot.
    pub fn persistence(&self) -> &EmployeePersistence<S> {
        &self.persistence
    }

    fn commit(&self, next: Vec<Employee>, operation: &'static str) -> StoreResult<()> {
        if let Err(err) = self.persistence.save(&next) {
            error!(
                "event=store_commit module=store status=error operation={operation} error_code=persist_failed error={err}"
            );
            return Err(err.into());
        }

        let snapshot: EmployeeSnapshot = next.into();
        *self.current.borrow_mut() = Rc::clone(&snapshot);
        self.observers.emit(snapshot);
        Ok(())
    }
}

fn next_id(employees: &[Employee]) -> Option<EmployeeId> {
    employees
        .iter()
        .map(|employee| employee.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}
