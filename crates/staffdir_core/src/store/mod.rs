//! Authoritative, observable employee collection.
//!
//! # Responsibility
//! - Own the in-memory collection and push snapshots to subscribers.
//! - Mirror every mutation to the persistence port before it returns.
//!
//! # Invariants
//! - The collection is replaced wholesale on mutation (copy-on-write);
//!   previously handed-out snapshots never change.
//! - Ids are unique and assigned as `max(existing, 0) + 1`.

pub mod employee_store;
pub mod sample;

pub use employee_store::{EmployeeSnapshot, EmployeeStore, StoreError, StoreResult};
