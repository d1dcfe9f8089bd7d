//! Employee directory domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by store, list and form logic.
//! - Keep the persisted JSON shape in one place.
//!
//! # Invariants
//! - Every stored employee is identified by a store-assigned `EmployeeId`.
//! - Every stored employee has at least one skill.

pub mod employee;
