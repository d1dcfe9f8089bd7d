//! Editable employee document with nested skill rows.
//!
//! # Responsibility
//! - Hold one create/edit document plus per-field touched state.
//! - Validate it into a structured, per-field error report.
//! - Submit valid documents into the employee store.
//!
//! # Invariants
//! - The document always holds at least one skill row.
//! - Error messages surface only for touched fields.
//! - An invalid submit never mutates the store.

pub mod controller;
pub mod document;
pub mod validation;

pub use controller::{FormController, FormEvent, SubmitOutcome};
pub use document::{EmployeeDocument, FormField, FormMode, SkillField, SkillRow};
pub use validation::{validate_document, FieldError, SkillRowErrors, ValidationReport};
