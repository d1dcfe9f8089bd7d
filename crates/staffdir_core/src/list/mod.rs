//! Derived employee list: search, sort and the reactive view model.
//!
//! # Responsibility
//! - Filter by normalized search text and order by the active sort key.
//! - Recompute the displayed list whenever employees, the debounced search
//!   term or the sort key change.
//!
//! # Invariants
//! - The store's collection is never mutated; every output is a new sequence.
//! - Descending order is the exact mirror of ascending order.

pub mod filter;
pub mod sort;
pub mod view_model;

pub use filter::{filter_employees, matches_search, normalize_search};
pub use sort::{sort_employees, SortDirection, SortField, SortKey};
pub use view_model::{ListBinding, ListViewModel, DEFAULT_SEARCH_DEBOUNCE};
