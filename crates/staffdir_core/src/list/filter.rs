//! Case-insensitive substring search over name and email.

use crate::model::employee::Employee;

/// Lowercases and trims raw search input.
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns whether `employee` matches an already normalized search term.
///
/// The empty term matches everything.
pub fn matches_search(employee: &Employee, normalized: &str) -> bool {
    normalized.is_empty()
        || employee.full_name.to_lowercase().contains(normalized)
        || employee.email.to_lowercase().contains(normalized)
}

/// Keeps matching employees in their original order.
pub fn filter_employees(employees: &[Employee], normalized: &str) -> Vec<Employee> {
    employees
        .iter()
        .filter(|employee| matches_search(employee, normalized))
        .cloned()
        .collect()
}
