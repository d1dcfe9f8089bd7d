//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record and its skill entries.
//! - Own the persisted wire shape (camelCase JSON, calendar dates).
//! - Provide invariant checks used before every store write.
//!
//! # Invariants
//! - `id` is positive and assigned by the store, never by callers.
//! - `full_name` has at least 3 characters after trimming.
//! - `email` matches the standard email grammar.
//! - `skills` is never empty.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned employee identifier.
pub type EmployeeId = u32;

/// Minimum number of characters in a full name.
pub const FULL_NAME_MIN_CHARS: usize = 3;

const EMAIL_MAX_CHARS: usize = 254;
const EMAIL_LOCAL_MAX_CHARS: usize = 64;

// Local part of dot-atoms, then dot-separated host labels of at most 63 chars.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Skill names offered by the editor. Not enforced on stored records.
pub const AVAILABLE_SKILLS: [&str; 5] = ["Angular", "RxJS", "TypeScript", "CSS", "HTML"];

/// Job position of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Developer,
    Designer,
    #[serde(rename = "QA")]
    Qa,
    Manager,
}

/// All positions in display order.
pub const POSITIONS: [Position; 4] = [
    Position::Developer,
    Position::Designer,
    Position::Qa,
    Position::Manager,
];

impl Position {
    /// Stable label shared by storage and UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Developer => "Developer",
            Self::Designer => "Designer",
            Self::Qa => "QA",
            Self::Manager => "Manager",
        }
    }

    /// Parses a label case-insensitively, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        POSITIONS
            .into_iter()
            .find(|position| position.label().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One skill entry with years of experience.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub skill: String,
    pub year_experience: u32,
}

impl Skill {
    pub fn new(skill: impl Into<String>, year_experience: u32) -> Self {
        Self {
            skill: skill.into(),
            year_experience,
        }
    }
}

/// Employee fields before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub position: Position,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    pub skills: Vec<Skill>,
}

impl NewEmployee {
    /// Attaches a store-assigned id.
    pub fn with_id(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            full_name: self.full_name,
            email: self.email,
            position: self.position,
            start_date: self.start_date,
            skills: self.skills,
        }
    }

    /// Validates every field invariant except `id`.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        validate_fields(&self.full_name, &self.email, &self.skills)
    }
}

/// Canonical employee record owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub position: Position,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    pub skills: Vec<Skill>,
}

impl Employee {
    /// Sum of experience years over all skills.
    pub fn total_experience(&self) -> u32 {
        self.skills.iter().map(|skill| skill.year_experience).sum()
    }

    /// Validates all invariants including the id.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.id == 0 {
            return Err(EmployeeValidationError::ZeroId);
        }
        validate_fields(&self.full_name, &self.email, &self.skills)
    }

    /// Drops the id, e.g. to re-submit a record as new.
    pub fn into_new(self) -> NewEmployee {
        NewEmployee {
            full_name: self.full_name,
            email: self.email,
            position: self.position,
            start_date: self.start_date,
            skills: self.skills,
        }
    }
}

/// Model invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    ZeroId,
    FullNameTooShort { min_chars: usize, actual: usize },
    InvalidEmail,
    NoSkills,
    EmptySkillName { index: usize },
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "employee id must be positive"),
            Self::FullNameTooShort { min_chars, actual } => write!(
                f,
                "full name must have at least {min_chars} characters, got {actual}"
            ),
            Self::InvalidEmail => write!(f, "email is not well-formed"),
            Self::NoSkills => write!(f, "employee must have at least one skill"),
            Self::EmptySkillName { index } => write!(f, "skill #{index} has an empty name"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Returns whether `value` is a well-formed email address.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    value.chars().count() <= EMAIL_MAX_CHARS
        && local.chars().count() <= EMAIL_LOCAL_MAX_CHARS
        && EMAIL_RE.is_match(value)
}

fn validate_fields(
    full_name: &str,
    email: &str,
    skills: &[Skill],
) -> Result<(), EmployeeValidationError> {
    let name_chars = full_name.trim().chars().count();
    if name_chars < FULL_NAME_MIN_CHARS {
        return Err(EmployeeValidationError::FullNameTooShort {
            min_chars: FULL_NAME_MIN_CHARS,
            actual: name_chars,
        });
    }
    if !is_valid_email(email) {
        return Err(EmployeeValidationError::InvalidEmail);
    }
    if skills.is_empty() {
        return Err(EmployeeValidationError::NoSkills);
    }
    if let Some(index) = skills.iter().position(|s| s.skill.trim().is_empty()) {
        return Err(EmployeeValidationError::EmptySkillName { index });
    }
    Ok(())
}

/// Serde adapter for calendar dates.
///
/// Writes `YYYY-MM-DD`. Reads `YYYY-MM-DD` or an RFC 3339 timestamp, keeping
/// only the date part of the latter.
pub mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid calendar date `{raw}`")))
    }

    /// Parses a calendar date from either accepted text form.
    pub fn parse(value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, FORMAT) {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::{calendar_date, is_valid_email, Position};
    use chrono::NaiveDate;

    #[test]
    fn email_grammar_accepts_common_shapes() {
        assert!(is_valid_email("john.smith@example.com"));
        assert!(is_valid_email("a+b@sub.example.org"));
        assert!(is_valid_email("x@localhost"));
    }

    #[test]
    fn email_grammar_rejects_malformed_values() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("dot.@example.com"));
        assert!(!is_valid_email("user@-example.com"));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(65))));
    }

    #[test]
    fn calendar_date_accepts_timestamps_from_older_payloads() {
        let expected = NaiveDate::from_ymd_opt(2022, 1, 15).unwrap();
        assert_eq!(calendar_date::parse("2022-01-15"), Some(expected));
        assert_eq!(
            calendar_date::parse("2022-01-15T00:00:00.000Z"),
            Some(expected)
        );
        assert_eq!(calendar_date::parse("15/01/2022"), None);
    }

    #[test]
    fn position_parse_is_case_insensitive() {
        assert_eq!(Position::parse(" qa "), Some(Position::Qa));
        assert_eq!(Position::parse("Manager"), Some(Position::Manager));
        assert_eq!(Position::parse("Intern"), None);
    }
}
