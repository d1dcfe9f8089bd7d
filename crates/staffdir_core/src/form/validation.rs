//! Pure validation of an `EmployeeDocument`.

use crate::form::document::{EmployeeDocument, FormField, SkillField, SkillRow};
use crate::model::employee::{
    calendar_date, is_valid_email, Position, FULL_NAME_MIN_CHARS, POSITIONS,
};
use std::fmt::{Display, Formatter};

/// Reason a single field is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength { required: usize, actual: usize },
    InvalidEmail,
    UnknownPosition,
    InvalidDate,
    Min { min: i32 },
}

impl FieldError {
    /// User-facing message for this error on the field called `field_name`.
    pub fn message(&self, field_name: &str) -> String {
        match self {
            Self::Required => format!("{field_name} is required"),
            Self::MinLength { required, .. } => {
                format!("{field_name} must be at least {required} characters")
            }
            Self::InvalidEmail => "Please enter a valid email".to_string(),
            Self::UnknownPosition => {
                let labels: Vec<&str> = POSITIONS.iter().map(|p| p.label()).collect();
                format!("{field_name} must be one of {}", labels.join(", "))
            }
            Self::InvalidDate => format!("{field_name} must be a valid date"),
            Self::Min { min } => format!("{field_name} must be {min} or greater"),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message("value"))
    }
}

/// Errors of one skill row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillRowErrors {
    pub skill: Option<FieldError>,
    pub year_experience: Option<FieldError>,
}

impl SkillRowErrors {
    pub fn get(&self, field: SkillField) -> Option<&FieldError> {
        match field {
            SkillField::Skill => self.skill.as_ref(),
            SkillField::YearExperience => self.year_experience.as_ref(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.skill.is_none() && self.year_experience.is_none()
    }
}

/// Structured result of validating a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub full_name: Option<FieldError>,
    pub email: Option<FieldError>,
    pub position: Option<FieldError>,
    pub start_date: Option<FieldError>,
    /// One entry per skill row, in row order.
    pub skills: Vec<SkillRowErrors>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        FormField::ALL.into_iter().all(|field| self.field(field).is_none())
            && self.skills.iter().all(SkillRowErrors::is_valid)
    }

    pub fn field(&self, field: FormField) -> Option<&FieldError> {
        match field {
            FormField::FullName => self.full_name.as_ref(),
            FormField::Email => self.email.as_ref(),
            FormField::Position => self.position.as_ref(),
            FormField::StartDate => self.start_date.as_ref(),
        }
    }

    pub fn skill_field(&self, index: usize, field: SkillField) -> Option<&FieldError> {
        self.skills.get(index).and_then(|row| row.get(field))
    }

    /// Total number of invalid fields, skill-row fields included.
    pub fn error_count(&self) -> usize {
        let top = FormField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_some())
            .count();
        let rows: usize = self
            .skills
            .iter()
            .map(|row| usize::from(row.skill.is_some()) + usize::from(row.year_experience.is_some()))
            .sum();
        top + rows
    }
}

/// Validates every field of `document`.
pub fn validate_document(document: &EmployeeDocument) -> ValidationReport {
    ValidationReport {
        full_name: check_full_name(&document.full_name),
        email: check_email(&document.email),
        position: check_position(&document.position),
        start_date: check_start_date(&document.start_date),
        skills: document.skills.iter().map(check_skill_row).collect(),
    }
}

fn check_full_name(value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError::Required);
    }
    let actual = trimmed.chars().count();
    (actual < FULL_NAME_MIN_CHARS).then_some(FieldError::MinLength {
        required: FULL_NAME_MIN_CHARS,
        actual,
    })
}

fn check_email(value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError::Required);
    }
    (!is_valid_email(trimmed)).then_some(FieldError::InvalidEmail)
}

fn check_position(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::Required);
    }
    Position::parse(value)
        .is_none()
        .then_some(FieldError::UnknownPosition)
}

fn check_start_date(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::Required);
    }
    calendar_date::parse(value)
        .is_none()
        .then_some(FieldError::InvalidDate)
}

fn check_skill_row(row: &SkillRow) -> SkillRowErrors {
    let skill = row.skill.trim().is_empty().then_some(FieldError::Required);
    let year_experience = match row.year_experience {
        None => Some(FieldError::Required),
        Some(years) if years < 0 => Some(FieldError::Min { min: 0 }),
        Some(_) => None,
    };
    SkillRowErrors {
        skill,
        year_experience,
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_document, FieldError};
    use crate::form::document::{EmployeeDocument, FormField, SkillField, SkillRow};

    fn valid_document() -> EmployeeDocument {
        EmployeeDocument {
            full_name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            position: "Developer".to_string(),
            start_date: "2024-02-01".to_string(),
            skills: vec![SkillRow::new("RxJS", 2)],
        }
    }

    #[test]
    fn valid_document_has_no_errors() {
        let report = validate_document(&valid_document());
        assert!(report.is_valid());
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn short_name_reports_min_length() {
        let mut document = valid_document();
        document.full_name = "Al".to_string();
        let report = validate_document(&document);
        assert_eq!(
            report.field(FormField::FullName),
            Some(&FieldError::MinLength {
                required: 3,
                actual: 2
            })
        );
        assert_eq!(
            report.full_name.unwrap().message("fullName"),
            "fullName must be at least 3 characters"
        );
    }

    #[test]
    fn empty_fields_are_required_not_malformed() {
        let report = validate_document(&EmployeeDocument::default());
        assert_eq!(report.email, Some(FieldError::Required));
        assert_eq!(report.position, Some(FieldError::Required));
        assert_eq!(report.start_date, Some(FieldError::Required));
        assert_eq!(
            report.skill_field(0, SkillField::Skill),
            Some(&FieldError::Required)
        );
        assert_eq!(report.skill_field(0, SkillField::YearExperience), None);
        assert_eq!(report.error_count(), 5);
    }

    #[test]
    fn malformed_values_have_specific_errors() {
        let mut document = valid_document();
        document.email = "not-an-email".to_string();
        document.position = "Intern".to_string();
        document.start_date = "2024-13-40".to_string();
        document.skills.push(SkillRow {
            skill: "CSS".to_string(),
            year_experience: Some(-1),
        });
        document.skills.push(SkillRow {
            skill: "HTML".to_string(),
            year_experience: None,
        });

        let report = validate_document(&document);
        assert_eq!(report.email, Some(FieldError::InvalidEmail));
        assert_eq!(report.position, Some(FieldError::UnknownPosition));
        assert_eq!(report.start_date, Some(FieldError::InvalidDate));
        assert_eq!(
            report.skill_field(1, SkillField::YearExperience),
            Some(&FieldError::Min { min: 0 })
        );
        assert_eq!(
            report.skill_field(2, SkillField::YearExperience),
            Some(&FieldError::Required)
        );
        assert_eq!(
            FieldError::Min { min: 0 }.message("yearExperience"),
            "yearExperience must be 0 or greater"
        );
    }
}
