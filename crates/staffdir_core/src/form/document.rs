//! Plain form document and touched-state types.

use crate::model::employee::{calendar_date, Employee, EmployeeId};
use std::collections::BTreeSet;

/// Whether the form creates a new employee or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the employee with this id; the id is kept on submit.
    Edit(EmployeeId),
}

/// Top-level form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FullName,
    Email,
    Position,
    StartDate,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::FullName,
        FormField::Email,
        FormField::Position,
        FormField::StartDate,
    ];

    /// Name used in user-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Position => "position",
            Self::StartDate => "startDate",
        }
    }
}

/// Fields of one skill row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillField {
    Skill,
    YearExperience,
}

impl SkillField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::YearExperience => "yearExperience",
        }
    }
}

/// One editable skill entry. `year_experience` is `None` when left blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub skill: String,
    pub year_experience: Option<i32>,
}

impl SkillRow {
    pub fn new(skill: impl Into<String>, year_experience: i32) -> Self {
        Self {
            skill: skill.into(),
            year_experience: Some(year_experience),
        }
    }
}

impl Default for SkillRow {
    fn default() -> Self {
        Self::new("", 0)
    }
}

/// Raw form values as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDocument {
    pub full_name: String,
    pub email: String,
    /// Position label; empty when nothing is selected.
    pub position: String,
    /// Calendar date text, `YYYY-MM-DD`.
    pub start_date: String,
    pub skills: Vec<SkillRow>,
}

impl Default for EmployeeDocument {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            position: String::new(),
            start_date: String::new(),
            skills: vec![SkillRow::default()],
        }
    }
}

impl EmployeeDocument {
    /// Copies an employee into form values, one row per existing skill.
    pub fn from_employee(employee: &Employee) -> Self {
        let mut skills: Vec<SkillRow> = employee
            .skills
            .iter()
            .map(|skill| SkillRow {
                skill: skill.skill.clone(),
                year_experience: i32::try_from(skill.year_experience).ok(),
            })
            .collect();
        if skills.is_empty() {
            skills.push(SkillRow::default());
        }

        Self {
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            position: employee.position.label().to_string(),
            start_date: employee
                .start_date
                .format(calendar_date::FORMAT)
                .to_string(),
            skills,
        }
    }
}

/// Touched flags for one skill row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillRowTouched {
    pub skill: bool,
    pub year_experience: bool,
}

impl SkillRowTouched {
    pub fn get(self, field: SkillField) -> bool {
        match field {
            SkillField::Skill => self.skill,
            SkillField::YearExperience => self.year_experience,
        }
    }

    pub fn set(&mut self, field: SkillField) {
        match field {
            SkillField::Skill => self.skill = true,
            SkillField::YearExperience => self.year_experience = true,
        }
    }
}

/// Touched state kept parallel to the document's skill rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchedState {
    pub fields: BTreeSet<FormField>,
    pub skills: Vec<SkillRowTouched>,
}

impl TouchedState {
    /// All-untouched state for a document with `rows` skill rows.
    pub fn pristine(rows: usize) -> Self {
        Self {
            fields: BTreeSet::new(),
            skills: vec![SkillRowTouched::default(); rows],
        }
    }

    /// Every field and every skill-row field touched.
    pub fn all(rows: usize) -> Self {
        Self {
            fields: FormField::ALL.into_iter().collect(),
            skills: vec![
                SkillRowTouched {
                    skill: true,
                    year_experience: true,
                };
                rows
            ],
        }
    }

    pub fn is_field_touched(&self, field: FormField) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_skill_touched(&self, index: usize, field: SkillField) -> bool {
        self.skills
            .get(index)
            .is_some_and(|row| row.get(field))
    }
}
