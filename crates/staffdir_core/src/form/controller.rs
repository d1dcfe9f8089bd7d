//! Form controller for creating and editing employees.
//!
//! # Invariants
//! - `document().skills` and the touched rows always have equal length >= 1.
//! - `submit` touches the store only when the document validates.
//! - After a successful submit or a cancel, the controller is back in
//!   create mode with a pristine single-row document.

use crate::form::document::{
    EmployeeDocument, FormField, FormMode, SkillField, SkillRow, TouchedState,
};
use crate::form::validation::{validate_document, ValidationReport};
use crate::model::employee::{
    calendar_date, Employee, EmployeeId, NewEmployee, Position, Skill,
};
use crate::reactive::{ObserverRegistry, Subscription};
use crate::storage::KeyValueStore;
use crate::store::{EmployeeStore, StoreResult};
use log::{debug, info, warn};

/// Signals emitted to the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submitted(EmployeeId),
    Cancelled,
}

/// Result of a submit attempt that reached no storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record as written to the store.
    Submitted(Employee),
    /// Nothing was written; every field is now marked touched.
    Invalid(ValidationReport),
}

/// Owns one editable employee document.
pub struct FormController {
    mode: FormMode,
    document: EmployeeDocument,
    touched: TouchedState,
    events: ObserverRegistry<FormEvent>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    /// Creates a controller in create mode with one empty skill row.
    pub fn new() -> Self {
        let document = EmployeeDocument::default();
        let touched = TouchedState::pristine(document.skills.len());
        Self {
            mode: FormMode::Create,
            document,
            touched,
            events: ObserverRegistry::new(),
        }
    }

    /// Enters edit mode for `existing`, or create mode when `None`.
    ///
    /// Edit mode builds exactly one skill row per existing skill.
    pub fn initialize(&mut self, existing: Option<&Employee>) {
        match existing {
            Some(employee) => {
                self.mode = FormMode::Edit(employee.id);
                self.document = EmployeeDocument::from_employee(employee);
            }
            None => {
                self.mode = FormMode::Create;
                self.document = EmployeeDocument::default();
            }
        }
        self.touched = TouchedState::pristine(self.document.skills.len());
        debug!(
            "event=form_init module=form status=ok mode={} rows={}",
            self.mode_label(),
            self.document.skills.len()
        );
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn document(&self) -> &EmployeeDocument {
        &self.document
    }

    pub fn skill_row_count(&self) -> usize {
        self.document.skills.len()
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.document.full_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.document.email = value.into();
    }

    pub fn set_position(&mut self, value: impl Into<String>) {
        self.document.position = value.into();
    }

    pub fn set_start_date(&mut self, value: impl Into<String>) {
        self.document.start_date = value.into();
    }

    /// Sets a row's skill name. Returns `false` for an unknown row.
    pub fn set_skill_name(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.document.skills.get_mut(index) {
            Some(row) => {
                row.skill = value.into();
                true
            }
            None => false,
        }
    }

    /// Sets a row's years of experience; `None` means left blank.
    pub fn set_skill_years(&mut self, index: usize, value: Option<i32>) -> bool {
        match self.document.skills.get_mut(index) {
            Some(row) => {
                row.year_experience = value;
                true
            }
            None => false,
        }
    }

    /// Appends a skill row.
    pub fn add_skill_row(&mut self, skill: impl Into<String>, years: i32) {
        self.document.skills.push(SkillRow::new(skill, years));
        self.touched.skills.push(Default::default());
    }

    /// Appends an empty skill row with zero years.
    pub fn add_empty_skill_row(&mut self) {
        self.add_skill_row("", 0);
    }

    /// Removes the row at `index` unless it is the last remaining row.
    ///
    /// Returns whether a row was removed.
    pub fn remove_skill_row(&mut self, index: usize) -> bool {
        if self.document.skills.len() <= 1 || index >= self.document.skills.len() {
            return false;
        }
        self.document.skills.remove(index);
        self.touched.skills.remove(index);
        true
    }

    pub fn mark_touched(&mut self, field: FormField) {
        self.touched.fields.insert(field);
    }

    pub fn mark_skill_touched(&mut self, index: usize, field: SkillField) {
        if let Some(row) = self.touched.skills.get_mut(index) {
            row.set(field);
        }
    }

    /// Touches every field, including every skill-row field.
    pub fn mark_all_touched(&mut self) {
        self.touched = TouchedState::all(self.document.skills.len());
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.is_field_touched(field)
    }

    pub fn is_skill_touched(&self, index: usize, field: SkillField) -> bool {
        self.touched.is_skill_touched(index, field)
    }

    /// Validates the current document.
    pub fn validate(&self) -> ValidationReport {
        validate_document(&self.document)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// Whether `field` is invalid and has been touched.
    pub fn is_field_invalid(&self, field: FormField) -> bool {
        self.error_message(field).is_some()
    }

    pub fn is_skill_field_invalid(&self, index: usize, field: SkillField) -> bool {
        self.skill_error_message(index, field).is_some()
    }

    /// Message for a touched invalid field; `None` for pristine or valid ones.
    pub fn error_message(&self, field: FormField) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        self.validate()
            .field(field)
            .map(|error| error.message(field.name()))
    }

    pub fn skill_error_message(&self, index: usize, field: SkillField) -> Option<String> {
        if !self.is_skill_touched(index, field) {
            return None;
        }
        self.validate()
            .skill_field(index, field)
            .map(|error| error.message(field.name()))
    }

    /// Validates and writes the document into `store`.
    ///
    /// Invalid documents mark every field touched and leave the store alone.
    /// On success the controller emits `FormEvent::Submitted` and resets.
    ///
    /// # Errors
    /// - Returns the store error when persisting fails; the document is kept
    ///   so the user can retry.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        store: &EmployeeStore<S>,
    ) -> StoreResult<SubmitOutcome> {
        let report = self.validate();
        let Some(draft) = to_new_employee(&self.document).filter(|_| report.is_valid()) else {
            self.mark_all_touched();
            info!(
                "event=form_submit module=form status=skipped reason=invalid errors={}",
                report.error_count()
            );
            return Ok(SubmitOutcome::Invalid(report));
        };

        let stored = match self.mode {
            FormMode::Edit(id) => {
                let employee = draft.with_id(id);
                if !store.update(employee.clone())? {
                    warn!("event=form_submit module=form status=skipped reason=not_found id={id}");
                }
                employee
            }
            FormMode::Create => store.add(draft)?,
        };

        info!(
            "event=form_submit module=form status=ok mode={} id={}",
            self.mode_label(),
            stored.id
        );
        self.reset();
        self.events.emit(FormEvent::Submitted(stored.id));
        Ok(SubmitOutcome::Submitted(stored))
    }

    /// Discards the document without touching any store.
    pub fn cancel(&mut self) {
        debug!("event=form_cancel module=form status=ok mode={}", self.mode_label());
        self.reset();
        self.events.emit(FormEvent::Cancelled);
    }

    /// Registers a listener for submit/cancel signals.
    pub fn subscribe(&self, observer: impl FnMut(&FormEvent) + 'static) -> Subscription {
        self.events.subscribe(observer)
    }

    fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.document = EmployeeDocument::default();
        self.touched = TouchedState::pristine(self.document.skills.len());
    }

    fn mode_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "create",
            FormMode::Edit(_) => "edit",
        }
    }
}

/// Converts a document into employee fields.
///
/// Returns `None` when a value cannot be converted (missing position, bad
/// date, blank or negative years). Callers validate first for field detail.
pub fn to_new_employee(document: &EmployeeDocument) -> Option<NewEmployee> {
    let position = Position::parse(&document.position)?;
    let start_date = calendar_date::parse(&document.start_date)?;
    let skills = document
        .skills
        .iter()
        .map(|row| {
            let years = u32::try_from(row.year_experience?).ok()?;
            Some(Skill::new(row.skill.trim(), years))
        })
        .collect::<Option<Vec<_>>>()?;

    Some(NewEmployee {
        full_name: document.full_name.trim().to_string(),
        email: document.email.trim().to_string(),
        position,
        start_date,
        skills,
    })
}
