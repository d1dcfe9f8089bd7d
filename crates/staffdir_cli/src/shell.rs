//! Interactive app shell: list view, form view and delete confirmation.
//!
//! # Responsibility
//! - Translate typed commands into store, list and form operations.
//! - Switch between list and form views on form signals.
//!
//! # Invariants
//! - Deletes run only after an explicit `y` confirmation.
//! - The shell never mutates employees except through the store.

use crate::card::{render_card, render_list};
use anyhow::{Context, Result};
use log::{info, warn};
use staffdir_core::{
    Employee, EmployeeId, EmployeeStore, FormController, FormEvent, FormField, KeyValueStore,
    ListBinding, ListViewModel, SkillField, SortField, SubmitOutcome, Subscription,
    AVAILABLE_SKILLS, POSITIONS,
};
use std::cell::Cell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

const HELP: &str = "Commands:
  list                      show the employee list
  search <text>             filter by name or email (empty clears)
  sort <name|date|skills>   sort; repeat to flip direction
  add                       create an employee
  edit <id>                 edit an employee
  delete <id>               delete an employee (asks first)
  help                      show this help
  quit                      exit";

/// Which screen the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Form,
}

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search(String),
    Sort(SortField),
    Add,
    Edit(EmployeeId),
    Delete(EmployeeId),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(name, rest)| (name, rest.trim()));

    let command = match name.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "search" | "find" => Command::Search(rest.to_string()),
        "sort" => Command::Sort(rest.parse()?),
        "add" | "new" => Command::Add,
        "edit" => Command::Edit(parse_id(rest)?),
        "delete" | "rm" => Command::Delete(parse_id(rest)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(Some(command))
}

fn parse_id(value: &str) -> Result<EmployeeId, String> {
    value
        .parse::<EmployeeId>()
        .map_err(|_| format!("expected an employee id, got `{value}`"))
}

/// Parses `name:years` pairs separated by commas.
///
/// Missing or non-numeric years read as blank.
pub fn parse_skill_rows(value: &str) -> Vec<(String, Option<i32>)> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((name, years)) => (name.trim().to_string(), years.trim().parse().ok()),
            None => (entry.to_string(), None),
        })
        .collect()
}

/// Terminal session over a store.
pub struct Shell<'s, S: KeyValueStore, R: BufRead, W: Write> {
    store: &'s EmployeeStore<S>,
    list: ListBinding,
    form: FormController,
    view: Rc<Cell<View>>,
    _form_events: Subscription,
    input: R,
    output: W,
}

impl<'s, S: KeyValueStore, R: BufRead, W: Write> Shell<'s, S, R, W> {
    pub fn new(store: &'s EmployeeStore<S>, search_debounce: Duration, input: R, output: W) -> Self {
        let list = ListBinding::bind(store, ListViewModel::new(search_debounce));
        let form = FormController::new();
        let view = Rc::new(Cell::new(View::List));
        let view_sink = Rc::clone(&view);
        let form_events = form.subscribe(move |event| match event {
            FormEvent::Submitted(_) | FormEvent::Cancelled => view_sink.set(View::List),
        });

        Self {
            store,
            list,
            form,
            view,
            _form_events: form_events,
            input,
            output,
        }
    }

    pub fn view(&self) -> View {
        self.view.get()
    }

    /// Reads commands until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        self.show_list()?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if !self.handle(command)? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => writeln!(self.output, "{message}")?,
            }
        }
        info!("event=shell_exit module=cli status=ok");
        Ok(())
    }

    fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::List => self.show_list()?,
            Command::Search(text) => {
                self.apply_search(&text);
                self.show_list()?;
            }
            Command::Sort(field) => {
                self.list.sort_by(field);
                self.show_list()?;
            }
            Command::Add => self.run_form(None)?,
            Command::Edit(id) => match self.store.get_by_id(id) {
                Some(employee) => self.run_form(Some(employee))?,
                None => writeln!(self.output, "No employee with id {id}.")?,
            },
            Command::Delete(id) => self.confirm_delete(id)?,
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn show_list(&mut self) -> Result<()> {
        let rendered = render_list(
            &self.list.current(),
            self.list.sort_key(),
            &self.list.search_term(),
        );
        writeln!(self.output, "{rendered}")?;
        Ok(())
    }

    /// Feeds the search text and waits out the debounce window.
    fn apply_search(&mut self, text: &str) {
        self.list.input_search(text, Instant::now());
        if let Some(deadline) = self.list.next_deadline() {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            self.list.poll(Instant::now());
        }
    }

    fn confirm_delete(&mut self, id: EmployeeId) -> Result<()> {
        let Some(employee) = self.store.get_by_id(id) else {
            writeln!(self.output, "No employee with id {id}.")?;
            return Ok(());
        };
        let question = format!(
            "Are you sure you want to delete {}? (y/n)",
            employee.full_name
        );
        if !self.ask_yes_no(&question)? {
            writeln!(self.output, "Kept.")?;
            return Ok(());
        }
        match self.store.delete(id) {
            Ok(_) => {
                writeln!(self.output, "Deleted.")?;
                self.show_list()?;
            }
            Err(err) => {
                warn!("event=shell_delete module=cli status=error id={id} error={err}");
                writeln!(self.output, "Could not delete {}: {err}", employee.full_name)?;
            }
        }
        Ok(())
    }

    fn run_form(&mut self, existing: Option<Employee>) -> Result<()> {
        self.form.initialize(existing.as_ref());
        self.view.set(View::Form);
        if let Some(employee) = &existing {
            writeln!(self.output, "Editing:\n{}", render_card(employee))?;
        }
        writeln!(
            self.output,
            "Positions: {}. Skills: {}. Blank keeps the shown value.",
            POSITIONS.map(|p| p.label()).join(", "),
            AVAILABLE_SKILLS.join(", ")
        )?;

        while self.view.get() == View::Form {
            if !self.prompt_fields()? {
                self.form.cancel();
                writeln!(self.output, "Cancelled.")?;
                break;
            }
            let retry_question = match self.form.submit(self.store) {
                Ok(SubmitOutcome::Submitted(employee)) => {
                    writeln!(self.output, "Saved:\n{}", render_card(&employee))?;
                    continue;
                }
                Ok(SubmitOutcome::Invalid(_)) => {
                    self.print_form_errors()?;
                    "Fix and retry? (y/n)"
                }
                Err(err) => {
                    warn!("event=shell_submit module=cli status=error error={err}");
                    writeln!(self.output, "Could not save: {err}")?;
                    "Try again? (y/n)"
                }
            };
            if !self.ask_yes_no(retry_question)? {
                self.form.cancel();
                writeln!(self.output, "Cancelled.")?;
            }
        }

        self.show_list()
    }

    /// Prompts every field. Returns `false` when input ended.
    fn prompt_fields(&mut self) -> Result<bool> {
        let text_fields = [
            (FormField::FullName, "Full name"),
            (FormField::Email, "Email"),
            (FormField::Position, "Position"),
            (FormField::StartDate, "Start date (YYYY-MM-DD)"),
        ];
        for (field, label) in text_fields {
            let current = self.field_value(field);
            let Some(answer) = self.prompt(label, &current)? else {
                return Ok(false);
            };
            if !answer.is_empty() {
                match field {
                    FormField::FullName => self.form.set_full_name(answer),
                    FormField::Email => self.form.set_email(answer),
                    FormField::Position => self.form.set_position(answer),
                    FormField::StartDate => self.form.set_start_date(answer),
                }
            }
            self.form.mark_touched(field);
        }

        let current = self
            .form
            .document()
            .skills
            .iter()
            .map(|row| match row.year_experience {
                Some(years) => format!("{}:{years}", row.skill),
                None => row.skill.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let Some(answer) = self.prompt("Skills (name:years, ...)", &current)? else {
            return Ok(false);
        };
        if !answer.is_empty() {
            self.fill_skills(&parse_skill_rows(&answer));
        }
        for index in 0..self.form.skill_row_count() {
            self.form.mark_skill_touched(index, SkillField::Skill);
            self.form.mark_skill_touched(index, SkillField::YearExperience);
        }
        Ok(true)
    }

    fn fill_skills(&mut self, rows: &[(String, Option<i32>)]) {
        if rows.is_empty() {
            return;
        }
        while self.form.skill_row_count() > rows.len() {
            let last = self.form.skill_row_count() - 1;
            self.form.remove_skill_row(last);
        }
        for (index, (name, years)) in rows.iter().enumerate() {
            if index >= self.form.skill_row_count() {
                self.form.add_empty_skill_row();
            }
            self.form.set_skill_name(index, name.as_str());
            self.form.set_skill_years(index, *years);
        }
    }

    fn field_value(&self, field: FormField) -> String {
        let document = self.form.document();
        match field {
            FormField::FullName => document.full_name.clone(),
            FormField::Email => document.email.clone(),
            FormField::Position => document.position.clone(),
            FormField::StartDate => document.start_date.clone(),
        }
    }

    fn print_form_errors(&mut self) -> Result<()> {
        let mut messages: Vec<String> = FormField::ALL
            .into_iter()
            .filter_map(|field| self.form.error_message(field))
            .collect();
        for index in 0..self.form.skill_row_count() {
            for field in [SkillField::Skill, SkillField::YearExperience] {
                if let Some(message) = self.form.skill_error_message(index, field) {
                    messages.push(format!("skill row {}: {message}", index + 1));
                }
            }
        }
        for message in messages {
            writeln!(self.output, "  - {message}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        if current.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{current}]: ")?;
        }
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| line.trim().to_string()))
    }

    fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
