//! Sort keys and comparators for the employee list.

use crate::model::employee::Employee;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    StartDate,
    SkillsCount,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::StartDate => "startDate",
            Self::SkillsCount => "skillsCount",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "fullname" => Ok(Self::Name),
            "date" | "startdate" | "start_date" => Ok(Self::StartDate),
            "skills" | "skillscount" | "skills_count" => Ok(Self::SkillsCount),
            other => Err(format!(
                "unknown sort field `{other}`; expected name|date|skills"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortKey {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Applies a column selection.
    ///
    /// Selecting the active column flips its direction; selecting another
    /// column switches to it in ascending order.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Ascending)
        }
    }

    /// Column header marker: `↕` when inactive, `↑`/`↓` when active.
    pub fn indicator(self, field: SortField) -> &'static str {
        if self.field != field {
            return "↕";
        }
        match self.direction {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Natural ascending comparison for `field`.
pub fn compare_by(field: SortField, a: &Employee, b: &Employee) -> Ordering {
    match field {
        SortField::Name => compare_names(&a.full_name, &b.full_name),
        SortField::StartDate => a.start_date.cmp(&b.start_date),
        SortField::SkillsCount => a.skills.len().cmp(&b.skills.len()),
    }
}

/// Orders employees by `key`.
///
/// Ascending is a stable sort by the field comparator. Descending is the
/// ascending result reversed, so ties also appear in mirrored order.
pub fn sort_employees(mut employees: Vec<Employee>, key: SortKey) -> Vec<Employee> {
    employees.sort_by(|a, b| compare_by(key.field, a, b));
    if key.direction == SortDirection::Descending {
        employees.reverse();
    }
    employees
}

/// Dictionary-style name comparison in three levels.
///
/// 1. Base letters: accents stripped (NFD without combining marks), case folded.
/// 2. Accents: `Emile` before `Émile`.
/// 3. Case: lowercase before uppercase at the first differing position.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| compare_case(a, b))
}

fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

fn compare_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map(|(x, y)| case_rank(x).cmp(&case_rank(y)).then(x.cmp(&y)))
        .unwrap_or_else(|| a.chars().count().cmp(&b.chars().count()))
}

fn case_rank(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_names, SortDirection, SortField, SortKey};
    use std::cmp::Ordering;

    #[test]
    fn toggle_flips_active_field_and_resets_other_fields() {
        let key = SortKey::default();
        let flipped = key.toggled(SortField::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let switched = flipped.toggled(SortField::SkillsCount);
        assert_eq!(
            switched,
            SortKey::new(SortField::SkillsCount, SortDirection::Ascending)
        );
    }

    #[test]
    fn indicator_marks_only_active_field() {
        let key = SortKey::new(SortField::StartDate, SortDirection::Descending);
        assert_eq!(key.indicator(SortField::StartDate), "↓");
        assert_eq!(key.indicator(SortField::Name), "↕");
    }

    #[test]
    fn accented_initials_sort_with_their_base_letter() {
        assert_eq!(compare_names("Émile", "Zoe"), Ordering::Less);
        assert_eq!(compare_names("Ángel Ruiz", "Emily Davis"), Ordering::Less);
        assert_eq!(compare_names("Emile", "Émile"), Ordering::Less);
        assert_eq!(compare_names("émile", "Emile"), Ordering::Greater);
        assert_eq!(compare_names("Zoë", "Zoe"), Ordering::Greater);
        assert_eq!(compare_names("Zoë", "Zoey"), Ordering::Less);
    }

    #[test]
    fn names_compare_case_insensitively_first() {
        assert_eq!(compare_names("alice", "Bob"), Ordering::Less);
        assert_eq!(compare_names("Zed", "adam"), Ordering::Greater);
        assert_eq!(compare_names("anna", "Anna"), Ordering::Less);
        assert_eq!(compare_names("Anna", "Anna"), Ordering::Equal);
    }

    #[test]
    fn sort_field_parses_cli_aliases() {
        assert_eq!("date".parse::<SortField>().unwrap(), SortField::StartDate);
        assert_eq!("Skills".parse::<SortField>().unwrap(), SortField::SkillsCount);
        assert!("salary".parse::<SortField>().is_err());
    }
}
