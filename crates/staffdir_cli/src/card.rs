//! Stateless rendering of employees for the terminal.

use chrono::NaiveDate;
use staffdir_core::{Employee, SortField, SortKey};

/// Formats a start date as `Jan 15, 2022`.
pub fn format_start_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Renders one employee as a three-line card.
pub fn render_card(employee: &Employee) -> String {
    let skills = employee
        .skills
        .iter()
        .map(|skill| format!("{} ({}y)", skill.skill, skill.year_experience))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "#{} {} <{}>\n   {} | since {} | {} yrs total experience\n   Skills: {}",
        employee.id,
        employee.full_name,
        employee.email,
        employee.position,
        format_start_date(employee.start_date),
        employee.total_experience(),
        skills
    )
}

/// Renders the sortable column header with direction markers.
pub fn render_header(key: SortKey, search_term: &str) -> String {
    let columns = [
        ("name", SortField::Name),
        ("date", SortField::StartDate),
        ("skills", SortField::SkillsCount),
    ]
    .iter()
    .map(|(label, field)| format!("{label} {}", key.indicator(*field)))
    .collect::<Vec<_>>()
    .join("  ");

    if search_term.is_empty() {
        format!("Sort: {columns}")
    } else {
        format!("Sort: {columns}  Search: \"{search_term}\"")
    }
}

/// Renders the whole list, or a placeholder when it is empty.
pub fn render_list(employees: &[Employee], key: SortKey, search_term: &str) -> String {
    let mut out = render_header(key, search_term);
    if employees.is_empty() {
        out.push_str("\n(no employees found)");
        return out;
    }
    for employee in employees {
        out.push('\n');
        out.push_str(&render_card(employee));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_start_date, render_card, render_header};
    use chrono::NaiveDate;
    use staffdir_core::store::sample::sample_employees;
    use staffdir_core::{SortDirection, SortField, SortKey};

    #[test]
    fn start_date_uses_short_month_format() {
        let date = NaiveDate::from_ymd_opt(2020, 9, 5).unwrap();
        assert_eq!(format_start_date(date), "Sep 5, 2020");
    }

    #[test]
    fn card_shows_total_experience_and_skills() {
        let card = render_card(&sample_employees()[0]);
        assert!(card.starts_with("#1 John Smith <john.smith@example.com>"));
        assert!(card.contains("Developer | since Jan 15, 2022 | 9 yrs"));
        assert!(card.contains("Angular (3y), TypeScript (4y), RxJS (2y)"));
    }

    #[test]
    fn header_marks_active_column() {
        let key = SortKey::new(SortField::SkillsCount, SortDirection::Descending);
        assert_eq!(
            render_header(key, "jo"),
            "Sort: name ↕  date ↕  skills ↓  Search: \"jo\""
        );
    }
}
