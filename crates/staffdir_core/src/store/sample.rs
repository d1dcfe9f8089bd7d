//! First-run demo records.

use crate::model::employee::{Employee, Position, Skill};
use chrono::NaiveDate;

/// Returns the four demo employees with fixed ids 1 to 4.
pub fn sample_employees() -> Vec<Employee> {
    vec![
        Employee {
            id: 1,
            full_name: "John Smith".to_string(),
            email: "john.smith@example.com".to_string(),
            position: Position::Developer,
            start_date: date(2022, 1, 15),
            skills: vec![
                Skill::new("Angular", 3),
                Skill::new("TypeScript", 4),
                Skill::new("RxJS", 2),
            ],
        },
        Employee {
            id: 2,
            full_name: "Sarah Johnson".to_string(),
            email: "sarah.johnson@example.com".to_string(),
            position: Position::Designer,
            start_date: date(2021, 6, 20),
            skills: vec![Skill::new("CSS", 5), Skill::new("HTML", 6)],
        },
        Employee {
            id: 3,
            full_name: "Mike Wilson".to_string(),
            email: "mike.wilson@example.com".to_string(),
            position: Position::Qa,
            start_date: date(2023, 3, 10),
            skills: vec![Skill::new("TypeScript", 2), Skill::new("Angular", 1)],
        },
        Employee {
            id: 4,
            full_name: "Emily Davis".to_string(),
            email: "emily.davis@example.com".to_string(),
            position: Position::Manager,
            start_date: date(2020, 9, 5),
            skills: vec![
                Skill::new("Angular", 5),
                Skill::new("TypeScript", 5),
                Skill::new("RxJS", 4),
                Skill::new("CSS", 3),
            ],
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date")
}
