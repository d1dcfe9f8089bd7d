use chrono::NaiveDate;
use staffdir_core::{Employee, EmployeeValidationError, NewEmployee, Position, Skill};

fn sample_new() -> NewEmployee {
    NewEmployee {
        full_name: "Grace Hopper".to_string(),
        email: "grace.hopper@example.com".to_string(),
        position: Position::Qa,
        start_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        skills: vec![Skill::new("TypeScript", 4), Skill::new("CSS", 1)],
    }
}

#[test]
fn serialization_uses_camel_case_wire_fields() {
    let employee = sample_new().with_id(12);

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["id"], 12);
    assert_eq!(json["fullName"], "Grace Hopper");
    assert_eq!(json["email"], "grace.hopper@example.com");
    assert_eq!(json["position"], "QA");
    assert_eq!(json["startDate"], "2024-02-29");
    assert_eq!(json["skills"][0]["skill"], "TypeScript");
    assert_eq!(json["skills"][0]["yearExperience"], 4);

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn deserialize_rejects_unknown_position_and_bad_date() {
    let mut value = serde_json::to_value(sample_new().with_id(1)).unwrap();
    value["position"] = "Intern".into();
    assert!(serde_json::from_value::<Employee>(value).is_err());

    let mut value = serde_json::to_value(sample_new().with_id(1)).unwrap();
    value["startDate"] = "2024-02-30".into();
    let err = serde_json::from_value::<Employee>(value).unwrap_err();
    assert!(err.to_string().contains("invalid calendar date"), "{err}");
}

#[test]
fn total_experience_sums_all_skills() {
    assert_eq!(sample_new().with_id(1).total_experience(), 5);
}

#[test]
fn validate_reports_first_violation() {
    let mut employee = sample_new();
    employee.full_name = " Al ".to_string();
    assert_eq!(
        employee.validate().unwrap_err(),
        EmployeeValidationError::FullNameTooShort {
            min_chars: 3,
            actual: 2
        }
    );

    let mut employee = sample_new();
    employee.skills.clear();
    assert_eq!(
        employee.validate().unwrap_err(),
        EmployeeValidationError::NoSkills
    );

    let mut employee = sample_new().with_id(0);
    employee.email = "broken".to_string();
    assert_eq!(employee.validate().unwrap_err(), EmployeeValidationError::ZeroId);
}
