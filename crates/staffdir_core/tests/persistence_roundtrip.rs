use staffdir_core::db::open_db_in_memory;
use staffdir_core::store::sample::sample_employees;
use staffdir_core::{
    EmployeePersistence, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, EMPLOYEES_KEY,
};

#[test]
fn save_then_load_returns_equal_collection() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let persistence = EmployeePersistence::new(kv);
    let employees = sample_employees();

    persistence.save(&employees).unwrap();

    assert_eq!(persistence.load(), Some(employees));
}

#[test]
fn empty_slot_loads_as_absent() {
    let persistence = EmployeePersistence::new(MemoryKeyValueStore::new());
    assert_eq!(persistence.load(), None);
}

#[test]
fn empty_collection_round_trips_as_present() {
    let persistence = EmployeePersistence::new(MemoryKeyValueStore::new());
    persistence.save(&[]).unwrap();
    assert_eq!(persistence.load(), Some(Vec::new()));
}

#[test]
fn dates_are_stored_as_calendar_text() {
    let storage = MemoryKeyValueStore::new();
    let persistence = EmployeePersistence::new(&storage);
    persistence.save(&sample_employees()[..1]).unwrap();

    let raw = storage.get_item(EMPLOYEES_KEY).unwrap().unwrap();
    assert!(raw.contains(r#""startDate":"2022-01-15""#), "{raw}");
}

#[test]
fn truncated_payload_loads_as_absent() {
    let storage = MemoryKeyValueStore::new();
    let persistence = EmployeePersistence::new(&storage);
    persistence.save(&sample_employees()).unwrap();

    let raw = storage.get_item(EMPLOYEES_KEY).unwrap().unwrap();
    storage
        .set_item(EMPLOYEES_KEY, &raw[..raw.len() / 2])
        .unwrap();

    assert_eq!(persistence.load(), None);
}
