use registry_core::{FixedClock, FlatFilePersonStore, OffenseOutcome, Person, PersonRecord};
use std::fs;
use std::path::{Path, PathBuf};

const HIGHLAND: &str = "32|Highland Street|Melbourne|Victoria|Australia";

fn data_file(dir: &Path) -> PathBuf {
    dir.join("persons.txt")
}

fn fixed(record: PersonRecord) -> Person<FixedClock> {
    Person::with_clock(record, FixedClock::from_date_str("19-10-2026").unwrap())
}

#[test]
fn create_appends_valid_person() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFilePersonStore::new(data_file(dir.path()));

    let person = Person::new("56s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990");
    assert!(person.create(&store));

    let content = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        content,
        format!("56s_d%&fAB,John,Doe,{HIGHLAND},15-11-1990,false\n")
    );
}

#[test]
fn create_rejects_each_invalid_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFilePersonStore::new(data_file(dir.path()));

    let invalid = [
        Person::new("12abcXYZ!!", "Alice", "Smith", HIGHLAND, "15-11-1990"),
        Person::new("56abcdefAB", "John", "Doe", HIGHLAND, "15-11-1990"),
        Person::new("56s_d%&fAB", "John", "Doe", "32|Street|City|NSW|Australia", "15-11-1990"),
        Person::new("56s_d%&fAB", "John", "Doe", HIGHLAND, "1990-11-15"),
    ];
    for person in &invalid {
        assert!(!person.create(&store), "{:?} should be rejected", person.record());
    }
    assert!(!store.path().exists());
}

#[test]
fn update_birthdate_only_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(
        &path,
        format!("56s_d%&fAB,John,Doe,{HIGHLAND},15-11-2000,false\n"),
    )
    .unwrap();
    let store = FlatFilePersonStore::new(&path);

    let mut person = Person::new("56s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-2000");
    assert!(person.update(&store, "56s_d%&fAB", "John", "Doe", HIGHLAND, "01-01-2001"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("01-01-2001"));
    assert!(!content.contains("15-11-2000"));
    assert_eq!(person.record().birthdate, "01-01-2001");
}

#[test]
fn update_birthdate_with_name_change_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(dir.path());
    let original = format!("56s_d%&fAB,John,Doe,{HIGHLAND},15-11-2000,false\n");
    fs::write(&path, &original).unwrap();
    let store = FlatFilePersonStore::new(&path);

    let mut person = Person::new("56s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-2000");
    assert!(!person.update(&store, "56s_d%&fAB", "Jane", "Doe", HIGHLAND, "01-01-2001"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(person.record().first_name, "John");
}

#[test]
fn update_minor_address_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(dir.path());
    let original = format!("56s_d%&fAB,John,Doe,{HIGHLAND},15-11-2010,false\n");
    fs::write(&path, &original).unwrap();
    let store = FlatFilePersonStore::new(&path);

    let mut person = fixed(PersonRecord::new(
        "56s_d%&fAB",
        "John",
        "Doe",
        HIGHLAND,
        "15-11-2010",
    ));
    assert!(!person.update(
        &store,
        "56s_d%&fAB",
        "John",
        "Doe",
        "99|New|Melbourne|Victoria|Australia",
        "15-11-2010"
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn update_even_identifier_change_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(
        &path,
        format!("86s_d%&fAB,John,Doe,{HIGHLAND},15-11-1990,false\n"),
    )
    .unwrap();
    let store = FlatFilePersonStore::new(&path);

    let mut person = Person::new("86s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990");
    assert!(!person.update(&store, "88s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990"));
}

#[test]
fn update_adult_address_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(
        &path,
        format!("77s_d%&fAB,John,Doe,{HIGHLAND},15-11-1990,false\n"),
    )
    .unwrap();
    let store = FlatFilePersonStore::new(&path);

    let mut person = Person::new("77s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990");
    assert!(person.update(
        &store,
        "77s_d%&fAB",
        "John",
        "Doe",
        "90|Lane|Melbourne|Victoria|Australia",
        "15-11-1990"
    ));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "77s_d%&fAB,John,Doe,90|Lane|Melbourne|Victoria|Australia,15-11-1990,false\n"
    );
}

#[test]
fn update_without_data_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFilePersonStore::new(data_file(dir.path()));

    let mut person = Person::new("77s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990");
    assert!(!person.update(&store, "77s_d%&fAB", "Jack", "Doe", HIGHLAND, "15-11-1990"));
    assert!(!store.path().exists());
}

#[test]
fn update_of_unstored_person_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFilePersonStore::new(data_file(dir.path()));
    assert!(Person::new("77s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990").create(&store));

    let mut stranger = Person::new("33!!abcdEF", "Ann", "Lee", HIGHLAND, "01-01-1980");
    assert!(!stranger.update(&store, "33!!abcdEF", "Anna", "Lee", HIGHLAND, "01-01-1980"));
}

#[test]
fn successive_updates_follow_changed_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFilePersonStore::new(data_file(dir.path()));
    let mut person = Person::new("77s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990");
    assert!(person.create(&store));

    assert!(person.update(&store, "79s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-1990"));
    assert_eq!(person.record().id, "79s_d%&fAB");
    assert!(person.update(&store, "79s_d%&fAB", "Jack", "Doe", HIGHLAND, "15-11-1990"));

    let content = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        content,
        format!("79s_d%&fAB,Jack,Doe,{HIGHLAND},15-11-1990,false\n")
    );
}

#[test]
fn offenses_after_birthdate_update_use_new_age() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFilePersonStore::new(data_file(dir.path()));
    let mut person = fixed(PersonRecord::new(
        "77s_d%&fAB",
        "John",
        "Doe",
        HIGHLAND,
        "15-11-1990",
    ));
    assert!(person.create(&store));

    // Now 17 as of 19-10-2026, so the six-point limit applies.
    assert!(person.update(&store, "77s_d%&fAB", "John", "Doe", HIGHLAND, "15-11-2008"));
    assert_eq!(person.record_offense("01-01-2026", 4), OffenseOutcome::Success);
    assert_eq!(person.record_offense("01-02-2026", 3), OffenseOutcome::Success);
    assert!(person.is_suspended());
}

#[test]
fn record_loaded_from_file_keeps_stored_suspension_flag() {
    let record = PersonRecord::from_line(&format!(
        "77s_d%&fAB,John,Doe,{HIGHLAND},15-11-1990,true"
    ))
    .unwrap();
    let person = Person::from_record(record);
    assert!(person.is_suspended());
}
