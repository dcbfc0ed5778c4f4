use registry_core::{
    FixedClock, FlatFilePersonStore, OffenseOutcome, Person, PersonRecord, SuspensionPolicy,
};
use std::fs;

fn person(birthdate: &str) -> Person<FixedClock> {
    let record = PersonRecord::new(
        "56s_d%&fAB",
        "John",
        "Doe",
        "32|Highland Street|Melbourne|Victoria|Australia",
        birthdate,
    );
    Person::with_clock(record, FixedClock::from_date_str("19-10-2026").unwrap())
}

#[test]
fn valid_offense_is_recorded() {
    let mut adult = person("15-11-1990");
    assert_eq!(adult.record_offense("01-01-2026", 3), OffenseOutcome::Success);
    assert_eq!(adult.demerit_total(), 3);
    assert!(!adult.is_suspended());
}

#[test]
fn invalid_points_or_date_fail_without_side_effects() {
    let mut junior = person("15-11-2008");
    for (date, points) in [
        ("01-01-2026", 0),
        ("01-01-2026", 7),
        ("01-01-2026", -1),
        ("2026-01-01", 3),
        ("31-09-2026", 3),
    ] {
        assert_eq!(junior.record_offense(date, points), OffenseOutcome::Failed);
    }
    assert!(junior.ledger().is_empty());
    assert!(!junior.is_suspended());
}

#[test]
fn adult_is_suspended_above_twelve_points() {
    let mut adult = person("15-11-1990");
    assert_eq!(adult.record_offense("01-01-2026", 6), OffenseOutcome::Success);
    assert_eq!(adult.record_offense("01-02-2026", 6), OffenseOutcome::Success);
    assert!(!adult.is_suspended(), "exactly twelve points must not suspend");

    assert_eq!(adult.record_offense("01-03-2026", 1), OffenseOutcome::Success);
    assert!(adult.is_suspended());
}

#[test]
fn adult_suspension_over_several_offenses() {
    let mut adult = person("15-11-1990");
    for month in 1..=3 {
        adult.record_offense(&format!("01-0{month}-2026"), 5);
    }
    assert_eq!(adult.record_offense("01-04-2026", 5), OffenseOutcome::Success);
    assert!(adult.is_suspended());
    assert_eq!(adult.demerit_total(), 20);
}

#[test]
fn under_twenty_one_is_suspended_above_six_points() {
    let mut junior = person("15-11-2008");
    junior.record_offense("01-01-2026", 3);
    assert!(!junior.is_suspended());
    junior.record_offense("01-02-2026", 3);
    assert!(!junior.is_suspended(), "exactly six points must not suspend");
    junior.record_offense("01-03-2026", 1);
    assert!(junior.is_suspended());
}

#[test]
fn twenty_one_year_old_uses_adult_limit() {
    let mut boundary = person("01-01-2005");
    boundary.record_offense("01-01-2026", 4);
    boundary.record_offense("01-02-2026", 4);
    assert!(!boundary.is_suspended());
}

#[test]
fn offenses_outside_two_year_window_do_not_count() {
    let mut junior = person("15-11-2008");
    assert_eq!(junior.record_offense("01-01-2019", 6), OffenseOutcome::Success);
    assert_eq!(junior.record_offense("19-10-2024", 6), OffenseOutcome::Success);
    assert_eq!(junior.record_offense("20-10-2024", 6), OffenseOutcome::Success);

    assert_eq!(junior.ledger().len(), 3);
    assert_eq!(junior.demerit_total(), 6);
    assert!(!junior.is_suspended());
}

#[test]
fn repeated_date_overwrites_previous_points() {
    let mut junior = person("15-11-2008");
    junior.record_offense("01-02-2026", 4);
    junior.record_offense("01-02-2026", 4);

    assert_eq!(junior.ledger().len(), 1);
    assert_eq!(junior.demerit_total(), 4);
    assert!(!junior.is_suspended());
}

#[test]
fn suspension_is_sticky() {
    let mut junior = person("15-11-2008");
    junior.record_offense("01-01-2026", 6);
    junior.record_offense("01-02-2026", 6);
    assert!(junior.is_suspended());

    // Lowering the total by overwriting does not lift the suspension.
    junior.record_offense("01-02-2026", 1);
    assert_eq!(junior.demerit_total(), 7);
    junior.record_offense("01-01-2026", 1);
    assert_eq!(junior.demerit_total(), 2);
    assert!(junior.is_suspended());

    assert_eq!(junior.record_offense("bad", 1), OffenseOutcome::Failed);
    assert!(junior.is_suspended());
}

#[test]
fn unparseable_birthdate_counts_as_age_zero() {
    let mut unknown_age = person("Addr");
    unknown_age.record_offense("01-01-2026", 4);
    unknown_age.record_offense("01-02-2026", 3);
    assert!(unknown_age.is_suspended());
}

#[test]
fn rolled_over_birthdate_uses_adult_limit() {
    // 31-02-2000 reads as 02-03-2000, so this person is 26.
    let mut rolled = person("31-02-2000");
    rolled.record_offense("01-01-2026", 4);
    rolled.record_offense("01-02-2026", 3);
    assert_eq!(rolled.demerit_total(), 7);
    assert!(!rolled.is_suspended());
}

#[test]
fn trailing_text_after_birth_year_is_ignored_for_age() {
    let mut trailing = person("15-11-2000xyz");
    trailing.record_offense("01-01-2026", 4);
    trailing.record_offense("01-02-2026", 3);
    assert!(!trailing.is_suspended());
}

#[test]
fn custom_policy_thresholds_apply() {
    let strict = SuspensionPolicy {
        age_boundary: 25,
        junior_limit: 2,
        senior_limit: 4,
    };
    let mut adult = person("15-11-1990").with_policy(strict);
    adult.record_offense("01-01-2026", 4);
    assert!(!adult.is_suspended());
    adult.record_offense("01-02-2026", 1);
    assert!(adult.is_suspended());
}

#[test]
fn suspension_is_not_written_to_the_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persons.txt");
    let store = FlatFilePersonStore::new(&path);

    let mut junior = person("15-11-2008");
    assert!(junior.create(&store));
    junior.record_offense("01-01-2026", 6);
    junior.record_offense("01-02-2026", 6);
    assert!(junior.is_suspended());

    assert!(fs::read_to_string(&path).unwrap().ends_with(",false\n"));
}

#[test]
fn fresh_person_starts_with_empty_ledger() {
    let mut first = person("15-11-2008");
    first.record_offense("01-01-2026", 6);

    let second = Person::with_clock(
        first.record().clone(),
        FixedClock::from_date_str("19-10-2026").unwrap(),
    );
    assert!(second.ledger().is_empty());
    assert_eq!(second.demerit_total(), 0);
}
