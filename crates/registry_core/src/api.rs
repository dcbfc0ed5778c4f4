//! Caller-facing person API with sentinel results.
//!
//! # Responsibility
//! - Expose create/update/offense/suspension operations on one person value.
//! - Collapse internal error causes into `bool` / `OffenseOutcome` results.
//!
//! # Invariants
//! - Public functions never panic and never return internal error types.
//! - The demerit ledger belongs to this value only; it is never persisted,
//!   and a `Person` rebuilt from the data file starts with an empty ledger.
//! - Suspension is sticky for the lifetime of the value.

use crate::clock::{age, Clock, SystemClock, DEMERIT_WINDOW_YEARS};
use crate::model::demerit::{DemeritLedger, OffenseError, OffenseOutcome, SuspensionPolicy};
use crate::model::person::PersonRecord;
use crate::repo::person_repo::PersonStore;
use crate::service::person_service::PersonService;
use crate::service::update_rules::UpdateProposal;
use log::info;

/// One person plus the in-memory demerit state attached to it.
#[derive(Debug, Clone)]
pub struct Person<C: Clock = SystemClock> {
    record: PersonRecord,
    ledger: DemeritLedger,
    policy: SuspensionPolicy,
    clock: C,
}

impl Person<SystemClock> {
    /// Creates an unsuspended person using the system clock.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        birthdate: impl Into<String>,
    ) -> Self {
        Self::from_record(PersonRecord::new(
            id, first_name, last_name, address, birthdate,
        ))
    }

    /// Wraps an existing record (for example one loaded from the store).
    pub fn from_record(record: PersonRecord) -> Self {
        Self::with_clock(record, SystemClock)
    }
}

impl<C: Clock> Person<C> {
    pub fn with_clock(record: PersonRecord, clock: C) -> Self {
        Self {
            record,
            ledger: DemeritLedger::new(),
            policy: SuspensionPolicy::default(),
            clock,
        }
    }

    /// Replaces the default 21 / 6 / 12 suspension thresholds.
    pub fn with_policy(mut self, policy: SuspensionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn record(&self) -> &PersonRecord {
        &self.record
    }

    pub fn ledger(&self) -> &DemeritLedger {
        &self.ledger
    }

    /// Validates this person's fields and appends them to `store`.
    ///
    /// Returns `false` on any validation or I/O failure.
    pub fn create<S: PersonStore>(&self, store: &S) -> bool {
        PersonService::new(store, &self.clock)
            .create(&self.record)
            .is_ok()
    }

    /// Applies new field values to the stored line for this person's id.
    ///
    /// Returns `false` when the file is missing, the id is not stored, an
    /// update rule refuses the change, a new value fails validation, or I/O
    /// fails. On success the in-memory record follows the written one,
    /// keeping its in-memory suspension flag: later updates look up the new
    /// identifier and later offenses use the new birthdate for age.
    pub fn update<S: PersonStore>(
        &mut self,
        store: &S,
        new_id: &str,
        new_first_name: &str,
        new_last_name: &str,
        new_address: &str,
        new_birthdate: &str,
    ) -> bool {
        let proposal = UpdateProposal::new(
            new_id,
            new_first_name,
            new_last_name,
            new_address,
            new_birthdate,
        );
        let result = PersonService::new(store, &self.clock).update(&self.record.id, proposal);

        match result {
            Ok(updated) => {
                let suspended = self.record.suspended;
                self.record = updated;
                self.record.suspended = suspended;
                true
            }
            Err(_) => false,
        }
    }

    /// Records `points` for `offense_date` (`DD-MM-YYYY`) and re-evaluates
    /// suspension.
    ///
    /// Returns `Failed` for an invalid date or points outside `1..=6`;
    /// otherwise `Success`, whether or not suspension was triggered.
    pub fn record_offense(&mut self, offense_date: &str, points: i32) -> OffenseOutcome {
        if let Err(err) = self.ledger.upsert(offense_date, points) {
            info!(
                "event=demerit_record module=api status=rejected id={} reason={}",
                self.record.id,
                offense_error_code(&err)
            );
            return OffenseOutcome::Failed;
        }

        let today = self.clock.today();
        let total = self.ledger.total_within(today, DEMERIT_WINDOW_YEARS);
        let person_age = age(&self.record.birthdate, today);

        if !self.record.suspended && self.policy.should_suspend(person_age, total) {
            self.record.suspended = true;
            info!(
                "event=person_suspended module=api status=ok id={} total_points={} limit={}",
                self.record.id,
                total,
                self.policy.limit_for_age(person_age)
            );
        }

        OffenseOutcome::Success
    }

    /// Points inside the trailing two-year window as of today.
    pub fn demerit_total(&self) -> u32 {
        self.ledger
            .total_within(self.clock.today(), DEMERIT_WINDOW_YEARS)
    }

    pub fn is_suspended(&self) -> bool {
        self.record.suspended
    }
}

fn offense_error_code(err: &OffenseError) -> &'static str {
    match err {
        OffenseError::InvalidDate(_) => "invalid_date",
        OffenseError::PointsOutOfRange(_) => "points_out_of_range",
    }
}
