//! Conditional-update policy for stored person records.
//!
//! # Responsibility
//! - Decide whether a proposed change to a stored record is allowed.
//! - Produce the candidate record that replaces the stored line.
//!
//! # Invariants
//! - Rules run in a fixed order: DOB exclusivity, minor address lock,
//!   even-identifier lock, then field validation. The first failure wins.
//! - Minor status comes from the proposed birthdate; identifier parity
//!   comes from the stored identifier.
//! - The candidate is built from the proposed values only and starts
//!   unsuspended.

use crate::clock::age;
use crate::model::person::PersonRecord;
use crate::validation::ValidationError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Below this age an address cannot change.
pub const ADULT_AGE: i32 = 18;

/// Proposed replacement values for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProposal {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub birthdate: String,
}

impl UpdateProposal {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        birthdate: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            birthdate: birthdate.into(),
        }
    }

    /// Proposal that keeps every field of `record`.
    pub fn unchanged(record: &PersonRecord) -> Self {
        Self::new(
            record.id.clone(),
            record.first_name.clone(),
            record.last_name.clone(),
            record.address.clone(),
            record.birthdate.clone(),
        )
    }

    fn into_candidate(self) -> PersonRecord {
        PersonRecord::new(
            self.id,
            self.first_name,
            self.last_name,
            self.address,
            self.birthdate,
        )
    }
}

/// Business rule that blocked an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    /// Birthdate changed together with another field.
    DobChangeNotExclusive,
    /// Address changed for a person under 18.
    MinorAddressLocked,
    /// Identifier changed while the stored identifier starts with an even digit.
    EvenIdentifierLocked,
}

impl RuleViolation {
    /// Stable reason code used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::DobChangeNotExclusive => "dob_change_not_exclusive",
            Self::MinorAddressLocked => "minor_address_locked",
            Self::EvenIdentifierLocked => "even_identifier_locked",
        }
    }
}

impl Display for RuleViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DobChangeNotExclusive => {
                f.write_str("birthdate can only be changed on its own")
            }
            Self::MinorAddressLocked => f.write_str("address cannot change for persons under 18"),
            Self::EvenIdentifierLocked => {
                f.write_str("identifier starting with an even digit cannot change")
            }
        }
    }
}

impl Error for RuleViolation {}

/// Why `evaluate_update` refused a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRejection {
    Rule(RuleViolation),
    Validation(ValidationError),
}

impl Display for UpdateRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rule(rule) => write!(f, "{rule}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UpdateRejection {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<RuleViolation> for UpdateRejection {
    fn from(value: RuleViolation) -> Self {
        Self::Rule(value)
    }
}

impl From<ValidationError> for UpdateRejection {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Evaluates `proposal` against the `stored` record as of `today`.
///
/// Returns the validated candidate record on acceptance.
pub fn evaluate_update(
    stored: &PersonRecord,
    proposal: UpdateProposal,
    today: NaiveDate,
) -> Result<PersonRecord, UpdateRejection> {
    let changing_dob = stored.birthdate != proposal.birthdate;
    let is_minor = age(&proposal.birthdate, today) < ADULT_AGE;
    let id_starts_even = starts_with_even_digit(&stored.id);

    let id_changed = stored.id != proposal.id;
    let address_changed = stored.address != proposal.address;

    if changing_dob
        && (stored.first_name != proposal.first_name
            || stored.last_name != proposal.last_name
            || address_changed
            || id_changed)
    {
        return Err(RuleViolation::DobChangeNotExclusive.into());
    }

    if !changing_dob && is_minor && address_changed {
        return Err(RuleViolation::MinorAddressLocked.into());
    }

    if !changing_dob && id_starts_even && id_changed {
        return Err(RuleViolation::EvenIdentifierLocked.into());
    }

    let candidate = proposal.into_candidate();
    candidate.validate()?;
    Ok(candidate)
}

/// Whether the first character reads as an even number.
///
/// Letters count by their base-36 value (`a` = 10, so even); any other
/// character, or an empty identifier, counts as odd.
pub fn starts_with_even_digit(id: &str) -> bool {
    id.chars()
        .next()
        .and_then(|ch| ch.to_digit(36))
        .is_some_and(|value| value % 2 == 0)
}
