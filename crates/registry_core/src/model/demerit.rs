//! Demerit ledger and suspension policy.
//!
//! # Responsibility
//! - Hold one person's offense-date to point mapping.
//! - Sum points inside the trailing window and apply age-based limits.
//!
//! # Invariants
//! - Points are within `1..=6`.
//! - One entry per calendar date; recording the same date again replaces
//!   the previous points instead of adding to them.
//! - The ledger lives in memory only and starts empty for every instance.

use crate::clock::within_trailing_window;
use crate::validation::{parse_date, ValidationError};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_POINTS: i32 = 1;
pub const MAX_POINTS: i32 = 6;

/// Two-valued result of recording an offense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffenseOutcome {
    Success,
    Failed,
}

impl OffenseOutcome {
    /// Stable text form: `Success` or `Failed`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl Display for OffenseOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an offense was not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffenseError {
    InvalidDate(ValidationError),
    PointsOutOfRange(i32),
}

impl Display for OffenseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::PointsOutOfRange(points) => write!(
                f,
                "demerit points must be within {MIN_POINTS}..={MAX_POINTS}, got {points}"
            ),
        }
    }
}

impl Error for OffenseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::PointsOutOfRange(_) => None,
        }
    }
}

impl From<ValidationError> for OffenseError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidDate(value)
    }
}

/// Offense date to demerit points, for one person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemeritLedger {
    entries: BTreeMap<NaiveDate, u8>,
}

impl DemeritLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `points` on the `DD-MM-YYYY` date `offense_date`.
    ///
    /// The date is checked before the points. An existing entry for the same
    /// calendar date is overwritten, whatever its spelling: `1-1-2026` and
    /// `01-01-2026` share one entry.
    ///
    /// # Errors
    /// - `InvalidDate` when the date is not a strict `DD-MM-YYYY` date.
    /// - `PointsOutOfRange` when points fall outside `1..=6`.
    pub fn upsert(&mut self, offense_date: &str, points: i32) -> Result<NaiveDate, OffenseError> {
        let date = parse_date(offense_date)
            .ok_or_else(|| ValidationError::InvalidDate(offense_date.to_string()))?;
        let points = match u8::try_from(points) {
            Ok(value) if (MIN_POINTS..=MAX_POINTS).contains(&points) => value,
            _ => return Err(OffenseError::PointsOutOfRange(points)),
        };

        self.entries.insert(date, points);
        Ok(date)
    }

    /// Sums points for entries strictly inside the trailing `years` window.
    pub fn total_within(&self, today: NaiveDate, years: u32) -> u32 {
        self.entries
            .iter()
            .filter(|(date, _)| within_trailing_window(**date, today, years))
            .map(|(_, points)| u32::from(*points))
            .sum()
    }

    /// Points recorded for one date, if any.
    pub fn points_on(&self, date: NaiveDate) -> Option<u8> {
        self.entries.get(&date).copied()
    }

    /// Entries in ascending date order.
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, u8)> + '_ {
        self.entries.iter().map(|(date, points)| (*date, *points))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Age-dependent demerit limits.
///
/// Persons younger than `age_boundary` are suspended above `junior_limit`
/// points; everyone else above `senior_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspensionPolicy {
    pub age_boundary: i32,
    pub junior_limit: u32,
    pub senior_limit: u32,
}

impl Default for SuspensionPolicy {
    fn default() -> Self {
        Self {
            age_boundary: 21,
            junior_limit: 6,
            senior_limit: 12,
        }
    }
}

impl SuspensionPolicy {
    /// Highest total that does not trigger suspension at `age`.
    pub fn limit_for_age(&self, age: i32) -> u32 {
        if age < self.age_boundary {
            self.junior_limit
        } else {
            self.senior_limit
        }
    }

    pub fn should_suspend(&self, age: i32, total_points: u32) -> bool {
        total_points > self.limit_for_age(age)
    }
}
