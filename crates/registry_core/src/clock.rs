//! Reference-date source and age/window arithmetic.
//!
//! # Responsibility
//! - Supply "today" through an injectable `Clock`.
//! - Compute age in whole years and trailing-window membership.
//!
//! # Invariants
//! - `age` uses the day-of-year approximation: it subtracts one year when
//!   today's ordinal day precedes the birthdate's ordinal day. Around
//!   Feb 29 in leap years this can differ from a calendar-correct age.
//! - Birthdates are read leniently for age: out-of-range day and month
//!   values roll forward and text after the year is ignored. Only text
//!   with no `D-M-Y` number prefix has age `0`.

use crate::validation::parse_date;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static LENIENT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]+)-\s*([0-9]+)-\s*([0-9]+)").expect("valid lenient date regex")
});

/// Trailing window, in years, used for demerit totals.
pub const DEMERIT_WINDOW_YEARS: u32 = 2;

/// Injectable source of the current calendar date.
pub trait Clock {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date, for deterministic rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Builds a clock from `DD-MM-YYYY` text. Returns `None` for invalid dates.
    pub fn from_date_str(value: &str) -> Option<Self> {
        parse_date(value).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Age in years for a `DD-MM-YYYY` birthdate.
///
/// The birthdate is read with [`parse_birthdate_lenient`]; text that does
/// not read even leniently has age `0`.
pub fn age(birthdate: &str, today: NaiveDate) -> i32 {
    parse_birthdate_lenient(birthdate)
        .map(|birth| age_on(birth, today))
        .unwrap_or(0)
}

/// Reads `D-M-Y` numbers, rolling overflowing values forward.
///
/// `31-02-2000` is `02-03-2000`, `00-01-2000` is `31-12-1999` and
/// `15-11-2000xyz` is `15-11-2000`. Field validation stays strict; this
/// reading is only used to compute ages.
pub fn parse_birthdate_lenient(value: &str) -> Option<NaiveDate> {
    let caps = LENIENT_DATE_RE.captures(value)?;
    let day = caps[1].parse::<i64>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let year = caps[3].parse::<i32>().ok()?;

    let january = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let month_start = match month {
        0 => january.checked_sub_months(Months::new(1))?,
        _ => january.checked_add_months(Months::new(month - 1))?,
    };
    month_start.checked_add_signed(Duration::try_days(day - 1)?)
}

/// Age in years using the day-of-year approximation.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth.year();
    if today.ordinal() < birth.ordinal() {
        years -= 1;
    }
    years
}

/// Returns whether `date` is strictly after `today` minus `years`.
///
/// Subtracting from Feb 29 lands on Feb 28 of the target year.
pub fn within_trailing_window(date: NaiveDate, today: NaiveDate, years: u32) -> bool {
    match years
        .checked_mul(12)
        .and_then(|months| today.checked_sub_months(Months::new(months)))
    {
        Some(limit) => date > limit,
        None => true,
    }
}
