//! Field validators for person records.
//!
//! # Responsibility
//! - Provide pure predicates for identifier, address and date formats.
//! - Provide `check_*` variants that name the failing rule for diagnostics.
//!
//! # Invariants
//! - Validators never panic and never fail on malformed input; they only
//!   reject it.
//! - Date parsing is strict: out-of-range days/months never roll over.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted birthdate/offense date format (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";
/// Region every registered address must belong to.
pub const REQUIRED_STATE: &str = "Victoria";

const IDENTIFIER_LEN: usize = 10;
const IDENTIFIER_MIN_SPECIAL_CHARS: usize = 2;
const ADDRESS_COMPONENTS: usize = 5;
const ADDRESS_STATE_INDEX: usize = 3;

static IDENTIFIER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[2-9]{2}$").expect("valid identifier prefix regex"));
static IDENTIFIER_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid identifier suffix regex"));

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier does not have exactly ten characters.
    IdentifierLength { len: usize },
    /// Characters 0-1 are not both digits in `2..=9`.
    IdentifierPrefix(String),
    /// Characters 2-7 hold fewer than two special characters.
    IdentifierSpecialChars { found: usize },
    /// Characters 8-9 are not both uppercase `A-Z`.
    IdentifierSuffix(String),
    /// Address does not have exactly five `|`-separated components.
    AddressComponents { count: usize },
    /// Address state component is not the required region.
    AddressState(String),
    /// Date text is not a real `DD-MM-YYYY` calendar date.
    InvalidDate(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentifierLength { len } => {
                write!(f, "identifier must have {IDENTIFIER_LEN} characters, got {len}")
            }
            Self::IdentifierPrefix(prefix) => {
                write!(f, "identifier must start with two digits 2-9, got `{prefix}`")
            }
            Self::IdentifierSpecialChars { found } => write!(
                f,
                "identifier characters 3-8 need at least {IDENTIFIER_MIN_SPECIAL_CHARS} special characters, found {found}"
            ),
            Self::IdentifierSuffix(suffix) => {
                write!(f, "identifier must end with two uppercase letters, got `{suffix}`")
            }
            Self::AddressComponents { count } => write!(
                f,
                "address must have {ADDRESS_COMPONENTS} `|`-separated components, got {count}"
            ),
            Self::AddressState(state) => {
                write!(f, "address state must be {REQUIRED_STATE}, got `{state}`")
            }
            Self::InvalidDate(value) => write!(f, "invalid DD-MM-YYYY date `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Returns whether `id` is a well-formed person identifier.
pub fn valid_identifier(id: &str) -> bool {
    check_identifier(id).is_ok()
}

/// Returns whether `address` is a well-formed in-state address.
pub fn valid_address(address: &str) -> bool {
    check_address(address).is_ok()
}

/// Returns whether `value` is a strict `DD-MM-YYYY` calendar date.
pub fn valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Checks the identifier format rules in order: length, prefix, special
/// characters, suffix.
pub fn check_identifier(id: &str) -> Result<(), ValidationError> {
    let chars = id.chars().collect::<Vec<_>>();
    if chars.len() != IDENTIFIER_LEN {
        return Err(ValidationError::IdentifierLength { len: chars.len() });
    }

    let prefix = chars[..2].iter().collect::<String>();
    if !IDENTIFIER_PREFIX_RE.is_match(&prefix) {
        return Err(ValidationError::IdentifierPrefix(prefix));
    }

    let found = chars[2..8]
        .iter()
        .filter(|ch| is_special_char(**ch))
        .count();
    if found < IDENTIFIER_MIN_SPECIAL_CHARS {
        return Err(ValidationError::IdentifierSpecialChars { found });
    }

    let suffix = chars[8..].iter().collect::<String>();
    if !IDENTIFIER_SUFFIX_RE.is_match(&suffix) {
        return Err(ValidationError::IdentifierSuffix(suffix));
    }

    Ok(())
}

/// Checks `number|street|suburb|state|country` shape and the state rule.
pub fn check_address(address: &str) -> Result<(), ValidationError> {
    let parts = split_fields(address, '|');
    if parts.len() != ADDRESS_COMPONENTS {
        return Err(ValidationError::AddressComponents { count: parts.len() });
    }

    let state = parts[ADDRESS_STATE_INDEX];
    if !state.eq_ignore_ascii_case(REQUIRED_STATE) {
        return Err(ValidationError::AddressState(state.to_string()));
    }

    Ok(())
}

/// Checks that `value` is a strict `DD-MM-YYYY` date.
pub fn check_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

/// Parses a strict `DD-MM-YYYY` date.
///
/// Returns `None` for non-numeric text, out-of-range day/month, and
/// non-existent dates such as `31-04-2024` or `29-02-2023`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Splits `value` on `separator`, dropping trailing empty components.
///
/// An empty input yields one empty component, so `""` counts as a single
/// field rather than none.
pub(crate) fn split_fields(value: &str, separator: char) -> Vec<&str> {
    if value.is_empty() {
        return vec![value];
    }
    let mut parts = value.split(separator).collect::<Vec<_>>();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}

// Anything outside `[A-Za-z0-9_]` counts as special; underscore does not.
fn is_special_char(ch: char) -> bool {
    !(ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::{is_special_char, split_fields};

    #[test]
    fn split_fields_drops_trailing_empty_components() {
        assert_eq!(split_fields("a|b||", '|'), vec!["a", "b"]);
        assert_eq!(split_fields("|a", '|'), vec!["", "a"]);
        assert_eq!(split_fields("a||b", '|'), vec!["a", "", "b"]);
    }

    #[test]
    fn split_fields_keeps_single_component_for_empty_input() {
        assert_eq!(split_fields("", ','), vec![""]);
        assert!(split_fields(",,,", ',').is_empty());
    }

    #[test]
    fn underscore_is_not_special() {
        assert!(!is_special_char('_'));
        assert!(!is_special_char('q'));
        assert!(is_special_char('%'));
        assert!(is_special_char('é'));
    }
}
