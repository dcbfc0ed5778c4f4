//! Person record model.
//!
//! # Responsibility
//! - Define the canonical person record shared by store, service and API.
//! - Own the comma-delimited line codec used by the flat-file store.
//!
//! # Invariants
//! - Field order on disk is `id,first_name,last_name,address,birthdate,suspended`.
//! - Fields are written verbatim. A comma inside a field corrupts the row;
//!   no escaping is applied.
//! - `validate()` must pass before a record is appended or written as an
//!   update candidate.

use crate::validation::{check_address, check_date, check_identifier, split_fields, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Number of comma-separated fields in a record line.
pub const RECORD_FIELD_COUNT: usize = 6;

/// One registered person as persisted in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Ten-character business key, e.g. `56s_d%&fAB`.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// `number|street|suburb|state|country`.
    pub address: String,
    /// `DD-MM-YYYY` text, kept as entered.
    pub birthdate: String,
    pub suspended: bool,
}

impl PersonRecord {
    /// Creates an unsuspended record. Does not validate.
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
            suspended: false,
        }
    }

    /// Validates identifier, address and birthdate, in that order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identifier(&self.id)?;
        check_address(&self.address)?;
        check_date(&self.birthdate)?;
        Ok(())
    }

    /// Serializes the record as one data-file line (no trailing newline).
    pub fn to_line(&self) -> String {
        [
            self.id.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.address.as_str(),
            self.birthdate.as_str(),
            if self.suspended { "true" } else { "false" },
        ]
        .join(",")
    }

    /// Parses one data-file line.
    ///
    /// Returns `None` when the line has fewer than six fields after
    /// trailing empty fields are dropped. Extra fields are ignored.
    pub fn from_line(line: &str) -> Option<Self> {
        let fields = split_fields(line, ',');
        if fields.len() < RECORD_FIELD_COUNT {
            return None;
        }

        Some(Self {
            id: fields[0].to_string(),
            first_name: fields[1].to_string(),
            last_name: fields[2].to_string(),
            address: fields[3].to_string(),
            birthdate: fields[4].to_string(),
            suspended: fields[5].eq_ignore_ascii_case("true"),
        })
    }
}

impl Display for PersonRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::PersonRecord;

    #[test]
    fn from_line_requires_six_fields() {
        assert!(PersonRecord::from_line("a,b,c,d,e").is_none());
        assert!(PersonRecord::from_line("a,b,c,d,e,").is_none());
        assert!(PersonRecord::from_line("").is_none());
    }

    #[test]
    fn from_line_reads_suspended_case_insensitively() {
        let record = PersonRecord::from_line("id,f,l,addr,01-01-2000,TRUE").unwrap();
        assert!(record.suspended);
        let record = PersonRecord::from_line("id,f,l,addr,01-01-2000,yes").unwrap();
        assert!(!record.suspended);
    }

    #[test]
    fn comma_inside_field_shifts_columns() {
        let record = PersonRecord::from_line("id,John,Doe,1|Main, St|x|Victoria|AU,01-01-2000,false")
            .expect("seven fields still parse");
        assert_eq!(record.address, "1|Main");
        assert_eq!(record.birthdate, " St|x|Victoria|AU");
    }
}
