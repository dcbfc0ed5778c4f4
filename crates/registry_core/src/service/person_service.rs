//! Person use-case service.
//!
//! # Responsibility
//! - Provide create/update/find/list entry points over a `PersonStore`.
//! - Run the update rule engine against the stored line and persist the
//!   accepted candidate.
//!
//! # Invariants
//! - Update never writes partially: either the whole file is rewritten with
//!   the matched line replaced, or nothing is written.
//! - Only the first record line with the current identifier is considered.
//! - A missing data file fails an update but is an empty registry for reads.

use crate::clock::Clock;
use crate::model::person::PersonRecord;
use crate::repo::person_repo::{PersonStore, RepoError, RepoResult, StoredLine};
use crate::service::update_rules::{evaluate_update, RuleViolation, UpdateProposal, UpdateRejection};
use crate::validation::ValidationError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for person use-cases.
#[derive(Debug)]
pub enum PersonServiceError {
    /// A field failed format validation.
    Validation(ValidationError),
    /// An update business rule refused the change.
    Rule(RuleViolation),
    /// Persistence-layer failure, including not-found.
    Repo(RepoError),
}

impl PersonServiceError {
    /// Stable reason code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Rule(rule) => rule.code(),
            Self::Repo(RepoError::NotFound(_)) => "not_found",
            Self::Repo(RepoError::MissingFile) => "missing_file",
            Self::Repo(RepoError::Validation(_)) => "validation",
            Self::Repo(RepoError::Io { .. }) => "io",
        }
    }
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Rule(rule) => write!(f, "{rule}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Rule(rule) => Some(rule),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for PersonServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<UpdateRejection> for PersonServiceError {
    fn from(value: UpdateRejection) -> Self {
        match value {
            UpdateRejection::Rule(rule) => Self::Rule(rule),
            UpdateRejection::Validation(err) => Self::Validation(err),
        }
    }
}

/// Person service facade over a store and a clock.
pub struct PersonService<S: PersonStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: PersonStore, C: Clock> PersonService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Validates and appends a new record.
    pub fn create(&self, record: &PersonRecord) -> Result<(), PersonServiceError> {
        match self.store.append(record) {
            Ok(()) => {
                info!("event=person_create module=service status=ok id={}", record.id);
                Ok(())
            }
            Err(err) => {
                let err = PersonServiceError::from(err);
                info!(
                    "event=person_create module=service status=rejected id={} reason={}",
                    record.id,
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Applies `proposal` to the first record whose identifier is `current_id`.
    ///
    /// Returns the record as written on success.
    ///
    /// # Errors
    /// - `Repo(MissingFile)` when the data file does not exist.
    /// - `Repo(NotFound)` when no record line has `current_id`.
    /// - `Rule` / `Validation` when the rule engine refuses the proposal.
    /// - `Repo(Io)` when reading or rewriting the file fails.
    pub fn update(
        &self,
        current_id: &str,
        proposal: UpdateProposal,
    ) -> Result<PersonRecord, PersonServiceError> {
        let result = self.update_inner(current_id, proposal);
        match &result {
            Ok(updated) => info!(
                "event=person_update module=service status=ok id={} new_id={}",
                current_id, updated.id
            ),
            Err(PersonServiceError::Repo(RepoError::Io { .. })) => warn!(
                "event=person_update module=service status=error id={} reason=io",
                current_id
            ),
            Err(err) => info!(
                "event=person_update module=service status=rejected id={} reason={}",
                current_id,
                err.code()
            ),
        }
        result
    }

    fn update_inner(
        &self,
        current_id: &str,
        proposal: UpdateProposal,
    ) -> Result<PersonRecord, PersonServiceError> {
        if !self.store.exists() {
            return Err(RepoError::MissingFile.into());
        }

        let mut lines = self.store.load_all()?;
        let position = lines
            .iter()
            .position(|line| line.record().is_some_and(|record| record.id == current_id))
            .ok_or_else(|| RepoError::NotFound(current_id.to_string()))?;

        let stored = lines[position]
            .record()
            .ok_or_else(|| RepoError::NotFound(current_id.to_string()))?;
        let candidate = evaluate_update(stored, proposal, self.clock.today())?;

        lines[position] = StoredLine::from_record(candidate.clone());
        self.store.rewrite_all(&lines)?;
        Ok(candidate)
    }

    /// First record with identifier `id`.
    pub fn find(&self, id: &str) -> RepoResult<Option<PersonRecord>> {
        self.store.find_by_id(id)
    }

    /// All record lines in file order, skipping non-record lines.
    pub fn list(&self) -> RepoResult<Vec<PersonRecord>> {
        Ok(self
            .store
            .load_all()?
            .into_iter()
            .filter_map(|line| match line {
                StoredLine::Record { record, .. } => Some(record),
                StoredLine::Other(_) => None,
            })
            .collect())
    }
}
