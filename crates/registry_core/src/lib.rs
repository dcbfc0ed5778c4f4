//! Core domain logic for the person registry.
//! This crate is the single source of truth for record validation, the
//! conditional-update rules, and demerit-based suspension.

pub mod api;
pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use api::Person;
pub use clock::{age, within_trailing_window, Clock, FixedClock, SystemClock};
pub use config::RegistryConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::demerit::{DemeritLedger, OffenseError, OffenseOutcome, SuspensionPolicy};
pub use model::person::PersonRecord;
pub use repo::person_repo::{FlatFilePersonStore, PersonStore, RepoError, RepoResult, StoredLine};
pub use service::person_service::{PersonService, PersonServiceError};
pub use service::update_rules::{evaluate_update, RuleViolation, UpdateProposal, UpdateRejection};
pub use validation::{valid_address, valid_date, valid_identifier, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
