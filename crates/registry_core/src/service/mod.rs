//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into create/update use-cases.
//! - Hold the conditional-update rule engine.
//!
//! # Invariants
//! - Service APIs never bypass store validation on append.
//! - Rule evaluation is pure; only `PersonService` touches the store.

pub mod person_service;
pub mod update_rules;
