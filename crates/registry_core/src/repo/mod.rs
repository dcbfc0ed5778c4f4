//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the person store contract used by services.
//! - Isolate data-file parsing and writing from business rules.
//!
//! # Invariants
//! - Append paths must enforce `PersonRecord::validate()` before writing.
//! - Repository APIs return semantic errors (`NotFound`, `MissingFile`) in
//!   addition to I/O errors.

pub mod person_repo;
