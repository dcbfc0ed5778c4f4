//! Domain model for registry persons.
//!
//! # Responsibility
//! - Define the persisted person record and its line codec.
//! - Define the in-memory demerit ledger and suspension policy.
//!
//! # Invariants
//! - A record is identified by its `id` business key; the key is not
//!   enforced unique across file lines.
//! - Records are never deleted; updates replace one line in place.
//! - The demerit ledger is never persisted.

pub mod demerit;
pub mod person;
