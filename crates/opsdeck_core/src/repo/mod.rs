//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entity access contract used by services and HTTP handlers.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Repository writes must pass schema validation before persistence.
//! - Repository APIs return semantic errors (`Conflict`, `NotFound`) in
//!   addition to DB transport errors.

pub mod entity_repo;
