//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the term store is written against.
//! - Isolate SQLite query details from alias/CRUD semantics.
//!
//! # Invariants
//! - Repository writes must enforce `Term::validate_with()` before persistence.
//! - Storage errors propagate unchanged inside `TermError::Db`.

pub mod term_repo;
