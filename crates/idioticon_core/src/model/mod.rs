//! Glossary domain model.
//!
//! # Responsibility
//! - Define the term record shared by storage, service and rendering layers.
//! - Own the name/definition fallback rules for aliases.
//!
//! # Invariants
//! - Every term is identified by a stable `TermId` and a unique slug `key`.
//! - An alias points at exactly one main term; resolution is never transitive.

pub mod term;
