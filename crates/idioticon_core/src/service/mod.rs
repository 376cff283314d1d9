//! Glossary use-case services.
//!
//! # Responsibility
//! - Turn repository calls into the lookup/upsert/cascade semantics callers use.
//! - Keep renderers and the CLI decoupled from storage details.

pub mod term_store;
