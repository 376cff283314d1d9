//! Core glossary logic for idioticon.
//! Terms, aliases and their lookup rules live here; front ends stay thin.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DefinitionStorage, IdioticonConfig, IdioticonSettings};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::term::{MainTermRef, Term, TermId, TermLimits, TermValidationError};
pub use render::tags::{
    load_terms, parse_load_terms, render_term, render_term_tag, LoadTermsBinding, TagSyntaxError,
};
pub use render::theme::Theme;
pub use repo::term_repo::{
    SqliteTermRepository, TermError, TermKind, TermListQuery, TermRepository, TermResult,
};
pub use service::term_store::{TermKey, TermStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
