//! Term domain model.
//!
//! # Responsibility
//! - Define the canonical glossary record and its alias link.
//! - Resolve display name/definition with alias fallbacks.
//! - Validate key/name/definition limits before persistence.
//!
//! # Invariants
//! - `key` is a non-empty slug (`[-A-Za-z0-9_]+`).
//! - `main_term` is a snapshot of a main term, never of another alias.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a term row.
pub type TermId = Uuid;

/// Default maximum length of `Term::key`.
pub const DEFAULT_KEY_LENGTH: usize = 255;
/// Default maximum length of `Term::name`.
pub const DEFAULT_TITLE_LENGTH: usize = 255;

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-A-Za-z0-9_]+$").expect("term key pattern is valid"));

/// Length limits applied by `Term::validate_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermLimits {
    pub key_length: usize,
    pub title_length: usize,
    /// `None` means the definition column is unbounded text.
    pub definition_length: Option<usize>,
}

impl Default for TermLimits {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            title_length: DEFAULT_TITLE_LENGTH,
            definition_length: None,
        }
    }
}

/// Validation failures for term write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermValidationError {
    NilId,
    EmptyKey,
    InvalidKey(String),
    KeyTooLong { length: usize, max: usize },
    NameTooLong { length: usize, max: usize },
    DefinitionTooLong { length: usize, max: usize },
    SelfReference(String),
}

impl Display for TermValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "term id must not be nil"),
            Self::EmptyKey => write!(f, "term key must not be empty"),
            Self::InvalidKey(key) => write!(
                f,
                "term key `{key}` must contain only letters, digits, `-` or `_`"
            ),
            Self::KeyTooLong { length, max } => {
                write!(f, "term key has {length} characters, max is {max}")
            }
            Self::NameTooLong { length, max } => {
                write!(f, "term name has {length} characters, max is {max}")
            }
            Self::DefinitionTooLong { length, max } => {
                write!(f, "term definition has {length} characters, max is {max}")
            }
            Self::SelfReference(key) => write!(f, "term `{key}` cannot be an alias of itself"),
        }
    }
}

impl Error for TermValidationError {}

/// Snapshot of the main term an alias points at.
///
/// Loaded together with the alias row, so fallbacks never hit storage again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainTermRef {
    pub id: TermId,
    pub key: String,
    pub name: String,
    pub definition: String,
}

impl MainTermRef {
    /// Main term display name, falling back to its key.
    pub fn get_name(&self) -> &str {
        if self.name.is_empty() {
            &self.key
        } else {
            &self.name
        }
    }

    pub fn get_definition(&self) -> &str {
        &self.definition
    }
}

impl From<&Term> for MainTermRef {
    fn from(term: &Term) -> Self {
        Self {
            id: term.id,
            key: term.key.clone(),
            name: term.name.clone(),
            definition: term.definition.clone(),
        }
    }
}

/// Glossary entry: either a main term or an alias of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    /// Unique slug used by templates and lookups.
    pub key: String,
    /// Display label; empty means "inherit".
    pub name: String,
    /// Free text; empty means "inherit".
    pub definition: String,
    /// Present only for aliases.
    pub main_term: Option<MainTermRef>,
}

impl Term {
    /// Creates a new main term with a generated id.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            name: name.into(),
            definition: definition.into(),
            main_term: None,
        }
    }

    /// Creates a new alias of `main`.
    ///
    /// `main` should already be a main term; callers resolve aliases first.
    pub fn new_alias(
        key: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
        main: &Term,
    ) -> Self {
        let mut term = Self::new(key, name, definition);
        term.main_term = Some(MainTermRef::from(main));
        term
    }

    pub fn is_main_term(&self) -> bool {
        self.main_term.is_none()
    }

    pub fn is_alias(&self) -> bool {
        !self.is_main_term()
    }

    /// Own name, else the main term's name (or key), else own key.
    pub fn get_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match &self.main_term {
            Some(main) => main.get_name(),
            None => &self.key,
        }
    }

    /// Own definition, else the main term's definition, else empty.
    pub fn get_definition(&self) -> &str {
        if !self.definition.is_empty() {
            return &self.definition;
        }
        match &self.main_term {
            Some(main) => main.get_definition(),
            None => "",
        }
    }

    /// Validates against default column limits.
    pub fn validate(&self) -> Result<(), TermValidationError> {
        self.validate_with(&TermLimits::default())
    }

    pub fn validate_with(&self, limits: &TermLimits) -> Result<(), TermValidationError> {
        if self.id.is_nil() {
            return Err(TermValidationError::NilId);
        }
        if self.key.is_empty() {
            return Err(TermValidationError::EmptyKey);
        }
        if !KEY_PATTERN.is_match(&self.key) {
            return Err(TermValidationError::InvalidKey(self.key.clone()));
        }

        let key_length = self.key.chars().count();
        if key_length > limits.key_length {
            return Err(TermValidationError::KeyTooLong {
                length: key_length,
                max: limits.key_length,
            });
        }

        let name_length = self.name.chars().count();
        if name_length > limits.title_length {
            return Err(TermValidationError::NameTooLong {
                length: name_length,
                max: limits.title_length,
            });
        }

        if let Some(max) = limits.definition_length {
            let definition_length = self.definition.chars().count();
            if definition_length > max {
                return Err(TermValidationError::DefinitionTooLong {
                    length: definition_length,
                    max,
                });
            }
        }

        if self
            .main_term
            .as_ref()
            .is_some_and(|main| main.id == self.id)
        {
            return Err(TermValidationError::SelfReference(self.key.clone()));
        }

        Ok(())
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.get_name())
    }
}
