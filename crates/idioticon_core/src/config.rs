//! Glossary configuration.
//!
//! # Responsibility
//! - Merge user settings over defaults into a validated `IdioticonConfig`.
//! - Map the configured theme name to its icon recipe.
//! - Turn the definition storage option into write-path length limits.
//!
//! # Invariants
//! - An unknown theme name is a configuration error, never a silent fallback.
//! - Length options must be positive.

use crate::model::term::{TermLimits, DEFAULT_KEY_LENGTH, DEFAULT_TITLE_LENGTH};
use crate::render::theme::{theme_names, Theme, DEFAULT_THEME};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_CACHE: &str = "default";
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "term-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownTheme(String),
    InvalidTextField(String),
    ZeroLength(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTheme(name) => write!(
                f,
                "the idioticon theme is not valid: `{name}`; expected one of {}",
                theme_names().join("|")
            ),
            Self::InvalidTextField(value) => write!(
                f,
                "invalid TEXT_FIELD `{value}`; expected `text` or `char:<max_length>`"
            ),
            Self::ZeroLength(field) => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

/// Storage type of the `definition` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefinitionStorage {
    /// Unbounded text.
    #[default]
    Text,
    /// Bounded character field.
    Char { max_length: usize },
}

impl FromStr for DefinitionStorage {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() || normalized == "text" {
            return Ok(Self::Text);
        }

        let max_length = normalized
            .strip_prefix("char:")
            .and_then(|length| length.trim().parse::<usize>().ok())
            .ok_or_else(|| ConfigError::InvalidTextField(value.to_string()))?;
        if max_length == 0 {
            return Err(ConfigError::ZeroLength("TEXT_FIELD"));
        }
        Ok(Self::Char { max_length })
    }
}

/// Raw settings as supplied by the host; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct IdioticonSettings {
    pub text_field: Option<String>,
    pub key_length: Option<usize>,
    pub title_length: Option<usize>,
    pub cache: Option<String>,
    pub cache_key_prefix: Option<String>,
    pub theme: Option<String>,
    pub context_loader: Option<String>,
}

/// Effective configuration after merging settings over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdioticonConfig {
    pub definition_storage: DefinitionStorage,
    pub key_length: usize,
    pub title_length: usize,
    /// Name of the host cache backend; carried, not used by core.
    pub cache: String,
    pub cache_key_prefix: String,
    pub theme: Theme,
    /// Host hook identifier; carried, not used by core.
    pub context_loader: String,
}

impl Default for IdioticonConfig {
    fn default() -> Self {
        Self {
            definition_storage: DefinitionStorage::Text,
            key_length: DEFAULT_KEY_LENGTH,
            title_length: DEFAULT_TITLE_LENGTH,
            cache: DEFAULT_CACHE.to_string(),
            cache_key_prefix: DEFAULT_CACHE_KEY_PREFIX.to_string(),
            theme: Theme::plain(),
            context_loader: String::new(),
        }
    }
}

impl IdioticonConfig {
    /// Merges `settings` over defaults.
    ///
    /// # Errors
    /// - `UnknownTheme` when `THEME` names no known theme.
    /// - `InvalidTextField` / `ZeroLength` for malformed length options.
    pub fn from_settings(settings: IdioticonSettings) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let theme_name = settings.theme.as_deref().unwrap_or(DEFAULT_THEME);
        let theme = Theme::by_name(theme_name)
            .ok_or_else(|| ConfigError::UnknownTheme(theme_name.to_string()))?;

        let definition_storage = match settings.text_field.as_deref() {
            Some(value) => value.parse()?,
            None => defaults.definition_storage,
        };

        let key_length = positive(settings.key_length, defaults.key_length, "KEY_LENGTH")?;
        let title_length = positive(settings.title_length, defaults.title_length, "TITLE_LENGTH")?;

        Ok(Self {
            definition_storage,
            key_length,
            title_length,
            cache: settings.cache.unwrap_or(defaults.cache),
            cache_key_prefix: settings.cache_key_prefix.unwrap_or(defaults.cache_key_prefix),
            theme,
            context_loader: settings.context_loader.unwrap_or(defaults.context_loader),
        })
    }

    /// Write-path limits derived from the configured column sizes.
    pub fn term_limits(&self) -> TermLimits {
        TermLimits {
            key_length: self.key_length,
            title_length: self.title_length,
            definition_length: match self.definition_storage {
                DefinitionStorage::Text => None,
                DefinitionStorage::Char { max_length } => Some(max_length),
            },
        }
    }

    /// Cache key the host should use for a term.
    pub fn cache_key(&self, term_key: &str) -> String {
        format!("{}{term_key}", self.cache_key_prefix)
    }
}

fn positive(value: Option<usize>, default: usize, field: &'static str) -> Result<usize, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::ZeroLength(field)),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}
