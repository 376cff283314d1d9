//! Template tag helpers: term tooltips and `load_terms` bindings.

use super::escape_html;
use super::theme::Theme;
use crate::model::term::Term;
use crate::repo::term_repo::{TermRepository, TermResult};
use crate::service::term_store::TermStore;
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LOAD_TERMS_TAG: &str = "load_terms";

/// Malformed `load_terms` tag contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSyntaxError {
    MissingAs(String),
    CountMismatch { keys: usize, variables: usize },
    UnexpectedTag(String),
}

impl Display for TagSyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAs(contents) => write!(
                f,
                "`load_terms` requires `*terms as *variables` (got `{contents}`)"
            ),
            Self::CountMismatch { keys, variables } => write!(
                f,
                "`load_terms` got {keys} term keys but {variables} variables"
            ),
            Self::UnexpectedTag(tag) => write!(f, "expected `load_terms` tag, got `{tag}`"),
        }
    }
}

impl Error for TagSyntaxError {}

/// One `key as variable` pair from a `load_terms` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTermsBinding {
    pub variable: String,
    pub key: String,
}

/// Renders the tooltip markup for an already resolved term.
pub fn render_term(term: &Term, theme: &Theme) -> String {
    format!(
        r#"<{wrapper} class="idioticon idioticon-{theme_name}" data-term="{key}" title="{name}" data-content="{definition}">{icon}</{wrapper}>"#,
        wrapper = theme.wrapper,
        theme_name = escape_html(&theme.name),
        key = escape_html(&term.key),
        name = escape_html(term.get_name()),
        definition = escape_html(term.get_definition()),
        icon = theme.icon_html(),
    )
}

/// Resolves `key` softly and renders its tooltip.
///
/// Unknown keys and lookup failures render as an empty string.
pub fn render_term_tag<R: TermRepository>(
    store: &TermStore<R>,
    key: &str,
    theme: &Theme,
) -> String {
    match store.lookup(key) {
        Ok(Some(term)) => render_term(&term, theme),
        Ok(None) => String::new(),
        Err(err) => {
            warn!("event=term_tag module=render status=error key={key} error={err}");
            String::new()
        }
    }
}

/// Parses `load_terms 'a' 'b' as first second` into bindings.
///
/// Quotes around keys are optional.
pub fn parse_load_terms(contents: &str) -> Result<Vec<LoadTermsBinding>, TagSyntaxError> {
    let args: Vec<&str> = contents.split_whitespace().collect();
    match args.first().copied() {
        Some(tag) if tag == LOAD_TERMS_TAG => {}
        Some(other) => return Err(TagSyntaxError::UnexpectedTag(other.to_string())),
        None => return Err(TagSyntaxError::MissingAs(contents.to_string())),
    }

    let as_index = args
        .iter()
        .position(|arg| *arg == "as")
        .ok_or_else(|| TagSyntaxError::MissingAs(contents.to_string()))?;

    let keys = &args[1..as_index];
    let variables = &args[as_index + 1..];
    if keys.len() != variables.len() {
        return Err(TagSyntaxError::CountMismatch {
            keys: keys.len(),
            variables: variables.len(),
        });
    }

    Ok(keys
        .iter()
        .zip(variables)
        .map(|(key, variable)| LoadTermsBinding {
            variable: (*variable).to_string(),
            key: strip_quotes(key).to_string(),
        })
        .collect())
}

/// Resolves each binding softly into `variable -> term`.
pub fn load_terms<R: TermRepository>(
    store: &TermStore<R>,
    bindings: &[LoadTermsBinding],
) -> TermResult<BTreeMap<String, Option<Term>>> {
    let mut context = BTreeMap::new();
    for binding in bindings {
        let term = store.lookup(binding.key.as_str())?;
        context.insert(binding.variable.clone(), term);
    }
    Ok(context)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::{parse_load_terms, strip_quotes, TagSyntaxError};

    #[test]
    fn parse_load_terms_pairs_keys_with_variables() {
        let bindings = parse_load_terms("load_terms 'foo' \"bar\" baz as foo bar baz").unwrap();
        let pairs: Vec<(&str, &str)> = bindings
            .iter()
            .map(|binding| (binding.variable.as_str(), binding.key.as_str()))
            .collect();
        assert_eq!(pairs, vec![("foo", "foo"), ("bar", "bar"), ("baz", "baz")]);
    }

    #[test]
    fn parse_load_terms_rejects_missing_as_and_count_mismatch() {
        assert!(matches!(
            parse_load_terms("load_terms 'foo' foo"),
            Err(TagSyntaxError::MissingAs(_))
        ));
        assert_eq!(
            parse_load_terms("load_terms 'foo' 'bar' as foo").unwrap_err(),
            TagSyntaxError::CountMismatch {
                keys: 2,
                variables: 1
            }
        );
        assert!(matches!(
            parse_load_terms("term_tag 'foo' as foo"),
            Err(TagSyntaxError::UnexpectedTag(_))
        ));
    }

    #[test]
    fn strip_quotes_keeps_unbalanced_values() {
        assert_eq!(strip_quotes("'key'"), "key");
        assert_eq!(strip_quotes("'key"), "'key");
    }
}
