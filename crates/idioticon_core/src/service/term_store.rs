//! Term store: alias resolution and CRUD shortcuts.
//!
//! # Responsibility
//! - Look up terms by key with optional alias resolution and soft errors.
//! - Provide get-or-create, update-if-exists and cascading delete helpers.
//! - Attach aliases to main terms while keeping aliasing one level deep.
//!
//! # Invariants
//! - `TermError::NotFound` is only returned by strict lookups.
//! - Every mutation persists immediately; there is no batching.
//! - An alias never points at another alias.

use crate::model::term::{MainTermRef, Term};
use crate::repo::term_repo::{TermError, TermKind, TermListQuery, TermRepository, TermResult};
use log::{debug, info, warn};

/// Term argument: either a key to look up or an already loaded term.
#[derive(Debug, Clone, Copy)]
pub enum TermKey<'a> {
    Key(&'a str),
    Term(&'a Term),
}

impl TermKey<'_> {
    pub fn key(&self) -> &str {
        match self {
            Self::Key(key) => key,
            Self::Term(term) => &term.key,
        }
    }
}

impl<'a> From<&'a str> for TermKey<'a> {
    fn from(value: &'a str) -> Self {
        Self::Key(value)
    }
}

impl<'a> From<&'a String> for TermKey<'a> {
    fn from(value: &'a String) -> Self {
        Self::Key(value.as_str())
    }
}

impl<'a> From<&'a Term> for TermKey<'a> {
    fn from(value: &'a Term) -> Self {
        Self::Term(value)
    }
}

/// Repository-backed glossary store.
pub struct TermStore<R: TermRepository> {
    repo: R,
}

impl<R: TermRepository> TermStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Looks up a term by key.
    ///
    /// A loaded term passes through unchanged. With `resolve_alias`, an alias
    /// is replaced by its main term. A missing key yields `Ok(None)` when
    /// `soft_error` is set and `TermError::NotFound` otherwise.
    pub fn get<'a>(
        &self,
        key: impl Into<TermKey<'a>>,
        resolve_alias: bool,
        soft_error: bool,
    ) -> TermResult<Option<Term>> {
        let key = match key.into() {
            TermKey::Term(term) => return Ok(Some(term.clone())),
            TermKey::Key(key) => key,
        };

        let found = match self.repo.get_term_by_key(key)? {
            Some(term) if resolve_alias => Some(self.canonical(term)?),
            other => other,
        };

        match found {
            Some(term) => Ok(Some(term)),
            None if soft_error => {
                debug!("event=term_get module=service status=miss key={key}");
                Ok(None)
            }
            None => Err(TermError::NotFound(key.to_string())),
        }
    }

    /// Resolving, soft lookup used by renderers.
    pub fn lookup<'a>(&self, key: impl Into<TermKey<'a>>) -> TermResult<Option<Term>> {
        self.get(key, true, true)
    }

    /// Resolving, strict lookup.
    pub fn require<'a>(&self, key: impl Into<TermKey<'a>>) -> TermResult<Term> {
        let key = key.into();
        self.get(key, true, false)?
            .ok_or_else(|| TermError::NotFound(key.key().to_string()))
    }

    /// Creates a main term unless `key` is already taken.
    ///
    /// Returns `None` without touching the stored record when the key exists.
    pub fn add(&self, key: &str, name: &str, definition: &str) -> TermResult<Option<Term>> {
        if self.repo.get_term_by_key(key)?.is_some() {
            debug!("event=term_add module=service status=skipped reason=exists key={key}");
            return Ok(None);
        }

        let term = Term::new(key, name, definition);
        self.repo.create_term(&term)?;
        info!("event=term_add module=service status=ok key={key}");
        Ok(Some(term))
    }

    /// Creates or updates a term, overwriting only the provided fields.
    pub fn set<'a>(
        &self,
        key: impl Into<TermKey<'a>>,
        name: Option<&str>,
        definition: Option<&str>,
    ) -> TermResult<Term> {
        let key = key.into();
        let Some(mut term) = self.stored(key)? else {
            let mut term = Term::new(key.key(), "", "");
            apply_fields(&mut term, name, definition);
            self.repo.create_term(&term)?;
            info!("event=term_set module=service status=ok mode=create key={}", term.key);
            return Ok(term);
        };

        apply_fields(&mut term, name, definition);
        self.repo.save_term(&term)?;
        info!("event=term_set module=service status=ok mode=update key={}", term.key);
        Ok(term)
    }

    /// Updates the provided fields of an existing term.
    ///
    /// Returns `None` and creates nothing when the term does not exist.
    pub fn update<'a>(
        &self,
        key: impl Into<TermKey<'a>>,
        name: Option<&str>,
        definition: Option<&str>,
    ) -> TermResult<Option<Term>> {
        let Some(mut term) = self.stored(key.into())? else {
            return Ok(None);
        };

        apply_fields(&mut term, name, definition);
        self.repo.save_term(&term)?;
        info!("event=term_update module=service status=ok key={}", term.key);
        Ok(Some(term))
    }

    /// Deletes a term, optionally deleting its aliases first.
    ///
    /// Without `cascade`, surviving aliases become main terms. Returns the
    /// deleted record, or `None` when the term does not exist.
    pub fn delete<'a>(
        &self,
        key: impl Into<TermKey<'a>>,
        cascade: bool,
    ) -> TermResult<Option<Term>> {
        let Some(term) = self.stored(key.into())? else {
            return Ok(None);
        };

        let mut removed_aliases = 0usize;
        if cascade {
            for alias in self.repo.list_aliases(term.id)? {
                if self.repo.delete_term(alias.id)? {
                    removed_aliases += 1;
                }
            }
        }

        if !self.repo.delete_term(term.id)? {
            debug!("event=term_delete module=service status=miss key={}", term.key);
            return Ok(None);
        }
        info!(
            "event=term_delete module=service status=ok key={} cascade={cascade} aliases_removed={removed_aliases}",
            term.key
        );
        Ok(Some(term))
    }

    /// Makes `alias` an alias of `main`.
    ///
    /// `main` is resolved to its main term. A loaded term passed as `alias` is
    /// re-pointed (its own aliases move along with it); a key creates a new
    /// alias record with `name` and `definition`. Returns `None` when `main`
    /// does not exist or when both arguments are the same term.
    pub fn add_alias<'a, 'b>(
        &self,
        main: impl Into<TermKey<'a>>,
        alias: impl Into<TermKey<'b>>,
        name: &str,
        definition: &str,
    ) -> TermResult<Option<Term>> {
        let Some(main) = self.stored(main.into())? else {
            return Ok(None);
        };
        let main = self.canonical(main)?;

        match alias.into() {
            TermKey::Term(existing) => {
                if existing.id == main.id {
                    warn!(
                        "event=term_alias module=service status=skipped reason=self_alias key={}",
                        main.key
                    );
                    return Ok(None);
                }

                let link = MainTermRef::from(&main);
                let mut alias = existing.clone();
                alias.main_term = Some(link.clone());
                self.repo.save_term(&alias)?;

                for mut nested in self.repo.list_aliases(alias.id)? {
                    nested.main_term = Some(link.clone());
                    self.repo.save_term(&nested)?;
                }

                info!(
                    "event=term_alias module=service status=ok mode=repoint key={} main={}",
                    alias.key, main.key
                );
                Ok(Some(alias))
            }
            TermKey::Key(key) => {
                let alias = Term::new_alias(key, name, definition, &main);
                self.repo.create_term(&alias)?;
                info!(
                    "event=term_alias module=service status=ok mode=create key={key} main={}",
                    main.key
                );
                Ok(Some(alias))
            }
        }
    }

    /// Lists aliases of a term; empty when the term does not exist.
    pub fn aliases<'a>(&self, key: impl Into<TermKey<'a>>) -> TermResult<Vec<Term>> {
        match self.get(key, false, true)? {
            Some(term) => self.repo.list_aliases(term.id),
            None => Ok(Vec::new()),
        }
    }

    pub fn list(&self, query: &TermListQuery) -> TermResult<Vec<Term>> {
        self.repo.list_terms(query)
    }

    pub fn list_main_terms(&self) -> TermResult<Vec<Term>> {
        self.repo.list_terms(&TermListQuery {
            kind: Some(TermKind::Main),
            ..TermListQuery::default()
        })
    }

    /// Loads the persisted state of `key` without alias resolution.
    ///
    /// A loaded term counts only while its row still exists; its in-memory
    /// fields are kept so callers can edit before saving, but the alias link
    /// is refreshed from storage.
    fn stored(&self, key: TermKey<'_>) -> TermResult<Option<Term>> {
        match key {
            TermKey::Key(key) => self.repo.get_term_by_key(key),
            TermKey::Term(term) => Ok(self.repo.get_term(term.id)?.map(|persisted| Term {
                main_term: persisted.main_term,
                ..term.clone()
            })),
        }
    }

    /// Replaces an alias by the main term it points at.
    fn canonical(&self, term: Term) -> TermResult<Term> {
        let Some(main) = term.main_term.as_ref() else {
            return Ok(term);
        };

        self.repo.get_term(main.id)?.ok_or_else(|| {
            TermError::InvalidData(format!(
                "alias `{}` points at missing main term {}",
                term.key, main.id
            ))
        })
    }
}

fn apply_fields(term: &mut Term, name: Option<&str>, definition: Option<&str>) {
    if let Some(name) = name {
        term.name = name.to_string();
    }
    if let Some(definition) = definition {
        term.definition = definition.to_string();
    }
}
