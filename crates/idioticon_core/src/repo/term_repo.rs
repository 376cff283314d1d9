//! Term repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide point lookups, listing and writes over the `terms` table.
//! - Load an alias and its main term in one joined query.
//!
//! # Invariants
//! - Write paths validate the term before SQL mutations.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::term::{MainTermRef, Term, TermId, TermLimits, TermValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TERM_SELECT_SQL: &str = "SELECT
    t.id AS id,
    t.key AS key,
    t.name AS name,
    t.definition AS definition,
    m.id AS main_id,
    m.key AS main_key,
    m.name AS main_name,
    m.definition AS main_definition
FROM terms t
LEFT JOIN terms m ON m.id = t.main_term_id";

pub type TermResult<T> = Result<T, TermError>;

/// Error type for term lookups and persistence.
///
/// `NotFound` is the only domain error; it is raised by strict lookups only.
#[derive(Debug)]
pub enum TermError {
    NotFound(String),
    Validation(TermValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for TermError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "term not found: {key}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted term data: {message}"),
        }
    }
}

impl Error for TermError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TermValidationError> for TermError {
    fn from(value: TermValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for TermError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for TermError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Main/alias filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Main,
    Alias,
}

/// Query options for listing terms. Results are ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermListQuery {
    pub kind: Option<TermKind>,
    /// Case-insensitive substring matched against key or name.
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Storage contract used by `TermStore`.
pub trait TermRepository {
    fn create_term(&self, term: &Term) -> TermResult<TermId>;
    /// Inserts or overwrites the row with `term.id`.
    fn save_term(&self, term: &Term) -> TermResult<()>;
    fn get_term(&self, id: TermId) -> TermResult<Option<Term>>;
    fn get_term_by_key(&self, key: &str) -> TermResult<Option<Term>>;
    /// All aliases whose main term is `main_id`, ordered by key.
    fn list_aliases(&self, main_id: TermId) -> TermResult<Vec<Term>>;
    fn list_terms(&self, query: &TermListQuery) -> TermResult<Vec<Term>>;
    /// Returns whether a row was removed.
    fn delete_term(&self, id: TermId) -> TermResult<bool>;
}

/// SQLite-backed term repository.
pub struct SqliteTermRepository<'conn> {
    conn: &'conn Connection,
    limits: TermLimits,
}

impl<'conn> SqliteTermRepository<'conn> {
    /// Constructs a repository from a migrated connection using default limits.
    pub fn try_new(conn: &'conn Connection) -> TermResult<Self> {
        Self::with_limits(conn, TermLimits::default())
    }

    /// Constructs a repository that validates writes against `limits`.
    pub fn with_limits(conn: &'conn Connection, limits: TermLimits) -> TermResult<Self> {
        let db_version = current_user_version(conn)?;
        let required = latest_version();
        if db_version < required {
            return Err(DbError::SchemaNotMigrated {
                db_version,
                required,
            }
            .into());
        }
        Ok(Self { conn, limits })
    }

    fn query_terms(&self, sql: &str, bind_values: Vec<Value>) -> TermResult<Vec<Term>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next()? {
            terms.push(parse_term_row(row)?);
        }
        Ok(terms)
    }

    fn query_one(&self, sql: &str, bind_values: Vec<Value>) -> TermResult<Option<Term>> {
        Ok(self.query_terms(sql, bind_values)?.into_iter().next())
    }
}

impl TermRepository for SqliteTermRepository<'_> {
    fn create_term(&self, term: &Term) -> TermResult<TermId> {
        term.validate_with(&self.limits)?;

        self.conn.execute(
            "INSERT INTO terms (id, key, name, definition, main_term_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                term.id.to_string(),
                term.key.as_str(),
                term.name.as_str(),
                term.definition.as_str(),
                main_term_id(term),
            ],
        )?;

        Ok(term.id)
    }

    fn save_term(&self, term: &Term) -> TermResult<()> {
        term.validate_with(&self.limits)?;

        self.conn.execute(
            "INSERT INTO terms (id, key, name, definition, main_term_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                key = excluded.key,
                name = excluded.name,
                definition = excluded.definition,
                main_term_id = excluded.main_term_id,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                term.id.to_string(),
                term.key.as_str(),
                term.name.as_str(),
                term.definition.as_str(),
                main_term_id(term),
            ],
        )?;

        Ok(())
    }

    fn get_term(&self, id: TermId) -> TermResult<Option<Term>> {
        self.query_one(
            &format!("{TERM_SELECT_SQL} WHERE t.id = ?1;"),
            vec![Value::Text(id.to_string())],
        )
    }

    fn get_term_by_key(&self, key: &str) -> TermResult<Option<Term>> {
        self.query_one(
            &format!("{TERM_SELECT_SQL} WHERE t.key = ?1;"),
            vec![Value::Text(key.to_string())],
        )
    }

    fn list_aliases(&self, main_id: TermId) -> TermResult<Vec<Term>> {
        self.query_terms(
            &format!("{TERM_SELECT_SQL} WHERE t.main_term_id = ?1 ORDER BY t.key ASC;"),
            vec![Value::Text(main_id.to_string())],
        )
    }

    fn list_terms(&self, query: &TermListQuery) -> TermResult<Vec<Term>> {
        let mut sql = format!("{TERM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.kind {
            Some(TermKind::Main) => sql.push_str(" AND t.main_term_id IS NULL"),
            Some(TermKind::Alias) => sql.push_str(" AND t.main_term_id IS NOT NULL"),
            None => {}
        }

        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                sql.push_str(" AND (instr(lower(t.key), lower(?)) > 0 OR instr(lower(t.name), lower(?)) > 0)");
                bind_values.push(Value::Text(search.to_string()));
                bind_values.push(Value::Text(search.to_string()));
            }
        }

        sql.push_str(" ORDER BY t.key ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        self.query_terms(&sql, bind_values)
    }

    fn delete_term(&self, id: TermId) -> TermResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM terms WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn main_term_id(term: &Term) -> Option<String> {
    term.main_term.as_ref().map(|main| main.id.to_string())
}

fn parse_id(value: &str, column: &str) -> TermResult<TermId> {
    Uuid::parse_str(value).map_err(|_| {
        TermError::InvalidData(format!("invalid uuid value `{value}` in terms.{column}"))
    })
}

fn parse_term_row(row: &Row<'_>) -> TermResult<Term> {
    let id_text: String = row.get("id")?;
    let id = parse_id(&id_text, "id")?;

    let main_term = match row.get::<_, Option<String>>("main_id")? {
        Some(main_id) => Some(MainTermRef {
            id: parse_id(&main_id, "main_term_id")?,
            key: row.get("main_key")?,
            name: row.get("main_name")?,
            definition: row.get("main_definition")?,
        }),
        None => None,
    };

    Ok(Term {
        id,
        key: row.get("key")?,
        name: row.get("name")?,
        definition: row.get("definition")?,
        main_term,
    })
}
