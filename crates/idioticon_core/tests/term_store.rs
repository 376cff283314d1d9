use idioticon_core::db::open_db_in_memory;
use idioticon_core::{SqliteTermRepository, Term, TermError, TermStore, TermValidationError};
use rusqlite::Connection;

fn store(conn: &Connection) -> TermStore<SqliteTermRepository<'_>> {
    TermStore::new(SqliteTermRepository::try_new(conn).unwrap())
}

fn count_terms(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM terms;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn get_returns_main_terms_without_aliases() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    for key in ["alpha", "beta", "gamma"] {
        store.add(key, &key.to_uppercase(), "text").unwrap().unwrap();
    }

    for key in ["alpha", "beta", "gamma"] {
        let term = store.get(key, true, false).unwrap().unwrap();
        assert_eq!(term.key, key);
        assert!(term.is_main_term());
        assert!(!term.is_alias());
    }
}

#[test]
fn get_resolves_alias_only_when_asked() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let main = store.add("gc", "Garbage collection", "Automatic memory management").unwrap().unwrap();
    store.add_alias("gc", "collector", "", "").unwrap().unwrap();

    let resolved = store.get("collector", true, false).unwrap().unwrap();
    assert_eq!(resolved, main);

    let raw = store.get("collector", false, false).unwrap().unwrap();
    assert_eq!(raw.key, "collector");
    assert!(raw.is_alias());
    assert_eq!(raw.get_name(), main.get_name());
    assert_eq!(raw.get_definition(), main.get_definition());
}

#[test]
fn get_passes_loaded_terms_through() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let unsaved = Term::new("never-saved", "Ghost", "");
    let returned = store.get(&unsaved, true, false).unwrap().unwrap();
    assert_eq!(returned, unsaved);
}

#[test]
fn missing_key_errors_unless_soft() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let err = store.get("nonexistent", true, false).unwrap_err();
    assert!(matches!(err, TermError::NotFound(ref key) if key == "nonexistent"));
    assert_eq!(err.to_string(), "term not found: nonexistent");

    assert!(store.get("nonexistent", true, true).unwrap().is_none());
    assert!(store.lookup("nonexistent").unwrap().is_none());
    assert!(matches!(
        store.require("nonexistent"),
        Err(TermError::NotFound(_))
    ));
}

#[test]
fn add_does_not_overwrite_existing_term() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let first = store.add("k", "n", "d").unwrap();
    assert!(first.is_some());
    assert!(store.add("k", "n2", "d2").unwrap().is_none());

    let stored = store.get("k", false, false).unwrap().unwrap();
    assert_eq!(stored.name, "n");
    assert_eq!(stored.definition, "d");
    assert_eq!(count_terms(&conn), 1);
}

#[test]
fn set_creates_missing_term() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let created = store.set("missing-key", Some("X"), None).unwrap();
    assert_eq!(created.name, "X");
    assert_eq!(created.definition, "");

    let stored = store.require("missing-key").unwrap();
    assert_eq!(stored.name, "X");
}

#[test]
fn set_overwrites_only_provided_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let term = store.add("my-term", "My term", "Just a description").unwrap().unwrap();
    let updated = store.set(&term, Some("My new term"), None).unwrap();
    assert_eq!(updated.id, term.id);
    assert_eq!(updated.name, "My new term");
    assert_eq!(updated.definition, "Just a description");

    let stored = store.require("my-term").unwrap();
    assert_eq!(stored.name, "My new term");
    assert_eq!(stored.definition, "Just a description");
}

#[test]
fn set_on_alias_key_edits_the_alias_itself() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    store.add("main", "Main", "Main text").unwrap();
    store.add_alias("main", "alias", "", "").unwrap();

    let alias = store.set("alias", Some("Alias"), None).unwrap();
    assert!(alias.is_alias());
    assert_eq!(alias.get_name(), "Alias");
    assert_eq!(store.require("main").unwrap().name, "Main");
}

#[test]
fn update_requires_existing_term() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    assert!(store.update("missing-key", Some("X"), None).unwrap().is_none());
    assert_eq!(count_terms(&conn), 0);

    let term = store.add("my-term", "Old", "Text").unwrap().unwrap();
    let updated = store.update(&term, Some("Pretty title"), None).unwrap().unwrap();
    assert_eq!(updated.name, "Pretty title");
    assert_eq!(store.require("my-term").unwrap().name, "Pretty title");
    assert_eq!(store.require("my-term").unwrap().definition, "Text");
}

#[test]
fn delete_with_cascade_removes_aliases() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    store.add("k", "K", "").unwrap();
    store.add_alias("k", "k-one", "", "").unwrap();
    store.add_alias("k", "k-two", "", "").unwrap();
    assert_eq!(count_terms(&conn), 3);

    let deleted = store.delete("k", true).unwrap().unwrap();
    assert_eq!(deleted.key, "k");
    assert_eq!(count_terms(&conn), 0);
    assert!(store.get("k", true, true).unwrap().is_none());
}

#[test]
fn delete_without_cascade_keeps_aliases_as_main_terms() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    store.add("k", "K", "").unwrap();
    store.add_alias("k", "k-one", "", "").unwrap();

    store.delete("k", false).unwrap().unwrap();
    let survivor = store.require("k-one").unwrap();
    assert_eq!(survivor.key, "k-one");
    assert!(survivor.is_main_term());
}

#[test]
fn delete_missing_term_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    assert!(store.delete("ghost", true).unwrap().is_none());
}

#[test]
fn delete_alias_key_removes_only_the_alias() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    store.add("main", "", "").unwrap();
    store.add_alias("main", "alias", "", "").unwrap();

    let deleted = store.delete("alias", true).unwrap().unwrap();
    assert_eq!(deleted.key, "alias");
    assert!(store.lookup("main").unwrap().is_some());
    assert_eq!(count_terms(&conn), 1);
}

#[test]
fn add_alias_creates_alias_record_with_overrides() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let main = store.add("main", "Main", "Main text").unwrap().unwrap();
    let alias = store
        .add_alias("main", "alias", "Alias name", "")
        .unwrap()
        .unwrap();

    assert_eq!(alias.main_term.as_ref().unwrap().id, main.id);
    assert_eq!(alias.get_name(), "Alias name");
    assert_eq!(alias.get_definition(), "Main text");
    assert_eq!(store.aliases("main").unwrap(), vec![alias]);
}

#[test]
fn add_alias_repoints_existing_term() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let main = store.add("my-term", "My term", "Just a description").unwrap().unwrap();
    let other = store
        .add("my-alias", "My alias", "Just a alias description")
        .unwrap()
        .unwrap();

    let alias = store.add_alias(&main, &other, "", "").unwrap().unwrap();
    assert_eq!(alias.id, other.id);
    assert_eq!(alias.name, "My alias");

    let stored = store.get("my-alias", false, false).unwrap().unwrap();
    assert_eq!(stored.main_term.unwrap().id, main.id);
    assert_eq!(store.require("my-alias").unwrap(), store.require("my-term").unwrap());
}

#[test]
fn add_alias_with_missing_main_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    assert!(store.add_alias("missing", "alias", "", "").unwrap().is_none());
    assert_eq!(count_terms(&conn), 0);
}

#[test]
fn add_alias_of_alias_points_at_main_term() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let main = store.add("main", "Main", "").unwrap().unwrap();
    store.add_alias("main", "first", "", "").unwrap();
    let second = store.add_alias("first", "second", "", "").unwrap().unwrap();

    assert_eq!(second.main_term.unwrap().id, main.id);
}

#[test]
fn repointing_a_main_term_moves_its_aliases_too() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let target = store.add("target", "Target", "").unwrap().unwrap();
    let old_main = store.add("old-main", "Old", "").unwrap().unwrap();
    store.add_alias("old-main", "old-alias", "", "").unwrap();

    store.add_alias(&target, &old_main, "", "").unwrap().unwrap();

    let nested = store.get("old-alias", false, false).unwrap().unwrap();
    assert_eq!(nested.main_term.unwrap().id, target.id);
    let keys: Vec<String> = store
        .aliases("target")
        .unwrap()
        .into_iter()
        .map(|term| term.key)
        .collect();
    assert_eq!(keys, vec!["old-alias", "old-main"]);
}

#[test]
fn add_alias_to_itself_is_skipped() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let term = store.add("self", "", "").unwrap().unwrap();
    assert!(store.add_alias("self", &term, "", "").unwrap().is_none());
    assert!(store.require("self").unwrap().is_main_term());
}

#[test]
fn add_alias_with_taken_key_propagates_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    store.add("main", "", "").unwrap();
    store.add("taken", "", "").unwrap();
    let err = store.add_alias("main", "taken", "", "").unwrap_err();
    assert!(matches!(err, TermError::Db(_)));
}

#[test]
fn list_main_terms_excludes_aliases() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    store.add("b", "", "").unwrap();
    store.add("a", "", "").unwrap();
    store.add_alias("a", "c", "", "").unwrap();

    let keys: Vec<String> = store
        .list_main_terms()
        .unwrap()
        .into_iter()
        .map(|term| term.key)
        .collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn stale_loaded_term_is_treated_as_missing_by_delete_and_update() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let term = store.add("k", "K", "").unwrap().unwrap();
    store.delete("k", true).unwrap().unwrap();

    assert!(store.delete(&term, true).unwrap().is_none());
    assert!(store.update(&term, Some("X"), None).unwrap().is_none());
    assert_eq!(count_terms(&conn), 0);
}

#[test]
fn add_alias_with_outdated_main_instance_links_to_current_main() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let b = store.add("b", "B", "").unwrap().unwrap();
    let a = store.add("a", "A", "").unwrap().unwrap();
    store.add_alias("b", &a, "", "").unwrap().unwrap();

    // `a` still looks like a main term in memory.
    let c = store.add_alias(&a, "c", "", "").unwrap().unwrap();
    assert_eq!(c.main_term.unwrap().id, b.id);

    let resolved = store.get("c", true, false).unwrap().unwrap();
    assert_eq!(resolved.id, b.id);
    assert!(resolved.is_main_term());

    store.delete("b", true).unwrap().unwrap();
    assert_eq!(count_terms(&conn), 0);
}

#[test]
fn set_with_invalid_fields_on_missing_key_stores_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let err = store.set("fresh", Some(&"x".repeat(300)), None).unwrap_err();
    assert!(matches!(
        err,
        TermError::Validation(TermValidationError::NameTooLong { length: 300, .. })
    ));
    assert_eq!(count_terms(&conn), 0);
}
