//! Integration tests for the cool-lexicon-store crate.

use cool_lexicon_core::{Lexicon, LexiconConfig, LexiconError};
use cool_lexicon_store::{Migration, SqlLexicon, SqliteDriver, latest_version, open};
use rusqlite::Connection;
use std::path::Path;

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn file_config(path: &Path) -> LexiconConfig {
    let raw = serde_json::json!({
        "type": "sqlite",
        "host": path.to_string_lossy(),
        "timeoutSecs": 5,
    })
    .to_string();
    LexiconConfig::from_json_str(&raw).unwrap()
}

const STORE: [&str; 5] = ["नमस्ते", "धन्यवाद", "नमस्कार", "सुंदर", "मोक्ष"];

#[test]
fn test_words_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir.path().join("lexicon.db"));

    let mut lexicon = open(&config, true).unwrap();
    lexicon.add(&words(&STORE)).unwrap();
    lexicon.close().unwrap();

    // Schema already present: open without setup.
    let mut lexicon = open(&config, false).unwrap();
    let found = lexicon
        .lookup(&words(&["नमस्कार", "notexists", "सुंदर"]))
        .unwrap();
    assert!(found["नमस्कार"].value);
    assert!(found["सुंदर"].value);
    assert!(!found["notexists"].value);

    let prefix = lexicon.get_all_words_starting_with(&words(&["न"])).unwrap();
    assert_eq!(prefix["न"].value, words(&["नमस्कार", "नमस्ते"]));

    let suffix = lexicon.get_all_words_ending_with(&words(&["र"])).unwrap();
    assert_eq!(suffix["र"].value, words(&["नमस्कार", "सुंदर"]));

    let none = lexicon.get_all_words_starting_with(&words(&["क्र"])).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_setup_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir.path().join("lexicon.db"));

    open(&config, true).unwrap().close().unwrap();
    open(&config, true).unwrap().close().unwrap();

    let mut driver = SqliteDriver::open(dir.path().join("lexicon.db"), None).unwrap();
    let status = Migration::new(&mut driver).status().unwrap();
    assert!(status.table_exists);
    assert_eq!(status.current_version, latest_version());
}

#[test]
fn test_open_without_setup_fails_on_fresh_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir.path().join("fresh.db"));
    let err = open(&config, false).err().unwrap();
    assert!(matches!(err, LexiconError::Migration(_)));
    assert!(err.to_string().contains("run setup"));
}

#[test]
fn test_open_refuses_mis_collated_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE lexicon (word VARCHAR(100) NOT NULL PRIMARY KEY)")
        .unwrap();

    let err = open(&file_config(&path), true).err().unwrap();
    assert!(matches!(err, LexiconError::CollationMismatch { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_open_checks_word_column_collation_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE lexicon (note TEXT COLLATE NOCASE, \
             word VARCHAR(100) NOT NULL PRIMARY KEY)",
        )
        .unwrap();

    match open(&file_config(&path), true).err().unwrap() {
        LexiconError::CollationMismatch { expected, found } => {
            assert_eq!(expected, "NOCASE");
            assert_eq!(found, "BINARY");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_add_is_all_or_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir.path().join("lexicon.db"));
    let mut lexicon = open(&config, true).unwrap();
    lexicon.add(&words(&["देव"])).unwrap();

    let mut batch = words(&["मोक्ष", "सुंदर"]);
    batch.push("x".repeat(101));
    assert!(matches!(
        lexicon.add(&batch),
        Err(LexiconError::InvalidArgument(_))
    ));

    let found = lexicon.lookup(&words(&["देव", "मोक्ष", "सुंदर"])).unwrap();
    assert!(found["देव"].value);
    assert!(!found["मोक्ष"].value);
    assert!(!found["सुंदर"].value);
}

#[test]
fn test_adapter_over_existing_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let mut driver = SqliteDriver::from_connection(conn, None).unwrap();
    Migration::new(&mut driver).up().unwrap();

    let mut lexicon = SqlLexicon::new(driver);
    lexicon.add(&words(&STORE)).unwrap();
    lexicon.add(&words(&STORE)).unwrap();

    let found = lexicon.lookup(&words(&STORE)).unwrap();
    assert_eq!(found.len(), STORE.len());
    assert!(found.values().all(|res| res.value && res.is_ok()));
}
