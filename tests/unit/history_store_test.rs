//! Unit tests for the SQLite-backed history store.

use std::sync::Arc;

use fetchdock::database::Database;
use fetchdock::managers::history_store::{HistoryStoreTrait, SqliteHistoryStore};
use fetchdock::types::download::{DownloadStatus, HistoryRecord};
use tempfile::TempDir;

fn record(id: &str, status: DownloadStatus) -> HistoryRecord {
    HistoryRecord {
        id: id.to_string(),
        source_url: format!("https://example.com/{}.zip", id),
        destination_directory: "/home/user/Downloads".to_string(),
        filename: format!("{}.zip", id),
        total_bytes: None,
        downloaded_bytes: 0,
        status,
        error_detail: None,
        entity_tag: None,
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

fn open_store(dir: &TempDir) -> SqliteHistoryStore {
    let db = Database::open(dir.path().join("history.db")).expect("open failed");
    SqliteHistoryStore::new(Arc::new(db))
}

#[test]
fn test_empty_history_loads_empty() {
    let store = SqliteHistoryStore::new(Arc::new(Database::open_in_memory().unwrap()));
    assert!(store.load_history().unwrap().is_empty());
}

#[test]
fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let mut failed = record("b", DownloadStatus::Error);
    failed.error_detail = Some("HTTP 503".to_string());
    failed.total_bytes = Some(4096);
    failed.downloaded_bytes = 1024;
    failed.entity_tag = Some("W/\"5e1\"".to_string());
    let records = vec![record("a", DownloadStatus::Completed), failed];

    {
        let store = open_store(&dir);
        store.save_history(&records).unwrap();
    }

    let store = open_store(&dir);
    assert_eq!(store.load_history().unwrap(), records);
}

#[test]
fn test_clear_history_removes_everything() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .save_history(&[record("a", DownloadStatus::Paused), record("b", DownloadStatus::Pending)])
        .unwrap();

    store.clear_history().unwrap();
    assert!(store.load_history().unwrap().is_empty());
}

#[test]
fn test_saving_empty_list_clears_history() {
    let store = SqliteHistoryStore::new(Arc::new(Database::open_in_memory().unwrap()));
    store.save_history(&[record("a", DownloadStatus::Paused)]).unwrap();
    store.save_history(&[]).unwrap();
    assert!(store.load_history().unwrap().is_empty());
}

#[test]
fn test_downloading_is_stored_verbatim() {
    let store = SqliteHistoryStore::new(Arc::new(Database::open_in_memory().unwrap()));
    store.save_history(&[record("a", DownloadStatus::Downloading)]).unwrap();
    assert_eq!(store.load_history().unwrap()[0].status, DownloadStatus::Downloading);
}

#[test]
fn test_duplicate_ids_fail_the_whole_save() {
    let store = SqliteHistoryStore::new(Arc::new(Database::open_in_memory().unwrap()));
    store.save_history(&[record("keep", DownloadStatus::Completed)]).unwrap();

    let result = store.save_history(&[
        record("a", DownloadStatus::Paused),
        record("a", DownloadStatus::Error),
    ]);
    assert!(result.is_err());

    let loaded = store.load_history().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "keep");
}
