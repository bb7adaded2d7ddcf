use super::*;
use std::time::Duration;

use tempfile::tempdir;

use crate::library::Track;

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Book {id}"),
        author: Some("Author".to_string()),
        source: format!("https://example.org/{id}.mp3"),
        duration: Some(Duration::from_secs(90)),
        size_bytes: Some(1024),
        display: format!("Author - Book {id}"),
    }
}

#[test]
fn progress_round_trips_and_last_write_wins() {
    let mut store = StateStore::in_memory();
    assert_eq!(store.progress("t1"), None);

    store.set_progress("t1", 42.0);
    assert_eq!(store.progress("t1"), Some(42.0));

    store.set_progress("t1", 99.5);
    assert_eq!(store.progress("t1"), Some(99.5));

    // Negative offsets are clamped at zero.
    store.set_progress("t1", -3.0);
    assert_eq!(store.progress("t1"), Some(0.0));
}

#[test]
fn state_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let mut store = StateStore::open(path.clone());
        store.set_progress("t1", 42.0);
        store.set_last_track("t1");
        store.add_bookmark("t1", "mark", 10.0);
        store.set_library_snapshot(&[track("t1")]);
    }

    let store = StateStore::open(path);
    assert_eq!(store.progress("t1"), Some(42.0));
    assert_eq!(store.last_track(), Some("t1"));
    assert_eq!(store.bookmarks("t1").len(), 1);
    assert_eq!(store.library_snapshot().len(), 1);
    assert_eq!(store.library_snapshot()[0].id, "t1");
}

#[test]
fn corrupt_state_file_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json at all").unwrap();

    let mut store = StateStore::open(path.clone());
    assert_eq!(store.progress("t1"), None);
    assert_eq!(store.last_track(), None);

    // The next write replaces the corrupt file with a valid one.
    store.set_progress("t1", 5.0);
    let reopened = StateStore::open(path);
    assert_eq!(reopened.progress("t1"), Some(5.0));
}

#[test]
fn missing_keys_parse_as_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{ "progress": { "t1": 7.0 } }"#).unwrap();

    let store = StateStore::open(path);
    assert_eq!(store.progress("t1"), Some(7.0));
    assert_eq!(store.last_track(), None);
    assert!(store.bookmarks("t1").is_empty());
    assert!(store.library_snapshot().is_empty());
}

#[test]
fn bookmarks_append_in_insertion_order_and_never_dedupe() {
    let mut store = StateStore::in_memory();

    store.add_bookmark("t1", "start", 0.0);
    store.add_bookmark("t1", "middle", 50.0);
    store.add_bookmark("t1", "middle", 50.0);

    let bookmarks = store.bookmarks("t1");
    assert_eq!(bookmarks.len(), 3);
    assert_eq!(bookmarks[0].label, "start");
    assert_eq!(bookmarks[1].label, "middle");
    assert_eq!(bookmarks[2].label, "middle");
    assert!(!bookmarks[0].created_at.is_empty());

    assert!(store.bookmarks("other").is_empty());
}

#[test]
fn unwritable_path_degrades_to_in_memory() {
    // A path under a file (not a directory) cannot be created.
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file").unwrap();

    let mut store = StateStore::open(blocker.join("sub").join("state.json"));
    store.set_progress("t1", 11.0);

    // The write failed silently; the value is still readable in memory.
    assert_eq!(store.progress("t1"), Some(11.0));
}
