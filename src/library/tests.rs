use super::*;
use std::time::Duration;

use super::model::make_display;

fn track(id: &str, title: &str, author: Option<&str>) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        author: author.map(str::to_string),
        source: format!("https://example.org/{id}.mp3"),
        duration: None,
        size_bytes: None,
        display: make_display(title, author),
    }
}

#[test]
fn make_display_prefers_author_dash_title() {
    assert_eq!(make_display("Story", Some("Author")), "Author - Story");
    assert_eq!(make_display("Story", Some("  Author  ")), "Author - Story");
    assert_eq!(make_display("Story", None), "Story");
    assert_eq!(make_display("Story", Some("")), "Story");
    assert_eq!(make_display("Story", Some("   ")), "Story");
}

#[test]
fn manifest_parses_full_and_minimal_entries() {
    let json = r#"
    {
        "books": [
            { "id": "1", "title": "Full", "author": "A", "file": "full.mp3",
              "duration": 3600, "size": 123456 },
            { "id": "2", "title": "Minimal", "file": "min.mp3" }
        ]
    }
    "#;

    let manifest = Manifest::parse(json).unwrap();
    assert_eq!(manifest.books.len(), 2);

    let tracks = manifest.resolve("https://example.org/books");
    assert_eq!(tracks[0].duration, Some(Duration::from_secs(3600)));
    assert_eq!(tracks[0].size_bytes, Some(123456));
    assert_eq!(tracks[0].display, "A - Full");
    assert_eq!(tracks[1].duration, None);
    assert_eq!(tracks[1].author, None);
}

#[test]
fn manifest_without_books_key_is_empty() {
    let manifest = Manifest::parse("{}").unwrap();
    assert!(manifest.books.is_empty());
    assert!(Manifest::parse("not json").is_err());
}

#[test]
fn manifest_resolve_percent_encodes_against_url_bases() {
    let json = r#"{ "books": [ { "id": "1", "title": "T", "file": "my book.mp3" } ] }"#;
    let tracks = Manifest::parse(json)
        .unwrap()
        .resolve("https://example.org/books/");
    assert_eq!(tracks[0].source, "https://example.org/books/my%20book.mp3");

    let tracks = Manifest::parse(json).unwrap().resolve("/srv/books");
    assert!(tracks[0].source.ends_with("my book.mp3"));
}

#[test]
fn manifest_ignores_nonsense_durations() {
    let json = r#"{ "books": [ { "id": "1", "title": "T", "file": "t.mp3", "duration": -5 } ] }"#;
    let tracks = Manifest::parse(json).unwrap().resolve("");
    assert_eq!(tracks[0].duration, None);
}

#[test]
fn search_matches_title_and_author_case_insensitively() {
    let store = LibraryStore::new(vec![
        track("1", "Some Story", None),
        track("2", "Another Tale", Some("Author Name")),
        track("3", "Third", Some("Nobody")),
    ]);

    // Substring of the author field, different case.
    assert_eq!(store.search("auth"), vec![1]);
    assert_eq!(store.search("TALE"), vec![1]);
    assert_eq!(store.search("story"), vec![0]);
    assert!(store.search("zzz").is_empty());
}

#[test]
fn search_with_blank_query_returns_everything_in_order() {
    let store = LibraryStore::new(vec![
        track("1", "B", None),
        track("2", "A", None),
        track("3", "C", None),
    ]);

    assert_eq!(store.search(""), vec![0, 1, 2]);
    assert_eq!(store.search("   "), vec![0, 1, 2]);
}

#[test]
fn duplicate_ids_are_dropped_keeping_the_first() {
    let store = LibraryStore::new(vec![
        track("dup", "First", None),
        track("dup", "Second", None),
        track("other", "Third", None),
    ]);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().title, "First");
    assert_eq!(store.index_of("other"), Some(1));
}

#[test]
fn index_and_id_lookups_agree() {
    let store = LibraryStore::new(vec![track("a", "A", None), track("b", "B", None)]);
    assert_eq!(store.index_of("b"), Some(1));
    assert_eq!(store.by_id("b").unwrap().title, "B");
    assert_eq!(store.index_of("missing"), None);
    assert!(store.by_id("missing").is_none());
}

#[test]
fn total_duration_sums_only_known_lengths() {
    let mut a = track("a", "A", None);
    a.duration = Some(Duration::from_secs(100));
    let b = track("b", "B", None);
    let mut c = track("c", "C", None);
    c.duration = Some(Duration::from_secs(50));

    let store = LibraryStore::new(vec![a, b, c]);
    assert_eq!(store.total_duration(), Duration::from_secs(150));
}

mod scanning {
    use super::*;
    use crate::config::LibrarySettings;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scan_filters_non_audio_and_sorts_by_display() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan::scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 2);
        // Unreadable tags fall back to the file stem; sort is case-insensitive.
        assert_eq!(tracks[0].title, "A");
        assert_eq!(tracks[1].title, "b");
        assert_eq!(tracks[0].id, "A.ogg");
        assert!(tracks[0].source.ends_with("A.ogg"));
    }

    #[test]
    fn scan_respects_the_extension_allowlist() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.mp3"), b"x").unwrap();
        fs::write(dir.path().join("y.m4b"), b"y").unwrap();

        let settings = LibrarySettings {
            extensions: vec!["m4b".into()],
            ..LibrarySettings::default()
        };
        let tracks = scan::scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "y.m4b");
    }
}

mod loading {
    use super::*;
    use crate::config::LibrarySettings;
    use crate::store::StateStore;

    #[test]
    fn falls_back_to_the_snapshot_then_demo_set() {
        let mut store = StateStore::in_memory();

        // No sources configured at all: the demo set keeps the player usable.
        let settings = LibrarySettings::default();
        let tracks = load(&settings, &mut store);
        assert!(!tracks.is_empty());
        assert!(tracks.iter().all(|t| t.source.starts_with("https://")));

        // With a snapshot persisted, it wins over the demo set.
        store.set_library_snapshot(&[track("snap", "Snapshot Book", None)]);
        let tracks = load(&settings, &mut store);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "snap");
    }

    #[test]
    fn unreachable_manifest_degrades_to_the_next_source() {
        let mut store = StateStore::in_memory();
        store.set_library_snapshot(&[track("snap", "Snapshot Book", None)]);

        let settings = LibrarySettings {
            manifest_url: Some("http://127.0.0.1:1/books.json".into()),
            ..LibrarySettings::default()
        };
        let tracks = load(&settings, &mut store);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "snap");
    }
}
