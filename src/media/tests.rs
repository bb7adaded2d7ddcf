use super::sink::{cache_file_name, is_remote, resolve_source};

#[test]
fn remote_locators_are_recognized_by_scheme() {
    assert!(is_remote("https://example.org/a.mp3"));
    assert!(is_remote("http://example.org/a.mp3"));
    assert!(!is_remote("/srv/books/a.mp3"));
    assert!(!is_remote("relative/a.mp3"));
}

#[test]
fn cache_file_name_is_stable_and_keeps_the_extension() {
    let a = cache_file_name("https://example.org/books/story.mp3");
    let b = cache_file_name("https://example.org/books/story.mp3");
    let c = cache_file_name("https://example.org/books/other.mp3");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.ends_with(".mp3"));

    // No usable extension falls back to a generic one.
    let d = cache_file_name("https://example.org/stream");
    assert!(d.ends_with(".audio"));
}

#[test]
fn resolving_a_missing_local_file_fails_without_touching_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve_source("/definitely/not/here.mp3", dir.path()).unwrap_err();
    assert!(err.contains("no such file"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn resolving_a_local_file_returns_it_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.mp3");
    std::fs::write(&path, b"audio").unwrap();

    let resolved = resolve_source(path.to_str().unwrap(), dir.path()).unwrap();
    assert_eq!(resolved, path);
}
