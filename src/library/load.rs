use std::path::Path;
use std::time::Duration;

use crate::config::LibrarySettings;
use crate::store::StateStore;

use super::fetch::fetch_manifest;
use super::model::{Track, make_display};
use super::scan::scan;

/// Load the library, trying sources in priority order.
///
/// 1. remote manifest, resolved against the configured base URL;
/// 2. the persisted library snapshot;
/// 3. a local folder scan, when one is configured;
/// 4. the built-in demo set.
///
/// The first source yielding a non-empty list wins. A successful remote
/// load refreshes the snapshot so the next offline start still has a
/// library.
pub fn load(settings: &LibrarySettings, store: &mut StateStore) -> Vec<Track> {
    if let Some(url) = settings.manifest_url.as_deref() {
        match fetch_manifest(url) {
            Ok(manifest) => {
                let base = settings.base_url.as_deref().unwrap_or("");
                let tracks = manifest.resolve(base);
                if !tracks.is_empty() {
                    log::info!("library: {} tracks from manifest {url}", tracks.len());
                    store.set_library_snapshot(&tracks);
                    return tracks;
                }
                log::warn!("library: manifest {url} is empty, trying next source");
            }
            Err(e) => log::warn!("library: {e}"),
        }
    }

    let snapshot = store.library_snapshot();
    if !snapshot.is_empty() {
        log::info!("library: {} tracks from persisted snapshot", snapshot.len());
        return snapshot;
    }

    if let Some(dir) = settings.books_dir.as_deref() {
        let tracks = scan(Path::new(dir), settings);
        if !tracks.is_empty() {
            log::info!("library: {} tracks scanned from {dir}", tracks.len());
            return tracks;
        }
        log::warn!("library: no audio files under {dir}");
    }

    log::info!("library: using built-in demo set");
    demo_tracks()
}

/// The built-in fallback set, so a fresh install is never empty.
fn demo_tracks() -> Vec<Track> {
    let entries = [
        (
            "demo1",
            "Sample Book 1",
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
            300,
        ),
        (
            "demo2",
            "Sample Book 2",
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
            420,
        ),
    ];

    entries
        .into_iter()
        .map(|(id, title, url, secs)| Track {
            id: id.to_string(),
            title: title.to_string(),
            author: Some("Demo Author".to_string()),
            source: url.to_string(),
            duration: Some(Duration::from_secs(secs)),
            size_bytes: None,
            display: make_display(title, Some("Demo Author")),
        })
        .collect()
}
