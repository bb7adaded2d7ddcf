use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Track, make_display};

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Scan a local audio-book folder into tracks.
///
/// The track id is the path relative to `dir`, which stays stable across
/// rescans as long as the file does not move.
pub(super) fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(depth) = settings.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, &settings.extensions) {
            continue;
        }

        let default_title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut title = default_title;
        let mut author: Option<String> = None;
        let mut duration = None;
        let mut size_bytes = None;

        if let Ok(meta) = path.metadata() {
            size_bytes = Some(meta.len());
        }

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        author = Some(v.to_string());
                    }
                }
            }
        }

        let id = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .display()
            .to_string();
        let display = make_display(&title, author.as_deref());

        tracks.push(Track {
            id,
            title,
            author,
            source: path.display().to_string(),
            duration,
            size_bytes,
            display,
        });
    }

    tracks.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    tracks
}
