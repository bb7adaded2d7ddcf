use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One playable audio-book track with a stable identity.
///
/// `id` is unique within a library load and never reassigned. `source` is a
/// fully-qualified locator (HTTP(S) URL or filesystem path) the media
/// subsystem can resolve.
#[derive(Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub source: String,
    pub duration: Option<Duration>,
    pub size_bytes: Option<u64>,
    pub display: String,
}

pub(super) fn make_display(title: &str, author: Option<&str>) -> String {
    match author {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}

/// The ordered, immutable set of known tracks.
pub struct LibraryStore {
    tracks: Vec<Track>,
}

impl LibraryStore {
    /// Build a store from `tracks`, dropping later duplicates of an id so
    /// the uniqueness invariant holds for the store's lifetime.
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut seen: Vec<String> = Vec::with_capacity(tracks.len());
        let mut unique: Vec<Track> = Vec::with_capacity(tracks.len());
        for t in tracks {
            if seen.iter().any(|s| *s == t.id) {
                log::warn!("library: dropping duplicate track id {:?}", t.id);
                continue;
            }
            seen.push(t.id.clone());
            unique.push(t);
        }
        Self { tracks: unique }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Resolve a track id back to its current index, if it still exists.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn by_id(&self, id: &str) -> Option<&Track> {
        self.index_of(id).and_then(|i| self.tracks.get(i))
    }

    /// Case-insensitive substring search over title and author.
    ///
    /// Returns the matching indices in library order; an empty or
    /// whitespace-only query returns the full range.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return (0..self.tracks.len()).collect();
        }
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                t.title.to_lowercase().contains(&q)
                    || t.author
                        .as_deref()
                        .map(|a| a.to_lowercase().contains(&q))
                        .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Total known duration across the library (tracks with unknown length
    /// contribute nothing).
    pub fn total_duration(&self) -> Duration {
        self.tracks
            .iter()
            .filter_map(|t| t.duration)
            .sum()
    }
}
