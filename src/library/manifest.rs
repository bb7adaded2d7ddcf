use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::model::{Track, make_display};

/// The library manifest: an ordered list of track records.
///
/// Matches the `books.json` layout served next to the audio files:
///
/// ```json
/// {
///   "books": [
///     { "id": "1", "title": "A Book", "author": "Someone",
///       "file": "a-book.mp3", "duration": 3600, "size": 12345678 }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub books: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    /// File reference relative to the configured base location.
    pub file: String,
    /// Known length in seconds, if the manifest carries it.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl Manifest {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve every entry against `base` into fully-qualified tracks.
    pub fn resolve(self, base: &str) -> Vec<Track> {
        self.books
            .into_iter()
            .map(|e| e.resolve(base))
            .collect()
    }
}

impl ManifestEntry {
    fn resolve(self, base: &str) -> Track {
        let source = join_source(base, &self.file);
        let display = make_display(&self.title, self.author.as_deref());
        Track {
            id: self.id,
            title: self.title,
            author: self.author,
            source,
            duration: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(Duration::from_secs_f64),
            size_bytes: self.size,
            display,
        }
    }
}

/// Join a file reference onto the base location.
///
/// URL bases get the reference percent-encoded; filesystem bases use plain
/// path joining.
fn join_source(base: &str, file: &str) -> String {
    if base.starts_with("http://") || base.starts_with("https://") {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            urlencoding::encode(file)
        )
    } else if base.is_empty() {
        file.to_string()
    } else {
        Path::new(base).join(file).display().to_string()
    }
}
