use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::PlayerError;
use crate::library::Track;

use super::model::{Bookmark, PersistedState};

/// Write-through store for session state.
///
/// Every mutation saves the whole document immediately; writes are
/// infrequent (human-triggered or position ticks) so batching is not worth
/// the lost durability.
pub struct StateStore {
    path: Option<PathBuf>,
    state: PersistedState,
}

impl StateStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file starts empty; a corrupt file is logged and treated as
    /// empty (it gets overwritten by the next write).
    pub fn open(path: PathBuf) -> Self {
        let state = match fs::read_to_string(&path) {
            Ok(body) => match serde_json::from_str(&body) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!(
                        "{}",
                        PlayerError::PersistenceUnavailable(format!(
                            "{}: corrupt state, starting empty: {e}",
                            path.display()
                        ))
                    );
                    PersistedState::default()
                }
            },
            Err(_) => PersistedState::default(),
        };

        Self {
            path: Some(path),
            state,
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: PersistedState::default(),
        }
    }

    pub fn progress(&self, track_id: &str) -> Option<f64> {
        self.state.progress.get(track_id).copied()
    }

    /// Last-write-wins, persisted immediately.
    pub fn set_progress(&mut self, track_id: &str, offset_seconds: f64) {
        self.state
            .progress
            .insert(track_id.to_string(), offset_seconds.max(0.0));
        self.save();
    }

    /// Append a bookmark; existing bookmarks for the track are never
    /// rewritten or deduplicated.
    pub fn add_bookmark(&mut self, track_id: &str, label: &str, offset_seconds: f64) -> Bookmark {
        let bookmark = Bookmark {
            label: label.to_string(),
            offset_seconds: offset_seconds.max(0.0),
            created_at: Utc::now().to_rfc3339(),
        };
        self.state
            .bookmarks
            .entry(track_id.to_string())
            .or_default()
            .push(bookmark.clone());
        self.save();
        bookmark
    }

    /// Bookmarks for a track, in insertion order.
    pub fn bookmarks(&self, track_id: &str) -> &[Bookmark] {
        self.state
            .bookmarks
            .get(track_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn last_track(&self) -> Option<&str> {
        self.state.last_track.as_deref()
    }

    pub fn set_last_track(&mut self, track_id: &str) {
        self.state.last_track = Some(track_id.to_string());
        self.save();
    }

    pub fn library_snapshot(&self) -> Vec<Track> {
        self.state.library.clone().unwrap_or_default()
    }

    pub fn set_library_snapshot(&mut self, tracks: &[Track]) {
        self.state.library = Some(tracks.to_vec());
        self.save();
    }

    fn save(&mut self) {
        let Some(path) = self.path.as_ref() else {
            return;
        };

        let result = serde_json::to_string_pretty(&self.state)
            .map_err(|e| e.to_string())
            .and_then(|body| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                fs::write(path, body).map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            log::warn!(
                "{}",
                PlayerError::PersistenceUnavailable(format!(
                    "{}: {e}; keeping state in memory for this session",
                    path.display()
                ))
            );
            self.path = None;
        }
    }
}
