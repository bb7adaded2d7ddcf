use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::library::Track;

/// A named position inside a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub label: String,
    pub offset_seconds: f64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// The on-disk layout: flat, keyed by track id.
#[derive(Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub last_track: Option<String>,
    #[serde(default)]
    pub progress: HashMap<String, f64>,
    #[serde(default)]
    pub bookmarks: HashMap<String, Vec<Bookmark>>,
    /// Optional full library snapshot used as a load fallback.
    #[serde(default)]
    pub library: Option<Vec<Track>>,
}
