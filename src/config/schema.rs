use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/hark/config.toml` or
/// `~/.config/hark/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `HARK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub state: StateSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// URL of the `books.json` manifest. Unset disables the remote source.
    pub manifest_url: Option<String>,
    /// Base location manifest file references are resolved against.
    pub base_url: Option<String>,
    /// Local audio-book folder used as a scan source.
    pub books_dir: Option<String>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while scanning.
    pub follow_links: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            manifest_url: None,
            base_url: None,
            books_dir: None,
            extensions: vec![
                "mp3".into(),
                "m4a".into(),
                "m4b".into(),
                "flac".into(),
                "ogg".into(),
                "opus".into(),
                "wav".into(),
            ],
            follow_links: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume, `0.0 ..= 1.0`.
    pub volume: f32,
    /// Initial playback rate; must be positive.
    pub rate: f32,
    /// Whether to reload the last listened track at startup (paused).
    pub resume_last: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            rate: 1.0,
            resume_last: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per keypress, in percent.
    pub volume_step: u8,
    /// Playback-rate change per keypress.
    pub rate_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 10,
            volume_step: 10,
            rate_step: 0.25,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Override for the state file; defaults under the XDG data dir.
    pub path: Option<String>,
    /// Override for the download cache; defaults under the XDG cache dir.
    pub cache_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the controls help line is rendered.
    pub show_help: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ hark: listen on ~ ".to_string(),
            show_help: true,
        }
    }
}
