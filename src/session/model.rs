/// Lifecycle of the active track.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No active track.
    Idle,
    /// A source was assigned; waiting for metadata.
    Loading,
    /// Metadata arrived and any resume seek was issued; not yet playing.
    Ready,
    Playing,
    Paused,
    /// The track ran out naturally.
    Ended,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// The live playback context, owned exclusively by the controller.
///
/// `active_track_id` is a weak reference: it is re-resolved against the
/// library on every use and may stop resolving after a reload.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub active_track_id: Option<String>,
    pub phase: Phase,
    /// Session-level volume in `[0, 1]`; persists across track changes.
    pub volume: f32,
    /// Session-level playback rate, `> 0`; persists across track changes.
    pub rate: f32,
    pub filter_query: String,
    /// Last observed position, seconds.
    pub position: f64,
    /// Known length of the active track, seconds.
    pub duration: Option<f64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            active_track_id: None,
            phase: Phase::Idle,
            volume: 1.0,
            rate: 1.0,
            filter_query: String::new(),
            position: 0.0,
            duration: None,
        }
    }
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}
