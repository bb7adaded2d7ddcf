use crate::config::PlaybackSettings;
use crate::error::PlayerError;
use crate::library::{LibraryStore, Track};
use crate::media::{MediaControl, MediaEvent, MediaEventKind};
use crate::store::{Bookmark, StateStore};

use super::model::{Phase, SessionState};

/// The playback state machine.
///
/// Driven one event/intent at a time by a single caller. Every operation
/// against an absent or invalid active track is a no-op, never an error:
/// the UI is allowed to race ahead of the media lifecycle and call things
/// in any order.
pub struct SessionController<M: MediaControl> {
    library: LibraryStore,
    store: StateStore,
    media: M,
    state: SessionState,
    /// Bumped on every source assignment; media events carrying an older
    /// value belong to a superseded track and are dropped.
    generation: u64,
    autoplay_on_ready: bool,
    /// One-shot seek target that overrides stored progress on the next
    /// metadata-ready (bookmark jumps).
    pending_seek: Option<f64>,
    notices: Vec<PlayerError>,
}

impl<M: MediaControl> SessionController<M> {
    pub fn new(
        library: LibraryStore,
        store: StateStore,
        media: M,
        playback: &PlaybackSettings,
    ) -> Self {
        let state = SessionState {
            volume: playback.volume.clamp(0.0, 1.0),
            rate: if playback.rate > 0.0 { playback.rate } else { 1.0 },
            ..SessionState::default()
        };

        Self {
            library,
            store,
            media,
            state,
            generation: 0,
            autoplay_on_ready: false,
            pending_seek: None,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn library(&self) -> &LibraryStore {
        &self.library
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// The active track, re-resolved against the current library.
    pub fn active_track(&self) -> Option<&Track> {
        self.state
            .active_track_id
            .as_deref()
            .and_then(|id| self.library.by_id(id))
    }

    /// Library indices visible under the current filter, in library order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.library.search(&self.state.filter_query)
    }

    pub fn bookmarks(&self, track_id: &str) -> &[Bookmark] {
        self.store.bookmarks(track_id)
    }

    /// Drain queued advisory notices for the presentation layer.
    pub fn take_notices(&mut self) -> Vec<PlayerError> {
        std::mem::take(&mut self.notices)
    }

    // ---- intents ----------------------------------------------------

    /// Select the track at `index` within the visible range and play it.
    /// Out-of-range indices are logged no-ops.
    pub fn select_track(&mut self, index: usize) {
        let visible = self.visible_indices();
        match visible.get(index) {
            Some(&lib_index) => self.load_track_at(lib_index, true),
            None => log::debug!("{}: visible index {index}", PlayerError::InvalidSelection),
        }
    }

    /// Rehydrate the persisted last track without starting playback.
    pub fn resume_last(&mut self) {
        let Some(index) = self
            .store
            .last_track()
            .and_then(|id| self.library.index_of(id))
        else {
            return;
        };
        self.load_track_at(index, false);
    }

    pub fn toggle_play(&mut self) {
        match self.state.phase {
            Phase::Playing => {
                self.media.pause();
                self.state.phase = Phase::Paused;
            }
            Phase::Paused | Phase::Ready | Phase::Ended => {
                self.media.play();
                self.state.phase = Phase::Playing;
            }
            Phase::Loading => {
                // The UI raced ahead of the load; flip what happens on ready.
                self.autoplay_on_ready = !self.autoplay_on_ready;
            }
            Phase::Idle => {
                // Retry a failed active track, otherwise start from the top.
                if let Some(index) = self
                    .state
                    .active_track_id
                    .as_deref()
                    .and_then(|id| self.library.index_of(id))
                {
                    self.load_track_at(index, true);
                } else {
                    self.select_track(0);
                }
            }
        }
    }

    /// Move to the neighbouring track in the full library, wrapping at both
    /// ends. No-op on an empty library.
    pub fn advance(&mut self, direction: i64) {
        if self.library.is_empty() {
            return;
        }
        let len = self.library.len();

        let next = match self.active_index() {
            Some(current) => (current as i64 + direction).rem_euclid(len as i64) as usize,
            // No active track: next starts at the top, previous at the end.
            None if direction >= 0 => 0,
            None => len - 1,
        };
        self.load_track_at(next, true);
    }

    /// Seek by `delta` seconds, clamped to `[0, duration]`. Unknown
    /// duration means the clamp is impossible, so this is a no-op.
    pub fn seek_relative(&mut self, delta: f64) {
        let Some(duration) = self.state.duration else {
            return;
        };
        let target = (self.state.position + delta).clamp(0.0, duration);
        self.media.seek_to(target);
        self.state.position = target;
    }

    /// Seek to `fraction` of the duration; fraction is clamped to `[0, 1]`.
    pub fn seek_absolute(&mut self, fraction: f64) {
        let Some(duration) = self.state.duration else {
            return;
        };
        let target = fraction.clamp(0.0, 1.0) * duration;
        self.media.seek_to(target);
        self.state.position = target;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.state.volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(self.state.volume);
    }

    pub fn set_rate(&mut self, rate: f32) {
        if !(rate > 0.0) {
            return;
        }
        self.state.rate = rate;
        self.media.set_rate(rate);
    }

    pub fn search(&mut self, query: &str) {
        self.state.filter_query = query.to_string();
    }

    /// Bookmark the current position of the active track. Returns `None`
    /// ("unavailable") when no track is active.
    pub fn add_bookmark(&mut self, label: &str) -> Option<Bookmark> {
        let id = self.state.active_track_id.clone()?;
        Some(self.store.add_bookmark(&id, label, self.state.position))
    }

    /// Jump to bookmark `index` of `track_id`. A bookmark on the active
    /// track seeks directly; on another track it loads that track and seeks
    /// once metadata is in. Unknown ids or indices are no-ops.
    pub fn jump_to_bookmark(&mut self, track_id: &str, index: usize) {
        let Some(offset) = self
            .store
            .bookmarks(track_id)
            .get(index)
            .map(|b| b.offset_seconds)
        else {
            log::debug!("{}: bookmark {track_id}/{index}", PlayerError::InvalidSelection);
            return;
        };

        let is_active = self.state.active_track_id.as_deref() == Some(track_id);
        if is_active {
            if let Some(duration) = self.state.duration {
                let target = offset.clamp(0.0, duration);
                self.media.seek_to(target);
                self.state.position = target;
                return;
            }
            // Still loading: divert the pending resume seek instead.
            self.pending_seek = Some(offset);
            return;
        }

        let Some(lib_index) = self.library.index_of(track_id) else {
            log::debug!("{}: track {track_id}", PlayerError::InvalidSelection);
            return;
        };
        self.load_track_at(lib_index, true);
        self.pending_seek = Some(offset);
    }

    /// Replace the library wholesale. A stale active id simply stops
    /// resolving; no state is patched up.
    pub fn reload_library(&mut self, tracks: Vec<Track>) {
        self.library = LibraryStore::new(tracks);
    }

    /// Re-run the library source chain and replace the library wholesale.
    pub fn refresh_library(&mut self, settings: &crate::config::LibrarySettings) {
        let tracks = crate::library::load(settings, &mut self.store);
        self.reload_library(tracks);
    }

    // ---- media events -----------------------------------------------

    pub fn on_media_event(&mut self, event: MediaEvent) {
        if event.generation != self.generation {
            log::debug!(
                "media: dropping stale event (gen {} != {})",
                event.generation,
                self.generation
            );
            return;
        }

        match event.kind {
            MediaEventKind::MetadataReady { duration } => self.on_metadata_ready(duration),
            MediaEventKind::PositionChanged { seconds } => {
                self.state.position = seconds;
                if let Some(id) = self.state.active_track_id.clone() {
                    self.store.set_progress(&id, seconds);
                }
            }
            MediaEventKind::PlayStateChanged { playing } => {
                if playing {
                    self.state.phase = Phase::Playing;
                } else if self.state.phase == Phase::Playing {
                    self.state.phase = Phase::Paused;
                }
            }
            MediaEventKind::Ended => {
                self.state.phase = Phase::Ended;
                self.advance(1);
            }
            MediaEventKind::LoadFailed { reason } => {
                self.autoplay_on_ready = false;
                self.pending_seek = None;
                self.state.phase = Phase::Idle;
                self.state.duration = None;
                self.notices
                    .push(PlayerError::MediaPlaybackRejected(reason));
            }
        }
    }

    /// `Loading -> Ready`: apply session settings, then seek to the resume
    /// offset, then (maybe) play. The seek must be issued before play so
    /// already-heard audio never replays.
    fn on_metadata_ready(&mut self, duration: Option<f64>) {
        if self.state.phase != Phase::Loading {
            return;
        }

        self.state.duration = duration.or_else(|| {
            self.active_track()
                .and_then(|t| t.duration)
                .map(|d| d.as_secs_f64())
        });

        self.media.set_volume(self.state.volume);
        self.media.set_rate(self.state.rate);

        let resume = self.pending_seek.take().or_else(|| {
            self.state
                .active_track_id
                .as_deref()
                .and_then(|id| self.store.progress(id))
        });
        if let Some(offset) = resume.filter(|o| *o > 0.0) {
            let target = match self.state.duration {
                Some(d) => offset.clamp(0.0, d),
                None => offset,
            };
            self.media.seek_to(target);
            self.state.position = target;
        }

        self.state.phase = Phase::Ready;
        if self.autoplay_on_ready {
            self.autoplay_on_ready = false;
            self.media.play();
            self.state.phase = Phase::Playing;
        }
    }

    // ---- internals --------------------------------------------------

    fn active_index(&self) -> Option<usize> {
        self.state
            .active_track_id
            .as_deref()
            .and_then(|id| self.library.index_of(id))
    }

    fn load_track_at(&mut self, lib_index: usize, autoplay: bool) {
        let Some(track) = self.library.get(lib_index) else {
            log::debug!("{}: library index {lib_index}", PlayerError::InvalidSelection);
            return;
        };
        let id = track.id.clone();
        let source = track.source.clone();

        self.generation += 1;
        self.state.active_track_id = Some(id.clone());
        self.state.phase = Phase::Loading;
        self.state.position = 0.0;
        self.state.duration = None;
        self.autoplay_on_ready = autoplay;
        // A leftover bookmark seek belongs to the previous load.
        self.pending_seek = None;

        self.store.set_last_track(&id);
        self.media.set_source(self.generation, &source);
    }
}
