//! Command and event types shared between the controller and the audio
//! thread.

/// Exclusive command surface over the single playback resource.
///
/// All mutations of source, position, volume and rate go through here so
/// the controller's ordering guarantees (seek before play) hold.
pub trait MediaControl {
    /// Assign a new source. `generation` tags every event the subsystem
    /// emits for this source.
    fn set_source(&mut self, generation: u64, locator: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);
    fn set_rate(&mut self, rate: f32);
}

#[derive(Debug)]
pub(super) enum MediaCmd {
    SetSource { generation: u64, locator: String },
    Play,
    Pause,
    SeekTo(f64),
    SetVolume(f32),
    SetRate(f32),
    Quit,
}

/// An asynchronous notification from the media subsystem.
#[derive(Debug, Clone)]
pub struct MediaEvent {
    /// Generation of the source this event belongs to.
    pub generation: u64,
    pub kind: MediaEventKind,
}

#[derive(Debug, Clone)]
pub enum MediaEventKind {
    /// The source is decoded and ready; duration may still be unknown.
    MetadataReady { duration: Option<f64> },
    /// Periodic position report while playing, and after a seek.
    PositionChanged { seconds: f64 },
    PlayStateChanged { playing: bool },
    /// Natural end of the current source.
    Ended,
    /// The source could not be fetched or decoded.
    LoadFailed { reason: String },
}
