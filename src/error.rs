//! Error taxonomy shared across the player.
//!
//! Failures are contained at the component that hit them: library sources
//! fall through to the next source, persistence degrades to in-memory and
//! playback failures become UI notices. Nothing here is fatal.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PlayerError {
    /// A library source could not be read; the loader moves on.
    #[error("library source unavailable: {0}")]
    SourceUnavailable(String),

    /// An out-of-range index or an intent against no active track.
    #[error("invalid selection")]
    InvalidSelection,

    /// The state file could not be read or written.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// The media subsystem refused to load or decode a source.
    #[error("playback rejected: {0}")]
    MediaPlaybackRejected(String),
}
