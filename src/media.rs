//! Media subsystem: the playback seam the session controller drives.
//!
//! `MediaControl` is the command surface; `MediaEvent`s come back tagged
//! with the generation of the source they belong to, so a late event for a
//! superseded track can be recognized and dropped. The shipped
//! implementation runs rodio on a dedicated audio thread.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioMedia;
pub use types::{MediaControl, MediaEvent, MediaEventKind};

#[cfg(test)]
mod tests;
