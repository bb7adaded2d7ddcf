//! Progress and bookmark store.
//!
//! One flat JSON document holds the last active track, per-track playback
//! offsets, bookmark lists and an optional library snapshot. Reads degrade
//! to "no data" and failed writes degrade the session to in-memory-only;
//! callers never see an error.

mod file;
mod model;

pub use file::StateStore;
pub use model::{Bookmark, PersistedState};

#[cfg(test)]
mod tests;
