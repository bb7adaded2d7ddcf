use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use super::thread::spawn_media_thread;
use super::types::{MediaCmd, MediaControl, MediaEvent};

/// Handle to the rodio audio thread.
///
/// Owns the command channel; events arrive on the receiver returned from
/// [`RodioMedia::spawn`], to be drained by the runtime loop.
pub struct RodioMedia {
    tx: Sender<MediaCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioMedia {
    pub fn spawn(cache_dir: PathBuf) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

        let join = spawn_media_thread(rx, event_tx, cache_dir);

        (
            Self {
                tx,
                join: Mutex::new(Some(join)),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: MediaCmd) {
        let _ = self.tx.send(cmd);
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        self.send(MediaCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaControl for RodioMedia {
    fn set_source(&mut self, generation: u64, locator: &str) {
        self.send(MediaCmd::SetSource {
            generation,
            locator: locator.to_string(),
        });
    }

    fn play(&mut self) {
        self.send(MediaCmd::Play);
    }

    fn pause(&mut self) {
        self.send(MediaCmd::Pause);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.send(MediaCmd::SeekTo(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(MediaCmd::SetVolume(volume));
    }

    fn set_rate(&mut self, rate: f32) {
        self.send(MediaCmd::SetRate(rate));
    }
}
