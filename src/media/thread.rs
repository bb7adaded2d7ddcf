use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use lofty::file::AudioFile;
use rodio::{OutputStreamBuilder, Sink};

use super::sink::{create_sink_at, resolve_source};
use super::types::{MediaCmd, MediaEvent, MediaEventKind};

const TICK: Duration = Duration::from_millis(200);
const POSITION_CADENCE: Duration = Duration::from_secs(1);

/// Elapsed-time accounting for the active source.
///
/// rodio gives no position readback, so elapsed time is reconstructed from
/// wall clocks: `base` is the last seek target, `accumulated` is played
/// time folded in at the rate it played at, `started_at` is the running
/// stretch.
struct Elapsed {
    base: Duration,
    accumulated: Duration,
    started_at: Option<Instant>,
    rate: f32,
}

impl Elapsed {
    fn new(rate: f32) -> Self {
        Self {
            base: Duration::ZERO,
            accumulated: Duration::ZERO,
            started_at: None,
            rate,
        }
    }

    fn position(&self) -> Duration {
        let running = self
            .started_at
            .map(|st| st.elapsed().mul_f32(self.rate.max(0.0)))
            .unwrap_or(Duration::ZERO);
        self.base + self.accumulated + running
    }

    /// Fold the running stretch into `accumulated`; call before pausing or
    /// changing the rate.
    fn fold(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed().mul_f32(self.rate.max(0.0));
        }
    }

    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn reset_at(&mut self, base: Duration, running: bool) {
        self.base = base;
        self.accumulated = Duration::ZERO;
        self.started_at = running.then(Instant::now);
    }

    fn set_rate(&mut self, rate: f32) {
        let running = self.started_at.is_some();
        self.fold();
        self.rate = rate;
        if running {
            self.start();
        }
    }
}

pub(super) fn spawn_media_thread(
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
    cache_dir: PathBuf,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut generation: u64 = 0;
        let mut path: Option<PathBuf> = None;
        let mut sink: Option<Sink> = None;
        let mut playing = false;
        let mut volume: f32 = 1.0;
        let mut rate: f32 = 1.0;
        let mut elapsed = Elapsed::new(rate);
        let mut last_position_emit = Instant::now();

        let emit = |generation: u64, kind: MediaEventKind| {
            let _ = events.send(MediaEvent { generation, kind });
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(MediaCmd::SetSource {
                    generation: next_generation,
                    locator,
                }) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    generation = next_generation;
                    playing = false;
                    elapsed = Elapsed::new(rate);
                    path = None;

                    let loaded = resolve_source(&locator, &cache_dir).and_then(|p| {
                        create_sink_at(&stream, &p, Duration::ZERO).map(|(s, d)| (p, s, d))
                    });

                    match loaded {
                        Ok((p, new_sink, decoded)) => {
                            new_sink.set_volume(volume);
                            new_sink.set_speed(rate);
                            let duration = decoded.or_else(|| probe_duration(&p));
                            path = Some(p);
                            sink = Some(new_sink);
                            emit(
                                generation,
                                MediaEventKind::MetadataReady {
                                    duration: duration.map(|d| d.as_secs_f64()),
                                },
                            );
                        }
                        Err(reason) => {
                            emit(generation, MediaEventKind::LoadFailed { reason });
                        }
                    }
                }

                Ok(MediaCmd::Play) => {
                    if let Some(s) = sink.as_ref() {
                        s.play();
                        playing = true;
                        elapsed.start();
                        emit(generation, MediaEventKind::PlayStateChanged { playing: true });
                    }
                }

                Ok(MediaCmd::Pause) => {
                    if let Some(s) = sink.as_ref() {
                        s.pause();
                        playing = false;
                        elapsed.fold();
                        emit(
                            generation,
                            MediaEventKind::PlayStateChanged { playing: false },
                        );
                    }
                }

                Ok(MediaCmd::SeekTo(seconds)) => {
                    // Scrubbing rebuilds the sink and skips into the file.
                    let Some(p) = path.as_ref() else {
                        continue;
                    };
                    let target = Duration::from_secs_f64(seconds.max(0.0));
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    match create_sink_at(&stream, p, target) {
                        Ok((new_sink, _)) => {
                            new_sink.set_volume(volume);
                            new_sink.set_speed(rate);
                            if playing {
                                new_sink.play();
                            }
                            elapsed.reset_at(target, playing);
                            sink = Some(new_sink);
                            emit(
                                generation,
                                MediaEventKind::PositionChanged {
                                    seconds: target.as_secs_f64(),
                                },
                            );
                        }
                        Err(reason) => {
                            playing = false;
                            emit(generation, MediaEventKind::LoadFailed { reason });
                        }
                    }
                }

                Ok(MediaCmd::SetVolume(v)) => {
                    volume = v;
                    if let Some(s) = sink.as_ref() {
                        s.set_volume(v);
                    }
                }

                Ok(MediaCmd::SetRate(r)) => {
                    elapsed.set_rate(r);
                    rate = r;
                    if let Some(s) = sink.as_ref() {
                        s.set_speed(r);
                    }
                }

                Ok(MediaCmd::Quit) => {
                    if let Some(s) = sink.as_ref() {
                        s.stop();
                    }
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    if !playing {
                        continue;
                    }
                    if sink.as_ref().map(|s| s.empty()).unwrap_or(false) {
                        playing = false;
                        sink = None;
                        elapsed.fold();
                        emit(generation, MediaEventKind::Ended);
                        continue;
                    }
                    if last_position_emit.elapsed() >= POSITION_CADENCE {
                        last_position_emit = Instant::now();
                        emit(
                            generation,
                            MediaEventKind::PositionChanged {
                                seconds: elapsed.position().as_secs_f64(),
                            },
                        );
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn probe_duration(path: &std::path::Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}
