//! Source resolution and `rodio` sink construction.
//!
//! Remote locators are downloaded into the cache directory before decoding;
//! seeking is done by rebuilding the sink with `skip_duration`.

use std::fs::{self, File};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

pub(super) fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Cache file name for a remote locator: a short hash plus the original
/// extension, so repeated plays of the same URL hit the cache.
pub(super) fn cache_file_name(locator: &str) -> String {
    let mut hasher = DefaultHasher::new();
    locator.hash(&mut hasher);
    let ext = locator
        .rsplit('/')
        .next()
        .and_then(|seg| seg.rsplit_once('.'))
        .map(|(_, e)| e)
        .filter(|e| !e.is_empty() && e.len() <= 5)
        .unwrap_or("audio");
    format!("{:016x}.{ext}", hasher.finish())
}

/// Resolve `locator` to a local file, downloading remote sources into
/// `cache_dir` first.
pub(super) fn resolve_source(locator: &str, cache_dir: &Path) -> Result<PathBuf, String> {
    if !is_remote(locator) {
        let path = PathBuf::from(locator);
        if !path.is_file() {
            return Err(format!("{locator}: no such file"));
        }
        return Ok(path);
    }

    let target = cache_dir.join(cache_file_name(locator));
    if target.is_file() {
        return Ok(target);
    }

    fs::create_dir_all(cache_dir).map_err(|e| format!("{}: {e}", cache_dir.display()))?;

    let response = ureq::get(locator)
        .call()
        .map_err(|e| format!("{locator}: {e}"))?;
    let mut reader = response.into_reader();
    let mut out = File::create(&target).map_err(|e| format!("{}: {e}", target.display()))?;
    std::io::copy(&mut reader, &mut out).map_err(|e| {
        let _ = fs::remove_file(&target);
        format!("{locator}: {e}")
    })?;

    Ok(target)
}

/// Create a paused `Sink` for `path` starting at `start_at`, returning the
/// decoded duration when the decoder knows it.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;

    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| format!("{}: {e}", path.display()))?;
    let duration = source.total_duration();
    // `skip_duration` is the seeking primitive; even Duration::ZERO is fine.
    let source = source.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
