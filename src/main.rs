use std::env;

mod config;
mod error;
mod library;
mod media;
mod mpris;
mod runtime;
mod session;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    runtime::run()
}

/// Log level comes from `HARK_LOG`; default to warnings only so log lines
/// do not fight the TUI for the terminal.
fn init_logging() {
    let level = env::var("HARK_LOG")
        .ok()
        .and_then(|v| v.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Warn);

    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();
}
