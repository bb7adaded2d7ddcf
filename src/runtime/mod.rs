use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::library::{self, LibraryStore};
use crate::media::RodioMedia;
use crate::mpris::ControlCmd;
use crate::session::SessionController;
use crate::store::StateStore;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let mut store = match settings.state_path() {
        Some(path) => StateStore::open(path),
        None => {
            log::warn!("no home directory; progress and bookmarks will not persist");
            StateStore::in_memory()
        }
    };

    let tracks = library::load(&settings.library, &mut store);

    let cache_dir = settings
        .cache_dir()
        .unwrap_or_else(|| std::env::temp_dir().join("hark"));
    let (media, media_events) = RodioMedia::spawn(cache_dir);

    let mut controller =
        SessionController::new(LibraryStore::new(tracks), store, media, &settings.playback);

    startup::rehydrate(&mut controller, &settings);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &controller);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&controller);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut controller,
            &media_events,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.media().shutdown();

    run_result
}
