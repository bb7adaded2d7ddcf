use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config;
use crate::media::{MediaEvent, RodioMedia};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::session::{Phase, SessionController};
use crate::ui::{self, InputMode, UiState};

type Controller = SessionController<RodioMedia>;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    pub ui: UiState,
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
    /// Last-known active track as emitted to MPRIS.
    last_mpris_track: Option<String>,
    /// Last-known phase as emitted to MPRIS.
    last_mpris_phase: Phase,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from the controller.
    pub fn new(controller: &Controller) -> Self {
        Self {
            ui: UiState::new(),
            pending_gg: false,
            last_mpris_track: controller.state().active_track_id.clone(),
            last_mpris_phase: controller.state().phase,
        }
    }
}

/// Main terminal event loop: feeds media events and control commands into
/// the controller, handles input and draws. Returns `Ok(())` on shutdown.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller,
    media_events: &Receiver<MediaEvent>,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Media lifecycle first, so the frame below reflects it.
        while let Ok(ev) = media_events.try_recv() {
            controller.on_media_event(ev);
        }

        for notice in controller.take_notices() {
            log::warn!("{notice}");
            state.ui.notice = Some(notice.to_string());
        }

        // Keep MPRIS in sync even when changes come from auto-advance or
        // media keys rather than our own key handling.
        let track = controller.state().active_track_id.clone();
        let phase = controller.state().phase;
        if track != state.last_mpris_track || phase != state.last_mpris_phase {
            update_mpris(mpris, controller);
            state.last_mpris_track = track;
            state.last_mpris_phase = phase;
        }

        clamp_selection(controller, &mut state.ui);
        terminal.draw(|f| ui::draw(f, controller, &state.ui, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Keep the cursor inside the visible list after filter or library changes.
fn clamp_selection(controller: &Controller, ui: &mut UiState) {
    let visible = controller.visible_indices();
    if visible.is_empty() {
        ui.selected = 0;
    } else if ui.selected >= visible.len() {
        ui.selected = visible.len() - 1;
    }
}

fn handle_control_cmd(cmd: ControlCmd, controller: &mut Controller) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if !controller.state().is_playing() {
                controller.toggle_play();
            }
        }
        ControlCmd::Pause => {
            if controller.state().is_playing() {
                controller.toggle_play();
            }
        }
        ControlCmd::PlayPause => controller.toggle_play(),
        ControlCmd::Next => controller.advance(1),
        ControlCmd::Prev => controller.advance(-1),
        ControlCmd::SeekBy(secs) => controller.seek_relative(secs),
    }
    false
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut Controller,
    state: &mut EventLoopState,
) -> bool {
    state.ui.notice = None;

    // The bookmark overlay swallows input until it is closed.
    if let Some(track_id) = state.ui.overlay.clone() {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = (c as usize) - ('1' as usize);
                controller.jump_to_bookmark(&track_id, index);
                state.ui.overlay = None;
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('B') => {
                state.ui.overlay = None;
            }
            _ => {}
        }
        return false;
    }

    match &mut state.ui.mode {
        InputMode::Filter => {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => {
                    controller.search("");
                    state.ui.mode = InputMode::Normal;
                }
                KeyCode::Enter => {
                    state.ui.mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    let mut q = controller.state().filter_query.clone();
                    q.pop();
                    controller.search(&q);
                }
                KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    move_selection(controller, &mut state.ui, 1);
                }
                KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    move_selection(controller, &mut state.ui, -1);
                }
                KeyCode::Char(c) if !c.is_control() => {
                    let mut q = controller.state().filter_query.clone();
                    q.push(c);
                    controller.search(&q);
                }
                _ => {}
            }
            return false;
        }
        InputMode::Label(buf) => {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => {
                    state.ui.mode = InputMode::Normal;
                }
                KeyCode::Enter => {
                    let label = buf.clone();
                    state.ui.mode = InputMode::Normal;
                    state.ui.notice = match controller.add_bookmark(&label) {
                        Some(b) => Some(format!("bookmark \"{}\" added", b.label)),
                        None => Some("bookmark unavailable: nothing playing".to_string()),
                    };
                }
                KeyCode::Backspace => {
                    buf.pop();
                }
                KeyCode::Char(c) if !c.is_control() => {
                    buf.push(c);
                }
                _ => {}
            }
            return false;
        }
        InputMode::Normal => {}
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            state.ui.mode = InputMode::Filter;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            move_selection(controller, &mut state.ui, 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            move_selection(controller, &mut state.ui, -1);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                state.ui.selected = 0;
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            let visible = controller.visible_indices();
            state.ui.selected = visible.len().saturating_sub(1);
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            controller.select_track(state.ui.selected);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            controller.toggle_play();
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            controller.advance(1);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            controller.advance(-1);
        }
        KeyCode::Char('L') | KeyCode::Right => {
            state.pending_gg = false;
            controller.seek_relative(settings.controls.scrub_seconds as f64);
        }
        KeyCode::Char('H') | KeyCode::Left => {
            state.pending_gg = false;
            controller.seek_relative(-(settings.controls.scrub_seconds as f64));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            let step = settings.controls.volume_step as f32 / 100.0;
            controller.set_volume(controller.state().volume + step);
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            let step = settings.controls.volume_step as f32 / 100.0;
            controller.set_volume(controller.state().volume - step);
        }
        KeyCode::Char('>') | KeyCode::Char('.') => {
            state.pending_gg = false;
            controller.set_rate(controller.state().rate + settings.controls.rate_step);
        }
        KeyCode::Char('<') | KeyCode::Char(',') => {
            state.pending_gg = false;
            controller.set_rate(controller.state().rate - settings.controls.rate_step);
        }
        KeyCode::Char('b') => {
            state.pending_gg = false;
            let position = controller.state().position;
            if controller.state().active_track_id.is_some() {
                state.ui.mode = InputMode::Label(ui::default_bookmark_label(position));
            } else {
                state.ui.notice = Some("bookmark unavailable: nothing playing".to_string());
            }
        }
        KeyCode::Char('B') => {
            state.pending_gg = false;
            let visible = controller.visible_indices();
            if let Some(track) = visible
                .get(state.ui.selected)
                .and_then(|&i| controller.library().get(i))
            {
                state.ui.overlay = Some(track.id.clone());
            }
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            controller.refresh_library(&settings.library);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}

fn move_selection(controller: &Controller, ui: &mut UiState, delta: i64) {
    let len = controller.visible_indices().len();
    if len == 0 {
        return;
    }
    let next = (ui.selected as i64 + delta).rem_euclid(len as i64);
    ui.selected = next as usize;
}
