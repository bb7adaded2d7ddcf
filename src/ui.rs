//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It is
//! a pure consumer of controller state: nothing in here mutates playback.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::config::{ControlsSettings, UiSettings};
use crate::media::MediaControl;
use crate::session::{Phase, SessionController};

/// Presentation-only state owned by the event loop: cursor position, input
/// modes and the bookmark overlay. None of this is playback state.
pub struct UiState {
    /// Cursor position within the visible list.
    pub selected: usize,
    pub mode: InputMode,
    /// Track id whose bookmarks are shown in the overlay.
    pub overlay: Option<String>,
    /// Last advisory notice, shown until the next keypress.
    pub notice: Option<String>,
}

#[derive(PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    /// Collecting a bookmark label.
    Label(String),
}

impl UiState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            mode: InputMode::Normal,
            overlay: None,
            notice: None,
        }
    }
}

/// Format seconds as `H:MM:SS`, or `MM:SS` under an hour.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[j/k] up/down".to_string(),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] scrub -/+{}s", controls.scrub_seconds),
        "[-/+] volume".to_string(),
        "[</>] speed".to_string(),
        "[b] bookmark".to_string(),
        "[B] bookmarks".to_string(),
        "[/] search".to_string(),
        "[r] refresh".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Compute a centered rectangle constrained to `r`.
fn centered_rect(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width);
    height = height.min(r.height);
    let x = r.x + (r.width - width) / 2;
    let y = r.y + (r.height - height) / 2;
    Rect::new(x, y, width, height)
}

pub fn draw<M: MediaControl>(
    f: &mut Frame,
    ctl: &SessionController<M>,
    ui_state: &UiState,
    ui: &UiSettings,
    controls: &ControlsSettings,
) {
    let show_input = ui_state.mode != InputMode::Normal;
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(5),
    ];
    if show_input {
        constraints.push(Constraint::Length(1));
    }
    if ui.show_help {
        constraints.push(Constraint::Length(1));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    draw_header(f, ctl, ui, chunks[0]);
    draw_list(f, ctl, ui_state, chunks[1]);
    draw_status(f, ctl, ui_state, chunks[2]);

    let mut next = 3;
    if show_input {
        draw_input(f, ui_state, chunks[next]);
        next += 1;
    }
    if ui.show_help {
        let help = Paragraph::new(controls_text(controls)).dim();
        f.render_widget(help, chunks[next]);
    }

    if let Some(track_id) = ui_state.overlay.as_deref() {
        draw_bookmark_overlay(f, ctl, track_id);
    }
}

fn draw_header<M: MediaControl>(
    f: &mut Frame,
    ctl: &SessionController<M>,
    ui: &UiSettings,
    area: Rect,
) {
    let library = ctl.library();
    let stats = format!(
        "{} books / {}",
        library.len(),
        format_time(library.total_duration().as_secs_f64())
    );
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(stats)
                .title_alignment(Alignment::Right),
        );
    f.render_widget(header, area);
}

fn draw_list<M: MediaControl>(
    f: &mut Frame,
    ctl: &SessionController<M>,
    ui_state: &UiState,
    area: Rect,
) {
    let active_id = ctl.state().active_track_id.as_deref();
    let visible = ctl.visible_indices();

    let items: Vec<ListItem> = visible
        .iter()
        .filter_map(|&i| ctl.library().get(i))
        .map(|track| {
            let marker = if Some(track.id.as_str()) == active_id {
                "> "
            } else {
                "  "
            };
            let mut meta: Vec<String> = Vec::new();
            if let Some(d) = track.duration {
                meta.push(format_time(d.as_secs_f64()));
            }
            if let Some(s) = track.size_bytes {
                meta.push(format_size(s));
            }
            let bookmarks = ctl.bookmarks(&track.id).len();
            if bookmarks > 0 {
                meta.push(format!("{bookmarks} bm"));
            }
            let line = if meta.is_empty() {
                format!("{marker}{}", track.display)
            } else {
                format!("{marker}{}  ({})", track.display, meta.join(", "))
            };
            if Some(track.id.as_str()) == active_id {
                ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let empty = items.is_empty();
    let title = if ctl.state().filter_query.trim().is_empty() {
        "library".to_string()
    } else {
        format!("library (filter: {})", ctl.state().filter_query)
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().reversed());

    let mut list_state = ListState::default();
    if !empty {
        list_state.select(Some(ui_state.selected.min(visible.len().saturating_sub(1))));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status<M: MediaControl>(
    f: &mut Frame,
    ctl: &SessionController<M>,
    ui_state: &UiState,
    area: Rect,
) {
    let state = ctl.state();
    let phase = match state.phase {
        Phase::Idle => "idle",
        Phase::Loading => "loading",
        Phase::Ready => "ready",
        Phase::Playing => "playing",
        Phase::Paused => "paused",
        Phase::Ended => "ended",
    };

    let now_playing = match ctl.active_track() {
        Some(track) => {
            let time = match state.duration {
                Some(d) => format!("{} / {}", format_time(state.position), format_time(d)),
                None => format_time(state.position),
            };
            let author = track
                .author
                .as_deref()
                .map(|a| format!(" - {a}"))
                .unwrap_or_default();
            format!("{}{author}\n{time}", track.title)
        }
        None => "nothing playing".to_string(),
    };

    let settings_line = format!(
        "vol {:>3.0}% | speed {:.2}x | {phase}",
        state.volume * 100.0,
        state.rate
    );
    let body = match ui_state.notice.as_deref() {
        Some(n) => format!("{now_playing}\n{settings_line}  !  {n}"),
        None => format!("{now_playing}\n{settings_line}"),
    };

    let status =
        Paragraph::new(body).block(Block::default().borders(Borders::ALL).title("session"));
    f.render_widget(status, area);
}

fn draw_input(f: &mut Frame, ui_state: &UiState, area: Rect) {
    let text = match &ui_state.mode {
        InputMode::Filter => "search: (type to filter, enter to keep, esc to clear)".to_string(),
        InputMode::Label(buf) => format!("bookmark label: {buf}_"),
        InputMode::Normal => String::new(),
    };
    f.render_widget(Paragraph::new(text).italic(), area);
}

fn draw_bookmark_overlay<M: MediaControl>(f: &mut Frame, ctl: &SessionController<M>, track_id: &str) {
    let title = ctl
        .library()
        .by_id(track_id)
        .map(|t| t.display.clone())
        .unwrap_or_else(|| track_id.to_string());
    let bookmarks = ctl.bookmarks(track_id);

    let mut lines: Vec<String> = Vec::new();
    if bookmarks.is_empty() {
        lines.push("no bookmarks".to_string());
    } else {
        for (i, b) in bookmarks.iter().enumerate().take(9) {
            lines.push(format!(
                "{}. {} - {}",
                i + 1,
                b.label,
                format_time(b.offset_seconds)
            ));
        }
        lines.push(String::new());
        lines.push("press 1-9 to jump, esc to close".to_string());
    }

    let height = (lines.len() as u16).saturating_add(2);
    let area = centered_rect(48, height, f.area());
    f.render_widget(Clear, area);
    let popup = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("bookmarks: {title}")),
    );
    f.render_widget(popup, area);
}

/// Default label for a new bookmark, e.g. "Bookmark at 12:34".
pub fn default_bookmark_label(position: f64) -> String {
    format!("Bookmark at {}", format_time(position))
}
