//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Instant};

use crate::app::{App, InputMode, NoticeKind};
use crate::config::UiSettings;
use crate::player::{PlaybackState, PlayerState};
use crate::visualizer;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "select");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    map.insert("+/-", "volume");
    map.insert("u", "upload");
    map.insert("x", "remove");
    map.insert("o", "logout");
    map.insert("r", "refresh");
    map.insert("q", "quit");
    map
});

/// What the UI needs to know about the controller for one frame.
pub struct View<'a> {
    pub state: &'a PlayerState,
    pub visual: Option<visualizer::Frame>,
    pub authenticated: bool,
    pub remote: bool,
}

/// Render the controls help text for the active track source.
fn controls_text(remote: bool, authenticated: bool) -> String {
    let order: &[&str] = match (remote, authenticated) {
        (true, _) => &["j/k", "h/l", "enter", "space/p", "+/-", "r", "q"],
        (false, false) => &["j/k", "h/l", "enter", "space/p", "+/-", "u", "q"],
        (false, true) => &["j/k", "h/l", "enter", "space/p", "+/-", "u", "x", "o", "q"],
    };
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Status line under the track name.
pub fn status_text(state: &PlayerState, remote: bool, authenticated: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    if state.tracks.is_empty() {
        parts.push(if remote {
            "No tracks".to_string()
        } else {
            "No tracks • Press u to upload".to_string()
        });
    } else {
        if !state.current_valid {
            parts.push(if remote {
                "Track unavailable".to_string()
            } else {
                "Track unavailable • Upload new".to_string()
            });
        } else if state.playback == PlaybackState::Playing {
            parts.push("Playing".to_string());
        } else {
            parts.push("Ready".to_string());
        }
        let n = state.tracks.len();
        parts.push(format!("{n} track{}", if n == 1 { "" } else { "s" }));
    }
    if authenticated {
        parts.push("ADMIN".to_string());
    }
    parts.join(" • ")
}

const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draw bar heights (canvas fractions) as `rows` lines of `width` block characters.
pub fn bar_lines(bars: &[f64], width: usize, rows: usize) -> Vec<String> {
    if bars.is_empty() || width == 0 || rows == 0 {
        return vec![String::new(); rows];
    }
    // Resample to the available width.
    let columns: Vec<usize> = (0..width)
        .map(|x| {
            let h = bars[x * bars.len() / width].clamp(0.0, 1.0);
            (h * (rows * 8) as f64).round() as usize
        })
        .collect();

    (0..rows)
        .map(|row| {
            let floor = (rows - 1 - row) * 8;
            columns
                .iter()
                .map(|&eighths| LEVELS[eighths.saturating_sub(floor).min(8)])
                .collect()
        })
        .collect()
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn draw_player(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::bordered().title(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    if let Some(visual) = &view.visual {
        let lines = bar_lines(&visual.bars, cols[0].width as usize, cols[0].height as usize);
        let style = match (visual.mode, visual.dimmed) {
            (visualizer::VisualMode::Spectrum, _) => Style::default().fg(Color::Magenta),
            (_, true) => Style::default().fg(Color::DarkGray),
            (_, false) => Style::default().fg(Color::Cyan),
        };
        let bars = Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>()).style(style);
        frame.render_widget(bars, cols[0]);
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(cols[1]);

    let state = view.state;
    let mut title = Style::default().add_modifier(Modifier::BOLD);
    if !state.current_valid && state.current.is_some() {
        title = title.fg(Color::Red);
    }
    frame.render_widget(
        Paragraph::new(Span::styled(state.track_name.as_str(), title)).block(Block::default().padding(left_pad())),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(status_text(state, view.remote, view.authenticated))
            .block(Block::default().padding(left_pad())),
        rows[1],
    );

    let pct = (state.volume * 100.0).round() as u16;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(f64::from(state.volume.clamp(0.0, 1.0)))
        .label(format!("vol {pct}%"));
    frame.render_widget(gauge, rows[3]);
}

fn draw_tracks(frame: &mut Frame, area: Rect, app: &App, view: &View) {
    let state = view.state;
    let items: Vec<ListItem> = state
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if state.current == Some(i) {
                match state.playback {
                    PlaybackState::Playing => "▶ ",
                    _ => "• ",
                }
            } else {
                "  "
            };
            let mut spans = vec![Span::raw(marker), Span::raw(t.name.as_str())];
            if view.authenticated && !view.remote {
                if t.is_builtin() {
                    spans.push(Span::styled("  (built-in)", Style::default().fg(Color::DarkGray)));
                } else {
                    spans.push(Span::styled("  (custom)", Style::default().fg(Color::Yellow)));
                }
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if view.authenticated && !view.remote {
        " track manager "
    } else {
        " tracks "
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if !state.tracks.is_empty() {
        list_state.select(Some(app.selected.min(state.tracks.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_prompt(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.mode {
        InputMode::Normal => return,
        InputMode::Password => " admin password ",
        InputMode::FilePath => " upload audio file ",
    };
    let popup = centered_rect_sized(60, 5, area);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from(format!("{}_", app.visible_input())),
        Line::from("[enter] confirm | [esc] cancel".dark_gray()),
    ];
    let prompt = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).padding(left_pad()).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(prompt, popup);
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, view: &View, ui_settings: &UiSettings, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" jukon ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_player(frame, chunks[1], view);
    draw_tracks(frame, chunks[2], app, view);

    let mut footer_lines = vec![Line::from(controls_text(view.remote, view.authenticated))];
    if let Some(notice) = app.active_notice(now) {
        let style = match notice.kind {
            NoticeKind::Info => Style::default().fg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        footer_lines.push(Line::from(Span::styled(notice.text.as_str(), style)));
    }
    let footer = Paragraph::new(footer_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    draw_prompt(frame, chunks[2], app);
}
