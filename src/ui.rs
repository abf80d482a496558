//! UI rendering for the terminal user interface.
//!
//! `draw` is a pure function of the `App` and the latest `PlaybackInfo`.
//! It returns the progress bar's area so the runtime can map clicks to seeks.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap},
};

use crate::app::{App, Detail, Focus, Row, ToastKind, View};
use crate::audio::PlaybackInfo;
use crate::library::{LibraryStore, Track};
use crate::player::{MediaBackend, PlayerStatus};
use crate::prefs::Theme;

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    accent: Color,
    fg: Color,
    bg: Color,
    muted: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Luxury => Palette {
            accent: Color::Rgb(212, 175, 55),
            fg: Color::Rgb(245, 236, 210),
            bg: Color::Rgb(18, 15, 10),
            muted: Color::Rgb(140, 122, 80),
        },
        Theme::Dark => Palette {
            accent: Color::White,
            fg: Color::Gray,
            bg: Color::Black,
            muted: Color::DarkGray,
        },
        Theme::Blue => Palette {
            accent: Color::Rgb(64, 156, 255),
            fg: Color::Rgb(220, 234, 250),
            bg: Color::Rgb(8, 20, 36),
            muted: Color::Rgb(90, 120, 160),
        },
        Theme::Purple => Palette {
            accent: Color::Rgb(176, 118, 235),
            fg: Color::Rgb(238, 226, 250),
            bg: Color::Rgb(22, 12, 34),
            muted: Color::Rgb(120, 96, 150),
        },
    }
}

fn controls_text(scrub_seconds: u64) -> String {
    [
        "[space] play/pause".to_string(),
        "[←/→] prev/next".to_string(),
        "[j/k] move".to_string(),
        "[enter] play/open".to_string(),
        "[tab] view".to_string(),
        "[/] search".to_string(),
        "[i] import".to_string(),
        "[a] enqueue".to_string(),
        "[o] queue".to_string(),
        "[+/-] volume".to_string(),
        "[m] mute".to_string(),
        format!("[[/]] scrub -/+{scrub_seconds}s"),
        "[^S] shuffle".to_string(),
        "[^R] repeat".to_string(),
        "[t] theme".to_string(),
        "[x] remove".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn format_track_duration(track: &Track) -> String {
    if track.has_duration() {
        format_mmss(track.duration)
    } else {
        "--:--".to_string()
    }
}

/// Visible slice of a list of `total` rows that keeps `selected` centered
/// when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn row_label(library: &LibraryStore, row: Row) -> String {
    match row {
        Row::Track(i) => library
            .get(i)
            .map(|t| {
                format!(
                    "{}  ·  {}  ·  {}  [{}]",
                    t.title,
                    t.artist,
                    t.album,
                    format_track_duration(t)
                )
            })
            .unwrap_or_default(),
        Row::Album(i) => library
            .albums()
            .get(i)
            .map(|a| {
                let year = if a.year.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", a.year)
                };
                let art = a
                    .artwork
                    .and_then(|h| library.resources().artwork_mime(h))
                    .map(|_| "  [art]")
                    .unwrap_or_default();
                format!(
                    "{}{}  ·  {}  ·  {} tracks{}",
                    a.name,
                    year,
                    a.artist,
                    a.tracks.len(),
                    art
                )
            })
            .unwrap_or_default(),
        Row::Artist(i) => library
            .artists()
            .get(i)
            .map(|a| {
                format!(
                    "{}  ·  {} albums  ·  {} tracks",
                    a.name,
                    a.album_names.len(),
                    a.tracks.len()
                )
            })
            .unwrap_or_default(),
    }
}

fn list_title<B: MediaBackend>(app: &App<B>) -> String {
    if !app.search_query().trim().is_empty() {
        return format!(" search: {} ", app.search_query());
    }
    match app.detail() {
        Some(Detail::Album(name)) => format!(" album: {name} "),
        Some(Detail::Artist(name)) => format!(" artist: {name} "),
        None => format!(" {} ", app.view().title().to_lowercase()),
    }
}

/// Render the entire UI. Returns the inner area of the progress bar.
pub fn draw<B: MediaBackend>(frame: &mut Frame, app: &App<B>, info: &PlaybackInfo) -> Option<Rect> {
    let pal = palette(app.theme());
    let base = Style::default().fg(pal.fg).bg(pal.bg);
    let border = Style::default().fg(pal.muted);
    let accent = Style::default().fg(pal.accent);

    frame.render_widget(Block::default().style(base), frame.area());

    let show_input = app.text_focus() || !app.search_query().is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if show_input { 3 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header with view tabs
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(34)])
        .split(chunks[0]);
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
    let selected_tab = View::ALL.iter().position(|v| *v == app.view()).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected_tab)
        .style(base)
        .highlight_style(accent.add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(" luxe ", accent)),
        );
    frame.render_widget(tabs, header_cols[0]);
    let header = Paragraph::new(app.ui_settings().header_text.as_str())
        .alignment(Alignment::Center)
        .style(accent)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", app.theme().display_name())),
        );
    frame.render_widget(header, header_cols[1]);

    // Search / import input
    if show_input {
        let (title, text) = match app.focus() {
            Focus::Import => (" import: paths separated by ; ", app.import_input()),
            _ => (" search ", app.search_query()),
        };
        let cursor = if app.text_focus() { "_" } else { "" };
        let input = Paragraph::new(format!("{text}{cursor}")).style(base).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if app.text_focus() { accent } else { border })
                .title(title),
        );
        frame.render_widget(input, chunks[1]);
    }

    // Main list, with the queue beside it when open
    let main_cols = if app.queue_open() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(chunks[2])
    };
    draw_rows(frame, app, main_cols[0], pal);
    if app.queue_open() {
        draw_queue(frame, app, main_cols[1], pal);
    }

    let progress = draw_now_playing(frame, app, info, chunks[3], pal);

    let footer = Paragraph::new(controls_text(app.controls().scrub_seconds))
        .style(Style::default().fg(pal.muted).bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    draw_toasts(frame, app, chunks[2], pal);

    progress
}

fn draw_rows<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect, pal: Palette) {
    let rows = app.rows();
    // Only build items for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, sel_in_window) = visible_window(rows.len(), height, app.selected());
    let current = app.controller.current_track_id();

    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|&row| {
            let label = row_label(&app.library, row);
            let playing = matches!(row, Row::Track(i)
                if app.library.get(i).map(|t| Some(&t.id) == current).unwrap_or(false));
            if playing {
                ListItem::new(format!("♪ {label}")).style(Style::default().fg(pal.accent))
            } else {
                ListItem::new(label)
            }
        })
        .collect();

    let empty_hint = app.library.is_empty() && rows.is_empty();
    let title = if empty_hint {
        " library is empty: press i to import ".to_string()
    } else {
        list_title(app)
    };

    let browsing = app.focus() == Focus::Browse;
    let list = List::new(items)
        .style(Style::default().fg(pal.fg).bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if browsing { pal.accent } else { pal.muted }))
                .title(title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(sel_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_queue<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect, pal: Palette) {
    let items: Vec<ListItem> = app
        .queue
        .entries()
        .iter()
        .enumerate()
        .map(|(n, t)| ListItem::new(format!("{}. {}  ·  {}", n + 1, t.title, t.artist)))
        .collect();
    let list = List::new(items)
        .style(Style::default().fg(pal.fg).bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.accent))
                .title(format!(" queue ({}) ", app.queue.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.queue.is_empty() {
        state.select(Some(app.queue_selected()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing<B: MediaBackend>(
    frame: &mut Frame,
    app: &App<B>,
    info: &PlaybackInfo,
    area: Rect,
    pal: Palette,
) -> Option<Rect> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(pal.muted))
        .title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let ctl = &app.controller;
    let state = ctl.state();
    let track = ctl.current_track(&app.library);

    let status = match state.status {
        PlayerStatus::Empty => "■",
        PlayerStatus::Loaded | PlayerStatus::Paused => "❚❚",
        PlayerStatus::Playing => "▶",
    };
    let song = track
        .map(|t| format!("{}  ·  {}", t.title, t.artist))
        .unwrap_or_else(|| "Nothing playing".to_string());

    let volume = ctl.volume();
    let volume_span = if volume.is_muted() {
        Span::styled("Muted", Style::default().fg(pal.muted))
    } else if volume.is_boosted() {
        Span::styled(
            format!("Vol {}% BOOST", volume.percent()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(format!("Vol {}%", volume.percent()))
    };

    let flags = format!(
        "  Shuffle: {}  Repeat: {}  ",
        if state.shuffled { "on" } else { "off" },
        state.repeat.label()
    );
    let line = Line::from(vec![
        Span::styled(format!("{status} "), Style::default().fg(pal.accent)),
        Span::raw(song),
        Span::styled(flags, Style::default().fg(pal.muted)),
        volume_span,
    ]);
    frame.render_widget(Paragraph::new(line), lines[0]);

    let total = track.map(|t| t.duration).unwrap_or(Duration::ZERO);
    let elapsed = if track.is_some() { info.elapsed } else { Duration::ZERO };
    let ratio = if total.is_zero() {
        0.0
    } else {
        (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    };
    let label = if total.is_zero() {
        format_mmss(elapsed)
    } else {
        format!("{} / {}", format_mmss(elapsed), format_mmss(total))
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(pal.accent).bg(pal.bg))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, lines[1]);

    Some(lines[1])
}

fn draw_toasts<B: MediaBackend>(frame: &mut Frame, app: &App<B>, area: Rect, pal: Palette) {
    let toasts = app.toasts();
    if toasts.is_empty() || area.height < 3 {
        return;
    }
    let width = toasts
        .iter()
        .map(|t| t.text.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .min(area.width.saturating_sub(2));
    let height = (toasts.len() as u16 + 2).min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };
    frame.render_widget(Clear, rect);

    let lines: Vec<Line> = toasts
        .iter()
        .map(|t| {
            let color = match t.kind {
                ToastKind::Info => pal.fg,
                ToastKind::Success => Color::Green,
                ToastKind::Warning => Color::Yellow,
                ToastKind::Error => Color::Red,
            };
            Line::from(Span::styled(t.text.as_str(), Style::default().fg(color)))
        })
        .collect();
    let popup = Paragraph::new(lines)
        .style(Style::default().bg(pal.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.accent)),
        );
    frame.render_widget(popup, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmss_formatting() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(185)), "03:05");
    }

    #[test]
    fn window_keeps_selection_centered() {
        assert_eq!(visible_window(5, 10, 3), (0, 5, 3));
        assert_eq!(visible_window(100, 10, 50), (45, 55, 5));
        assert_eq!(visible_window(100, 10, 2), (0, 10, 2));
        assert_eq!(visible_window(100, 10, 99), (90, 100, 9));
    }

    #[test]
    fn every_theme_has_distinct_accent() {
        let accents: Vec<Color> = Theme::ALL.iter().map(|t| palette(*t).accent).collect();
        for (i, a) in accents.iter().enumerate() {
            assert!(!accents[i + 1..].contains(a));
        }
    }
}
