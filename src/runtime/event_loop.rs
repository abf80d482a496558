use std::io::Stdout;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{info, warn};

use crate::app::{App, Flow, ImportProgress, map_key};
use crate::audio::{AudioPlayer, PlaybackHandle, PlaybackInfo};
use crate::config;
use crate::library::Importer;
use crate::ui;

use super::import_worker;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Where the progress bar was last drawn; clicks inside it seek.
    pub progress_area: Option<Rect>,
    /// Messages from the running import batch, if any.
    pub import_rx: Option<Receiver<ImportProgress>>,
}

/// Main terminal event loop: input, audio events, import results and
/// drawing. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App<AudioPlayer>,
    importer: &Arc<Importer>,
    playback: &PlaybackHandle,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(paths) = app.take_import_request() {
            state.import_rx = Some(import_worker::spawn(importer.clone(), paths));
        }
        poll_import(app, state);

        for ev in app.controller.backend().drain_events() {
            app.on_audio_event(ev);
        }
        app.pump_notices(Instant::now());

        let info: PlaybackInfo = playback
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default();

        if app.take_dirty() || info.playing {
            terminal.draw(|f| state.progress_area = ui::draw(f, app, &info))?;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(cmd) = map_key(key, app.text_focus()) else {
                    continue;
                };
                if app.apply(cmd) == Flow::Quit {
                    info!("quit requested");
                    app.controller
                        .backend()
                        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                if let Some(fraction) = click_fraction(mouse, state.progress_area) {
                    app.seek_fraction(fraction);
                }
            }
            Event::Resize(_, _) => app.mark_dirty(),
            _ => {}
        }
    }
}

fn poll_import(app: &mut App<AudioPlayer>, state: &mut EventLoopState) {
    let Some(rx) = state.import_rx.as_ref() else {
        return;
    };
    loop {
        match rx.try_recv() {
            Ok(ImportProgress::Finished(result)) => {
                app.on_import(ImportProgress::Finished(result));
                state.import_rx = None;
                return;
            }
            Ok(progress) => app.on_import(progress),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("import worker exited without a result");
                app.on_import_lost();
                state.import_rx = None;
                return;
            }
        }
    }
}

/// Horizontal position of a left click inside `area`, as a fraction.
fn click_fraction(mouse: MouseEvent, area: Option<Rect>) -> Option<f64> {
    let area = area?;
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || area.width == 0 {
        return None;
    }
    let inside_x = mouse.column >= area.x && mouse.column < area.x + area.width;
    let inside_y = mouse.row >= area.y && mouse.row < area.y + area.height;
    if !(inside_x && inside_y) {
        return None;
    }
    Some(f64::from(mouse.column - area.x) / f64::from(area.width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn click_inside_bar_maps_to_fraction() {
        let bar = Some(Rect::new(10, 5, 40, 1));
        assert_eq!(click_fraction(click(10, 5), bar), Some(0.0));
        assert_eq!(click_fraction(click(30, 5), bar), Some(0.5));
    }

    #[test]
    fn clicks_outside_bar_are_ignored() {
        let bar = Some(Rect::new(10, 5, 40, 1));
        assert_eq!(click_fraction(click(9, 5), bar), None);
        assert_eq!(click_fraction(click(20, 6), bar), None);
        assert_eq!(click_fraction(click(20, 5), None), None);

        let mut right = click(20, 5);
        right.kind = MouseEventKind::Down(MouseButton::Right);
        assert_eq!(click_fraction(right, bar), None);
    }
}
