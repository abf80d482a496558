//! Application model: `App` owns the library, the playback controller and
//! the queue, plus everything the view needs to know about navigation.
//!
//! All mutation happens on the UI thread through `apply`, `on_audio_event`
//! and `on_import`.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::audio::{AudioEvent, SourceEvent};
use crate::config::{ControlsSettings, Settings, UiSettings};
use crate::library::{ImportError, ImportedFile, LibraryStore, TrackId};
use crate::notify::{Notice, Notifier};
use crate::player::{MAX_VOLUME_PERCENT, MediaBackend, PlaybackController, PlaybackError};
use crate::prefs::{PrefsStore, Theme};
use crate::queue::{Queue, QueueError};

use super::command::{Command, TextEdit};

const MAX_TOASTS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    All,
    Albums,
    Artists,
}

impl View {
    pub const ALL: [View; 3] = [View::All, View::Albums, View::Artists];

    pub fn next(self) -> Self {
        match self {
            View::All => View::Albums,
            View::Albums => View::Artists,
            View::Artists => View::All,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::All => "All",
            View::Albums => "Albums",
            View::Artists => "Artists",
        }
    }
}

/// Drill-down into one album or artist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Detail {
    Album(String),
    Artist(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Browse,
    Search,
    Import,
    Queue,
}

/// One line of the main list. Indices point into the library.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Track(usize),
    Album(usize),
    Artist(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    expires_at: Instant,
}

/// Messages from the background import worker.
#[derive(Debug)]
pub enum ImportProgress {
    Started(usize),
    Finished(Result<Vec<ImportedFile>, ImportError>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<B: MediaBackend> {
    pub library: LibraryStore,
    pub controller: PlaybackController<B>,
    pub queue: Queue,

    notifier: Notifier,
    notices: Receiver<Notice>,
    toasts: Vec<Toast>,
    dirty: bool,

    view: View,
    detail: Option<Detail>,
    focus: Focus,
    selected: usize,
    queue_selected: usize,
    search: String,
    import_input: String,
    pending_import: Option<Vec<PathBuf>>,
    importing: bool,

    theme: Theme,
    prefs: PrefsStore,
    ui: UiSettings,
    controls: ControlsSettings,
}

impl<B: MediaBackend> App<B> {
    pub fn new(backend: B, settings: &Settings, prefs: PrefsStore) -> Self {
        let (notifier, notices) = Notifier::channel();
        let mut controller =
            PlaybackController::new(backend, notifier.clone(), settings.audio.initial_volume);
        controller.set_shuffle(settings.playback.shuffle);
        controller.set_repeat(settings.playback.repeat.into());
        if let Err(e) = controller.sync_gain() {
            warn!(error = %e, "could not apply initial volume");
        }
        let theme = prefs.load_theme();

        Self {
            library: LibraryStore::new(),
            controller,
            queue: Queue::new(notifier.clone()),
            notifier,
            notices,
            toasts: Vec::new(),
            dirty: true,
            view: View::default(),
            detail: None,
            focus: Focus::default(),
            selected: 0,
            queue_selected: 0,
            search: String::new(),
            import_input: String::new(),
            pending_import: None,
            importing: false,
            theme,
            prefs,
            ui: settings.ui.clone(),
            controls: settings.controls.clone(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether a text input currently owns the keyboard.
    pub fn text_focus(&self) -> bool {
        matches!(self.focus, Focus::Search | Focus::Import)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn queue_selected(&self) -> usize {
        self.queue_selected
    }

    pub fn queue_open(&self) -> bool {
        self.focus == Focus::Queue
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    pub fn import_input(&self) -> &str {
        &self.import_input
    }

    pub fn is_importing(&self) -> bool {
        self.importing
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn ui_settings(&self) -> &UiSettings {
        &self.ui
    }

    pub fn controls(&self) -> &ControlsSettings {
        &self.controls
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True once since the last call if anything visible changed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Rows of the main list for the current view, detail and search.
    pub fn rows(&self) -> Vec<Row> {
        if !self.search.trim().is_empty() {
            return self
                .library
                .search_indices(&self.search)
                .into_iter()
                .map(Row::Track)
                .collect();
        }

        match &self.detail {
            Some(Detail::Album(name)) => self
                .library
                .album(name)
                .map(|a| self.track_rows(a.tracks.iter().map(|t| &t.id)))
                .unwrap_or_default(),
            Some(Detail::Artist(name)) => self
                .library
                .artist(name)
                .map(|a| self.track_rows(a.tracks.iter().map(|t| &t.id)))
                .unwrap_or_default(),
            None => match self.view {
                View::All => (0..self.library.len()).map(Row::Track).collect(),
                View::Albums => (0..self.library.albums().len()).map(Row::Album).collect(),
                View::Artists => (0..self.library.artists().len()).map(Row::Artist).collect(),
            },
        }
    }

    fn track_rows<'a>(&self, ids: impl Iterator<Item = &'a TrackId>) -> Vec<Row> {
        ids.filter_map(|id| self.library.index_of(id))
            .map(Row::Track)
            .collect()
    }

    fn selected_row(&self) -> Option<Row> {
        self.rows().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.queue_selected >= self.queue.len() {
            self.queue_selected = self.queue.len().saturating_sub(1);
        }
    }

    pub fn apply(&mut self, cmd: Command) -> Flow {
        self.dirty = true;
        match cmd {
            Command::Quit => return Flow::Quit,
            Command::Edit(edit) => self.edit(edit),
            Command::TogglePlay => {
                let r = self.controller.toggle_play_pause(&self.library);
                self.report(r);
            }
            Command::Next => {
                let r = self.controller.next(&self.library);
                self.report(r);
            }
            Command::Previous => {
                let r = self.controller.previous(&self.library);
                self.report(r);
            }
            Command::ToggleShuffle => self.controller.toggle_shuffle(),
            Command::CycleRepeat => self.controller.cycle_repeat(),
            Command::MoveDown => self.move_selection(1),
            Command::MoveUp => self.move_selection(-1),
            Command::Activate => self.activate(),
            Command::SwitchView => {
                self.view = self.view.next();
                self.detail = None;
                self.selected = 0;
            }
            Command::FocusSearch => self.focus = Focus::Search,
            Command::OpenImport => self.focus = Focus::Import,
            Command::Enqueue => {
                if let Some(Row::Track(i)) = self.selected_row() {
                    if let Some(id) = self.library.get(i).map(|t| t.id.clone()) {
                        self.queue.enqueue(&self.library, &id);
                    }
                }
            }
            Command::ToggleQueuePanel => {
                self.focus = if self.focus == Focus::Queue {
                    Focus::Browse
                } else {
                    Focus::Queue
                };
            }
            Command::ToggleMute => {
                let r = self.controller.toggle_mute();
                self.report(r);
            }
            Command::VolumeUp => {
                let percent = self
                    .controller
                    .volume()
                    .percent()
                    .saturating_add(self.controls.volume_step)
                    .min(MAX_VOLUME_PERCENT);
                let r = self.controller.set_volume(percent);
                self.report(r);
            }
            Command::VolumeDown => {
                let percent = self
                    .controller
                    .volume()
                    .percent()
                    .saturating_sub(self.controls.volume_step);
                let r = self.controller.set_volume(percent);
                self.report(r);
            }
            Command::ScrubBack => self.scrub(-1),
            Command::ScrubForward => self.scrub(1),
            Command::CycleTheme => self.set_theme(self.theme.next()),
            Command::RemoveTrack => {
                if let Some(Row::Track(i)) = self.selected_row() {
                    if let Some(id) = self.library.get(i).map(|t| t.id.clone()) {
                        self.remove_track(&id);
                    }
                }
            }
            Command::Back => self.back(),
        }
        Flow::Continue
    }

    fn edit(&mut self, edit: TextEdit) {
        match (self.focus, edit) {
            (Focus::Search, TextEdit::Insert(c)) => {
                self.search.push(c);
                self.selected = 0;
            }
            (Focus::Search, TextEdit::Backspace) => {
                self.search.pop();
                self.selected = 0;
            }
            (Focus::Search, TextEdit::Submit) => self.focus = Focus::Browse,
            (Focus::Search, TextEdit::Cancel) => {
                self.search.clear();
                self.focus = Focus::Browse;
            }
            (Focus::Import, TextEdit::Insert(c)) => self.import_input.push(c),
            (Focus::Import, TextEdit::Backspace) => {
                self.import_input.pop();
            }
            (Focus::Import, TextEdit::Submit) => {
                let paths = parse_import_input(&self.import_input);
                self.import_input.clear();
                self.focus = Focus::Browse;
                if paths.is_empty() {
                    return;
                }
                self.request_import(paths);
            }
            (Focus::Import, TextEdit::Cancel) => {
                self.import_input.clear();
                self.focus = Focus::Browse;
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.focus == Focus::Queue {
            let len = self.queue.len();
            self.queue_selected = step(self.queue_selected, delta, len);
        } else {
            let len = self.rows().len();
            self.selected = step(self.selected, delta, len);
        }
    }

    fn activate(&mut self) {
        if self.focus == Focus::Queue {
            if self.queue.is_empty() {
                return;
            }
            let r = self
                .queue
                .select_at(self.queue_selected, &self.library, &mut self.controller);
            match r {
                Ok(()) => {}
                // Already reported by the queue.
                Err(QueueError::TrackRemoved(_)) => self.clamp_selection(),
                Err(e) => {
                    error!(error = %e, "queue selection failed");
                    self.notifier.error(e.to_string());
                }
            }
            return;
        }

        match self.selected_row() {
            Some(Row::Track(i)) => {
                let r = self.controller.play_track_at(&self.library, i);
                self.report(r);
            }
            Some(Row::Album(i)) => {
                if let Some(album) = self.library.albums().get(i) {
                    self.detail = Some(Detail::Album(album.name.clone()));
                    self.selected = 0;
                }
            }
            Some(Row::Artist(i)) => {
                if let Some(artist) = self.library.artists().get(i) {
                    self.detail = Some(Detail::Artist(artist.name.clone()));
                    self.selected = 0;
                }
            }
            None => {}
        }
    }

    fn back(&mut self) {
        if self.focus == Focus::Queue {
            self.focus = Focus::Browse;
        } else if self.detail.is_some() {
            self.detail = None;
            self.selected = 0;
        } else if !self.search.is_empty() {
            self.search.clear();
            self.selected = 0;
        }
    }

    fn scrub(&mut self, direction: i64) {
        let secs = i64::try_from(self.controls.scrub_seconds).unwrap_or(i64::MAX);
        let r = self
            .controller
            .seek_by(&self.library, secs.saturating_mul(direction));
        self.report(r);
    }

    /// Seek to a fraction of the current track, e.g. from a click on the
    /// progress bar.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let r = self.controller.seek(&self.library, fraction);
        self.report(r);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        match self.prefs.save_theme(theme) {
            Ok(()) => self
                .notifier
                .success(format!("Theme: {}", theme.display_name())),
            Err(e) => {
                warn!(error = %e, "theme not saved");
                self.notifier.warning(format!(
                    "Theme: {} (not saved)",
                    theme.display_name()
                ));
            }
        }
        self.notifier.changed();
    }

    pub fn remove_track(&mut self, id: &TrackId) {
        let Some(track) = self.library.remove_track(id) else {
            return;
        };
        self.queue.prune(id);
        let r = self.controller.forget_track(&self.library, id);
        self.report(r);
        self.clamp_selection();
        self.notifier
            .success(format!("Removed \"{}\"", track.title));
    }

    /// Ask the runtime to import `paths` in the background.
    pub fn request_import(&mut self, paths: Vec<PathBuf>) {
        if self.importing {
            self.notifier.warning("An import is already running");
            return;
        }
        self.importing = true;
        self.pending_import = Some(paths);
    }

    pub fn take_import_request(&mut self) -> Option<Vec<PathBuf>> {
        self.pending_import.take()
    }

    pub fn on_import(&mut self, progress: ImportProgress) {
        self.dirty = true;
        match progress {
            ImportProgress::Started(count) => {
                self.notifier.info(format!("Processing {count} files"));
            }
            ImportProgress::Finished(Ok(files)) => {
                self.importing = false;
                let count = files.len();
                self.library.add_imported(files);
                info!(count, total = self.library.len(), "tracks added");
                let noun = if count == 1 { "track" } else { "tracks" };
                self.notifier.success(format!("{count} {noun} added"));
            }
            ImportProgress::Finished(Err(e)) => {
                self.importing = false;
                error!(error = %e, "import failed");
                self.notifier.error(e.to_string());
            }
        }
    }

    /// The import worker went away without reporting back.
    pub fn on_import_lost(&mut self) {
        self.importing = false;
        self.dirty = true;
        self.notifier.error("Import stopped unexpectedly");
    }

    /// Apply an audio event. Events from a source that has since been
    /// replaced or dropped are ignored.
    pub fn on_audio_event(&mut self, SourceEvent { load, event }: SourceEvent) {
        if !self.controller.is_current(load) {
            debug!(?load, ?event, "dropping event from a stale source");
            return;
        }
        self.dirty = true;
        match event {
            AudioEvent::Started => debug!("audio started"),
            AudioEvent::StartFailed(reason) => self.controller.on_start_failed(&reason),
            AudioEvent::DurationKnown(duration) => {
                if let Some(id) = self.controller.current_track_id().cloned() {
                    self.library.set_duration(&id, duration);
                }
            }
            AudioEvent::Ended => {
                let r = self.controller.on_track_ended(&self.library);
                self.report(r);
            }
            AudioEvent::Error(reason) => {
                let r = self.controller.on_playback_error(&self.library, &reason);
                self.report(r);
            }
        }
    }

    /// Turn pending notices into toasts and drop expired ones.
    pub fn pump_notices(&mut self, now: Instant) {
        let ttl = Duration::from_millis(self.ui.notice_ttl_ms);
        while let Ok(notice) = self.notices.try_recv() {
            self.dirty = true;
            let kind = match &notice {
                Notice::Changed => continue,
                Notice::Info(_) => ToastKind::Info,
                Notice::Success(_) => ToastKind::Success,
                Notice::Warning(_) => ToastKind::Warning,
                Notice::Error(_) => ToastKind::Error,
            };
            let text = notice.message().unwrap_or_default().to_string();
            self.toasts.push(Toast {
                kind,
                text,
                expires_at: now + ttl,
            });
        }
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        if self.toasts.len() != before {
            self.dirty = true;
        }
    }

    fn report(&mut self, result: Result<(), PlaybackError>) {
        if let Err(e) = result {
            error!(error = %e, "playback command failed");
            self.notifier.error(e.to_string());
        }
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// Paths typed into the import prompt, separated by `;`.
pub fn parse_import_input(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
