use std::env;
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::library::Importer;
use crate::logging;
use crate::prefs::PrefsStore;

mod event_loop;
mod import_worker;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    let log_file = logging::init(&settings.log);
    if let Some(problem) = config_problem {
        warn!(%problem, "using default settings");
    }
    info!(log_file = ?log_file, "luxe starting");

    let inputs = startup::cli_inputs(env::args_os());
    let importer = Arc::new(Importer::new(settings.import.clone()));
    let audio_player = AudioPlayer::new();
    let playback = audio_player.playback_handle();

    let mut app = App::new(audio_player, &settings, PrefsStore::from_env());
    startup::apply_cli_inputs(&mut app, inputs);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &importer,
        &playback,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    info!("luxe stopped");
    run_result
}
