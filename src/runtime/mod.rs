use std::env;
use std::fs;
use std::sync::{Mutex, mpsc};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::error;

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::metadata;
use crate::playlist;

mod event_loop;
mod settings;

/// Route tracing to a log file; the terminal belongs to the TUI.
fn init_tracing() {
    let Some(path) = config::resolve_log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("encore=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let settings = settings::load_settings();
    let theme = config::load_theme();

    let list_arg = env::args().nth(1).unwrap_or_else(|| "tracks.json".to_string());

    let (tracks, load_error) = match playlist::load(&list_arg) {
        Ok(tracks) => (tracks, None),
        Err(err) => {
            error!(list = %list_arg, %err, "failed to load track list");
            (
                Vec::new(),
                Some(format!(
                    "Failed to load track list. Make sure {list_arg} exists."
                )),
            )
        }
    };

    let player = AudioPlayer::new(tracks.clone(), settings.playback.clone());
    let mut app = App::new(tracks.clone(), theme);
    app.load_error = load_error;
    app.set_playback_handle(player.playback_handle());

    // Metadata/thumbnail prefetch runs in the background from the start.
    let (meta_tx, meta_rx) = mpsc::channel::<metadata::MetadataEvent>();
    let _prefetch = metadata::spawn_prefetch(tracks, settings.network.clone(), meta_tx);

    // Select the first track without starting playback.
    if app.has_tracks() {
        let _ = player.send(AudioCmd::Load(0));
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &player, &meta_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
