// liftdeck-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{fs, io, time::Duration};
use liftdeck_lib::AppService;

// Declare modules
mod app;
mod ui;

use crate::app::App;

const LOG_FILE_NAME: &str = "liftdeck-tui.log";

// The terminal is owned by the UI, so log records go to a file in the data dir
fn init_logging() -> Result<()> {
    let data_dir = liftdeck_lib::get_data_dir_util().context("Failed to determine data directory")?;
    fs::create_dir_all(&data_dir)?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE_NAME))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    // Initialize the library service
    let app_service = AppService::initialize().context("Failed to initialize AppService")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let mut app = App::new(app_service);
    app.refresh_data();
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("TUI exited with error: {:?}", err);
        eprintln!("Error: {:?}", err); // Print errors to stderr
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_messages();

        terminal.draw(|f| ui::render_ui(f, app))?;

        // Poll for events with a timeout (e.g., 250ms)
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
