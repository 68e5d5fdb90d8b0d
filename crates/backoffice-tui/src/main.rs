//! Backoffice - a terminal admin console for the cafe and training-center
//! platform.
//!
//! Run without arguments for the interactive console, or with `login`,
//! `logout` or `status` to manage the stored session from a shell.

mod app;
mod cli;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use backoffice_core::{Config, EnvSettings, SessionManager};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Prefix of the daily log files under the cache directory
const LOG_FILE_PREFIX: &str = "backoffice.log";

const USAGE: &str = "\
Usage: backoffice [COMMAND]

Commands:
  (none)   Open the admin console
  login    Sign in and store the session
  logout   Forget the stored session
  status   Show who is signed in
  help     Show this message

Environment:
  BACKOFFICE_ENV       development or production (default: production)
  BACKOFFICE_API_URL   API base URL, overrides the config file
  RUST_LOG             Log filter (default: warn)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Console,
    Login,
    Logout,
    Status,
    Help,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        match args.get(1).map(String::as_str) {
            None => Ok(Command::Console),
            Some("login") => Ok(Command::Login),
            Some("logout") => Ok(Command::Logout),
            Some("status") => Ok(Command::Status),
            Some("help" | "-h" | "--help") => Ok(Command::Help),
            Some(other) => bail!("Unknown command '{}'\n\n{}", other, USAGE),
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// The console owns the terminal, so it logs to a daily file in the cache
/// directory. Subcommands log to stderr. Use RUST_LOG to change the level.
fn init_tracing(to_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        if let Ok(dir) = Config::cache_dir() {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = Command::parse(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let _log_guard = init_tracing(command == Command::Console);
    info!(?command, "Backoffice starting");

    let config_path = Config::config_path().ok();
    let mut config = Config::load().context("Failed to load config")?;
    let env = EnvSettings::from_env()?;
    let api = config.api_client(&env)?;
    let storage = config.open_storage()?;
    let session = SessionManager::new(api, storage);

    match command {
        Command::Login => cli::login(&session, &mut config, config_path.as_deref()).await,
        Command::Logout => cli::logout(&session),
        Command::Status => cli::status(&session),
        Command::Console => run_console(config, config_path, session).await,
        Command::Help => Ok(()),
    }
}

async fn run_console(config: Config, config_path: Option<std::path::PathBuf>, session: SessionManager) -> Result<()> {
    let mut app = App::new(config, session);
    if let Some(path) = config_path {
        app = app.with_config_path(path);
    }
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }

    info!("Backoffice shutting down");
    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Apply background results and the route guard before drawing
        app.tick();
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
