//! Terminal front end for two-player tic-tac-toe.
//!
//! The board model lives in [`tictactoe_board`]; this crate supplies the
//! controller and the view that sits on top of it.
//!
//! # Architecture
//!
//! - **Controller**: [`GameController`] forwards clicks to the board
//! - **Presenter**: [`BoardPresenter`] listens to the board and derives what
//!   to show
//! - **App**: [`App`] maps keys and mouse clicks to controller calls and
//!   drives save/load
//! - **UI**: [`ui::draw`] renders the app with ratatui

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod cli;
mod controller;
mod input;
mod presenter;
mod settings;
pub mod ui;

pub use app::{
    App, CONFIRM_QUIT_MESSAGE, Control, LOAD_FAILED_MESSAGE, Mode, PromptKind, SAVE_EXISTS_MESSAGE,
};
pub use cli::Cli;
pub use controller::GameController;
pub use input::{digit_cell, move_cursor};
pub use presenter::{BoardPresenter, DisplayState};
pub use settings::{ConfigError, Settings};

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tictactoe_board::persist;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

/// Resolves settings from the config file and command-line overrides.
#[instrument(skip(cli))]
pub fn resolve_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut settings = Settings::from_file(&cli.config)?;
    if let Some(save_dir) = &cli.save_dir {
        settings = settings.with_save_dir(save_dir.clone());
    }
    if let Some(log_file) = &cli.log_file {
        settings = settings.with_log_file(log_file.clone());
    }
    Ok(settings)
}

/// Installs a tracing subscriber writing to the configured log file.
///
/// Logs go to a file so they do not interfere with the terminal UI.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(settings: &Settings) -> Result<()> {
    let log_file = std::fs::File::create(settings.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_filter())),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't fail if already initialized
    Ok(())
}

/// Runs the game until the user quits.
pub fn run(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    init_tracing(&settings)?;

    info!("Starting Tic Tac Toe");

    let app = match &cli.load {
        Some(path) => App::with_board(persist::load(path)?, settings),
        None => App::new(settings),
    };

    enable_raw_mode()?;
    let mut terminal = setup_or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        || restore_terminal(&mut io::stdout()),
    )?;

    let res = run_app(&mut terminal, app);

    restore_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Runs `setup`, calling `restore` before returning if it fails.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    setup().inspect_err(|err| {
        error!(error = ?err, "Terminal setup failed");
        if let Err(restore_err) = restore() {
            error!(error = ?restore_err, "Terminal restore failed");
        }
    })
}

/// Leaves the alternate screen and turns raw mode and mouse capture off.
fn restore_terminal(out: &mut impl io::Write) -> Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Draws and dispatches input until the app asks to quit.
#[instrument(skip_all)]
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        let mut areas = Vec::new();
        terminal.draw(|f| areas = ui::draw(f, &app))?;
        app.set_cell_areas(areas);

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if app.handle_key(key)? == Control::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse)?,
            _ => {}
        }
    }
}
