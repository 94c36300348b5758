// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Audio Tag Editor TUI.
//!
//! A terminal-based editor for the tags of the audio files in a music
//! directory.
//!
//! The application runs a single-threaded event loop: read one terminal
//! event, hand it to the [`MainViewController`], redraw. All tag reads and
//! writes happen synchronously inside that dispatch.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of an error. Logging goes
//! to a daily rolling file because the terminal belongs to the TUI.

mod commander;
mod config;
mod controller;
mod error;
mod keys;
mod merge;
mod model;
mod render;
mod tags;
mod theme;
mod util;

use std::{io, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{PrefOption, PreferencesStore},
    controller::{Flow, MainViewController},
    model::library::Library,
    tags::LoftyTagStore,
    theme::Theme,
};

const LOG_FILE_NAME: &str = "tagui.log";

#[derive(Parser, Debug)]
#[command(name = "tagui")]
#[command(about = "Edit the tags of the audio files in a music directory")]
struct Args {
    /// Music directory to open instead of the configured one
    #[arg(long)]
    music_dir: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Application state.
pub(crate) struct App {
    pub(crate) theme: Theme,
    pub(crate) controller: MainViewController,
}

impl App {
    /// Loads the preferences and scans the music directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or the music
    /// directory cannot be scanned.
    fn new(args: &Args) -> Result<Self> {
        let mut prefs = PreferencesStore::load(args.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(dir) = &args.music_dir {
            prefs
                .set(PrefOption::MusicDir, dir)
                .context("Invalid --music-dir")?;
        }

        let store = Rc::new(LoftyTagStore::new());
        let root = prefs.music_dir();
        let library = Library::load(&root, store.as_ref())
            .with_context(|| format!("Cannot open music directory {}", root.display()))?;

        Ok(Self {
            theme: Theme::default(),
            controller: MainViewController::new(store, prefs, library),
        })
    }
}

/// The entry point of the application.
///
/// Initialises logging, builds the application state, manages the terminal
/// lifecycle, and returns an error if any part of the execution fails.
fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.log_dir.clone())?;

    tracing::info!("tagui starting up");

    let mut app = App::new(&args).context("Failed to initialise application")?;

    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    tracing::info!("tagui shutting down");

    res.context("Application error occurred")
}

/// Installs a file logger.
///
/// The returned guard flushes buffered log lines when dropped and must be
/// kept alive for the lifetime of the program.
fn init_logging(log_dir: Option<PathBuf>) -> Result<WorkerGuard> {
    let log_dir = log_dir
        .or_else(|| dirs::cache_dir().map(|dir| dir.join("tagui")))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tagui=debug"));

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install logger")?;

    Ok(guard)
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`] and makes the cursor
/// visible again. It is best-effort and does not return a result, as it is
/// called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Runs the event loop until the controller asks to exit.
///
/// # Errors
///
/// Returns an error if drawing or reading terminal events fails.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|f| render::draw(f, app))
            .context("Failed to draw")?;

        let Event::Key(key) = event::read().context("Failed to read terminal event")? else {
            continue;
        };

        match app.controller.handle_key(key) {
            Flow::Continue => {}
            Flow::Redraw => terminal.clear().context("Failed to clear terminal")?,
            Flow::Exit => return Ok(()),
        }
    }
}
