//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{info, warn};

use crate::config::paths::FairSharePaths;
use crate::config::preferences::JsonPreferenceStore;
use crate::config::settings::Settings;
use crate::error::FairShareError;
use crate::persistence::{StoragePersistence, WriteQueue};
use crate::storage::Storage;

use super::app::App;
use super::event::EventHandler;
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal_impl();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    restore_terminal_impl()?;
    Ok(())
}

fn restore_terminal_impl() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    Ok(())
}

/// Run the TUI application
///
/// Storage moves onto the write worker; the app works from a snapshot.
pub fn run_tui(storage: Storage, settings: Settings, paths: &FairSharePaths) -> Result<()> {
    let household = storage.snapshot()?;
    let preferences = JsonPreferenceStore::open(paths.preferences_file());
    let queue = WriteQueue::spawn(StoragePersistence::new(storage));
    let mut app = App::new(household, settings, Box::new(preferences), queue);
    info!("TUI started");

    let mut terminal = init_terminal()?;
    let events = EventHandler::default();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| super::views::render(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(event) => handle_event(&mut app, event),
            Err(e) => break Err(FairShareError::Tui(format!("Event loop stopped: {}", e)).into()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    restore_terminal()?;

    // Writes still queued when the user quit are finished before exit
    let failures: Vec<_> = app
        .shutdown()
        .into_iter()
        .filter_map(|outcome| outcome.result.err().map(|e| (outcome.label, e)))
        .collect();
    for (label, err) in &failures {
        warn!(request = %label, error = %err, "write failed during shutdown");
        eprintln!("Could not save {}: {}", label, err);
    }
    info!("TUI stopped");

    result
}
