//! recruit - Student Organization Recruitment
//!
//! Terminal client for registering as an applicant, choosing departments and
//! screening applicants. State is kept in a JSON file in the data directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tokio::time::{self, MissedTickBehavior};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

use recruit::application::{App, STATE_KEY, Store};
use recruit::domain::CsvExporter;
use recruit::infrastructure::{
    Cli, FileStorage, KeyValueStore, MemoryStorage, Settings, SimulatedDirectory, remove_key,
};
use recruit::presentation::{Command, InputHandler, render_ui};

/// Entry point for the recruit terminal client.
///
/// Opens the store, then either exports applicants and exits or runs the
/// terminal interface until the user quits.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened, the export fails, or
/// the terminal cannot be driven.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::from_cli(Cli::parse());
    init_tracing(&settings)?;

    let mut storage: Box<dyn KeyValueStore> = if settings.in_memory {
        Box::new(MemoryStorage::default())
    } else {
        Box::new(FileStorage::new(settings.data_dir.clone()))
    };
    if settings.reset {
        remove_key(&mut *storage, STATE_KEY);
        info!("discarded persisted state");
    }
    let store = Store::open(storage, Box::new(SimulatedDirectory::new(settings.verify_delay)));

    if let Some(path) = &settings.export_csv {
        let count = CsvExporter::export_to_file(&store.state().applicants, path)
            .with_context(|| format!("failed to export applicants to {}", path.display()))?;
        println!("Exported {count} applicants to {}", path.display());
        return Ok(());
    }

    let export_path = if settings.in_memory {
        PathBuf::from("applicants.csv")
    } else {
        settings.data_dir.join("applicants.csv")
    };
    let mut app = App::new(store, export_path);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Sends logs to `recruit.log` in the data directory, or nowhere with `--memory`.
fn init_tracing(settings: &Settings) -> Result<()> {
    let writer = if settings.in_memory {
        BoxMakeWriter::new(io::sink)
    } else {
        fs::create_dir_all(&settings.data_dir)
            .with_context(|| format!("failed to create {}", settings.data_dir.display()))?;
        let log_path = settings.log_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("failed to open log file {}", log_path.display()))?;
        BoxMakeWriter::new(Mutex::new(file))
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recruit=info")))
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(())
}

/// Main application event loop.
///
/// Ticks every 100 ms so toasts expire and the post-submit redirect fires
/// without input. While a verification is in flight, Esc or Ctrl+C abandons it
/// and closes the wizard.
async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = time::interval(Duration::from_millis(100));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| render_ui(f, app))?;

        let key = tokio::select! {
            _ = ticker.tick() => continue,
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => key,
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
        };

        match InputHandler::handle_key_event(app, key.code, key.modifiers) {
            Some(Command::Quit) => return Ok(()),
            Some(Command::VerifyIdentity) => {
                app.verifying = true;
                terminal.draw(|f| render_ui(f, app))?;
                app.run_verification_until(wait_for_abandon(&mut events)).await;
            }
            None => {}
        }
    }
}

/// Resolves on Esc or Ctrl+C. Other input is discarded.
async fn wait_for_abandon(events: &mut EventStream) {
    while let Some(event) = events.next().await {
        let Ok(Event::Key(key)) = event else {
            continue;
        };
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if key.kind == KeyEventKind::Press && (key.code == KeyCode::Esc || ctrl_c) {
            return;
        }
    }
    std::future::pending().await
}
