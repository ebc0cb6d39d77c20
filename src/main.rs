//! Epic Story Panel - generate user stories for an Epic from related wiki pages
//!
//! A Ratatui-based panel attached to one Epic. Pressing the button asks the
//! story backend for wiki pages related to the Epic's title, generates
//! stories from them and refreshes the Epic.

mod app;
mod backend;
mod config;
mod host;
mod panel;
mod ui;

use anyhow::Result;
use app::App;
use backend::HttpStoryBackend;
use config::{PanelConfig, Settings};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use host::AzureDevOpsHost;
use panel::{PanelController, PanelState};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

/// Commands buffered between the UI and the controller
const COMMAND_BUFFER: usize = 16;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let settings = Settings::resolve(PanelConfig::load()?)?;
    let backend = HttpStoryBackend::new(&settings.backend_url, settings.backend_token.clone())?;
    tracing::info!("Story backend at {}", backend.base_url());
    let host = AzureDevOpsHost::new(settings.azure.clone());

    let (state_tx, state_rx) = watch::channel(PanelState::default());
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let controller = PanelController::new(
        Arc::new(host),
        Arc::new(backend),
        settings.refresh_delay,
        state_tx,
    );
    let controller_task = tokio::spawn(controller.run(command_rx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(state_rx, command_tx);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    controller_task.abort();

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file under the data directory; the terminal belongs to the UI
fn init_logging() {
    let writer = PanelConfig::log_dir()
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("panel.log"))
                .ok()
        })
        .map(|file| BoxMakeWriter::new(Mutex::new(file)))
        .unwrap_or_else(|| BoxMakeWriter::new(io::stderr));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epic_story_panel=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        let term_size = terminal.size()?;
        app.terminal_size = Some((term_size.height, term_size.width));

        // Redraw every tick so controller updates show up while a run is in flight
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
