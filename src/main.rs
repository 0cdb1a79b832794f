mod api;
mod app;
mod config;
mod logging;
mod screen;
mod store;
mod ui;
mod view;

use crate::api::CountriesClient;
use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::*;
use crate::screen::Route;
use crate::store::{JsonFileStore, MemoryStore, StarredSet, StringListStore};
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config, writing the defaults out on first run
    let cfg = config::load_config()?;
    if !config::config_path().exists() {
        if let Err(e) = config::save_config(&cfg) {
            eprintln!("Warning: could not write config: {:#}", e);
        }
    }
    logging::init(&cfg.logging);

    // The first argument is a screen address, e.g. `details?name=Peru`
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| cfg.ui.start_address.clone());
    let route = Route::parse(&address);

    let client = CountriesClient::new(&cfg.api.base_url, cfg.api.timeout())
        .context("Failed to build HTTP client")?;
    let store = open_store(&cfg);
    let starred = StarredSet::load(store.as_ref()).context("Failed to load starred countries")?;
    tracing::info!(count = starred.len(), "loaded starred countries");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg, client, store, starred, route).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn open_store(cfg: &config::AppConfig) -> Box<dyn StringListStore> {
    match cfg.storage.resolve() {
        Some(path) => {
            let store = JsonFileStore::new(path);
            tracing::debug!(path = %store.path().display(), "using file store");
            Box::new(store)
        }
        None => {
            tracing::warn!("no data directory, starred countries will not persist");
            Box::new(MemoryStore::default())
        }
    }
}

/// Run a fetch on its own task and post the result back to the event loop.
fn dispatch_fetch(client: &CountriesClient, event_tx: &mpsc::UnboundedSender<AppEvent>, action: Action) {
    let client = client.clone();
    let tx = event_tx.clone();
    match action {
        Action::FetchRecords { token, kind, value } => {
            tracing::debug!(%token, filter = kind.label(), value = %value, "fetching records");
            tokio::spawn(async move {
                let result = client.fetch_records(kind, &value).await;
                let _ = tx.send(AppEvent::RecordsLoaded { token, result });
            });
        }
        Action::FetchDetail { token, name } => {
            tracing::debug!(%token, name = %name, "fetching details");
            tokio::spawn(async move {
                let result = client.fetch_by_exact_name(&name).await;
                let _ = tx.send(AppEvent::DetailLoaded { token, result });
            });
        }
        Action::Quit => {}
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    client: CountriesClient,
    store: Box<dyn StringListStore>,
    starred: StarredSet,
    route: Route,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let (mut state, initial) = AppState::new(cfg, starred, store, route)?;
    for action in initial {
        dispatch_fetch(&client, &event_tx, action);
    }

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task (20 FPS = 50ms)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(50));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);

        // Process actions
        for action in actions {
            match action {
                Action::Quit => {
                    state.should_quit = true;
                }
                fetch => dispatch_fetch(&client, &event_tx, fetch),
            }
        }

        if state.should_quit {
            tracing::info!("quitting");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}
