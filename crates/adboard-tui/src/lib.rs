//! adboard-tui - terminal dashboard for video ad materials, built on Ratatui

pub mod actions;
pub mod app;
pub mod components;
pub mod theme;
pub mod ui;

pub use app::App;

use adboard_core::{DashboardConfig, DashboardStore, MetricSource};
use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use theme::Palette;
use tracing::{debug, warn};

/// Run the TUI application
///
/// Loads the selected day on start and whenever the window or date
/// changes. Each load runs on its own task; the store keeps only the
/// latest response.
pub async fn run<S>(
    store: Arc<DashboardStore>,
    source: Arc<S>,
    config: &DashboardConfig,
    palette: Palette,
) -> Result<()>
where
    S: MetricSource + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, config).with_palette(palette);
    app.request_load();

    let result = run_loop(&mut terminal, &mut app, source).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B, S>(terminal: &mut Terminal<B>, app: &mut App, source: Arc<S>) -> Result<()>
where
    B: Backend,
    <B as Backend>::Error: Send + Sync + 'static,
    S: MetricSource + 'static,
{
    loop {
        if let Some(range) = app.take_load_request() {
            let store = app.store.clone();
            let source = source.clone();
            tokio::spawn(async move {
                match store.load(source.as_ref(), range).await {
                    Ok(outcome) => debug!(?outcome, "Load finished"),
                    Err(e) => warn!(error = %e, "Load failed"),
                }
            });
        }

        app.poll_events();
        app.poll_preview();
        app.tick();

        let now_ms = app.view_now(Utc::now().timestamp_millis());
        terminal.draw(|f| ui::render(f, app, now_ms))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, now_ms);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let spawned loads and hover timers make progress
        tokio::task::yield_now().await;
    }
}
