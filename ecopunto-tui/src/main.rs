//! Terminal UI for ecopunto that lets users filter and sort recycling drop-off points.

mod app;
mod input;
mod logging;
mod settings;
mod ui;

use std::{io, time::Duration as StdDuration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ecopunto_core::engine::PointBrowser;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::input::Action;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    logging::init(&settings.logging)?;

    // Providers + engine setup
    let plugin = ecopunto_provider_local::plugin(&settings.local_options());
    let catalog_name = plugin.catalog.describe();
    let points = plugin
        .catalog
        .load()
        .await
        .with_context(|| format!("loading points from {catalog_name}"))?;
    tracing::info!(
        provider = %plugin.name,
        catalog = %catalog_name,
        count = points.len(),
        "ecopunto started"
    );

    let browser = PointBrowser::new(points, settings.engine);
    let app = App::new(
        browser,
        catalog_name,
        plugin.location,
        settings.search_delay(),
    );

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("ecopunto stopped");
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let mut rng = rand::rng();

    loop {
        // Pick up a finished location lookup before drawing
        app.poll_locate(&mut rng);

        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (small timeout keeps the locate spinner responsive)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
            }
        }
    }

    app.cancel_locate();
    Ok(())
}
