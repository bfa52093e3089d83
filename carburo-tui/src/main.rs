//! Terminal UI for carburo that lets users pick a place and fuel and browse station prices.

mod app;
mod input;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use carburo_core::service::CarburoService;
use carburo_provider_minetur::{self as minetur, MineturConfig};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::app::{App, Message};
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = logging::init()?;

    // HTTP + service setup
    let config = MineturConfig::from_env();
    let client = config.client()?;
    let service = Arc::new(CarburoService::new(minetur::plugin(client, &config)));
    info!(base_url = %config.base_url, ?log_file, "starting carburo");

    // App state
    let (sender, receiver) = mpsc::unbounded_channel();
    let mut app = App::new(service, sender);
    app.load_catalogs();

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, receiver);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("carburo stopped");
    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut receiver: UnboundedReceiver<Message>,
) -> Result<()> {
    loop {
        // Apply whatever the background fetches delivered since the last frame
        while let Ok(message) = receiver.try_recv() {
            app.handle_message(message);
        }

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Select(event) => app.select(event),
                Action::Refresh => app.refresh(),
            }
        }
    }

    Ok(())
}
