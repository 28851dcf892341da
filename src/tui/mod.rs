//! Terminal UI
//!
//! Single-threaded event loop: input is polled, the tick drives animation
//! and toast expiry, and spawned work comes back through the app event
//! channel. The terminal is restored on the way out even when the loop
//! errors.

pub mod app;
pub mod components;
pub mod forms;
pub mod theme;
pub mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::events::AppEvent;
use app::App;

const INPUT_POLL: Duration = Duration::from_millis(10);
const TICK: Duration = Duration::from_millis(100);

/// Take over the terminal and run the app until it quits.
pub async fn run(mut app: App, mut events: mpsc::Receiver<AppEvent>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut events).await;

    // Restore the terminal before surfacing any error.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    let mut input = tokio::time::interval(INPUT_POLL);
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            _ = input.tick() => {
                // Drain everything queued so a paste does not lag behind.
                while crossterm::event::poll(Duration::ZERO)? {
                    match crossterm::event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            app.handle_key(key);
                        }
                        // A resize redraws on the next pass.
                        _ => {}
                    }
                }
            }
            _ = tick.tick() => {
                app.tick();
            }
            Some(event) = events.recv() => {
                app.on_event(event);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
