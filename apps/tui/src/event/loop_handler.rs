use std::io::Stdout;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use rider_dash_core::TabId;

use crate::app::App;
use crate::ui;

// Configure event poll timeout (ms)
const EVENT_POLL_TIMEOUT: u64 = 50;

/// Run the main application event loop
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    first_tab: TabId,
) -> Result<()> {
    app.start(first_tab);

    while app.running {
        app.drain();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if !matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                app.handle_input(key.code);
            }
            Ok(Event::Resize(_, _)) => {
                // Force a redraw after resize
                if terminal.draw(|f| ui::ui(app, f)).is_err() {
                    // Non-fatal redraw error
                }
            }
            Ok(_) | Err(_) => {
                // Ignore mouse, focus and paste events
            }
        }
    }
    Ok(())
}
