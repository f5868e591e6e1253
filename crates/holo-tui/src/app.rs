//! Terminal session and event loop

use crate::input::{Action, event_to_action};
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        EventStream,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;

/// State driven by [`App::run`]
pub trait AppState {
    /// Handle an input action, return true to continue, false to quit
    fn handle_action(&mut self, action: Action) -> bool;

    /// Render the UI
    fn render(&mut self, frame: &mut ratatui::Frame);

    /// Called when no input arrived within the tick rate
    fn tick(&mut self) {}
}

/// Owns the terminal for the lifetime of the UI.
///
/// Raw mode, the alternate screen, mouse capture and bracketed paste are
/// enabled on creation and restored on drop.
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

/// Redraw interval while no input arrives; paces the spinner
const TICK_RATE: Duration = Duration::from_millis(80);

impl App {
    /// Take over the terminal
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        ) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    /// Draw and dispatch input until the state asks to quit
    pub async fn run<S: AppState>(&mut self, state: &mut S) -> io::Result<()> {
        let mut events = EventStream::new();

        loop {
            self.terminal.draw(|frame| state.render(frame))?;

            match tokio::time::timeout(TICK_RATE, events.next()).await {
                Ok(Some(Ok(event))) => {
                    if let Some(action) = event_to_action(event) {
                        if !state.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
                Ok(Some(Err(e))) => return Err(e),
                // Input closed
                Ok(None) => return Ok(()),
                Err(_) => state.tick(),
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}
