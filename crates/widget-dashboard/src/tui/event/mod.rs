//! Event handling for the TUI.
//!
//! Wraps crossterm events and adds a tick variant for periodic refresh.

use crate::tui::app::App;
use crate::view::ViewMode;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Terminal was resized to `(columns, rows)`.
    Resize(u16, u16),
    /// Periodic tick.
    Tick,
}

/// Merges terminal input events with periodic ticks.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a handler ticking every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next terminal event or tick, whichever comes first.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        // the first tick completes immediately
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => return Ok(Event::Key(key)),
                        Some(Ok(CrosstermEvent::Mouse(mouse))) => return Ok(Event::Mouse(mouse)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Action produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// Quit the application.
    Quit,
    /// Enter or leave edit mode; leaving saves.
    ToggleEdit,
    /// Share the dashboard link.
    Share,
    /// Refetch the dashboard.
    Reload,
    /// Open the previous dashboard of the user.
    PreviousDashboard,
    /// Open the next dashboard of the user.
    NextDashboard,
    /// Scroll the board up one row.
    ScrollUp,
    /// Scroll the board down one row.
    ScrollDown,
}

/// Maps a key press to an action, given the app's current mode.
///
/// Editing, sharing and dashboard cycling only exist in the editable view.
/// Cycling is also unavailable while editing.
pub fn handle_key_event(app: &App, key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    if should_quit(key) {
        return Action::Quit;
    }

    let editable = app.view.mode() == ViewMode::Editable;
    match key.code {
        KeyCode::Char('e') if editable => Action::ToggleEdit,
        KeyCode::Char('s') if editable => Action::Share,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('[') if editable && !app.view.is_editing() => Action::PreviousDashboard,
        KeyCode::Char(']') if editable && !app.view.is_editing() => Action::NextDashboard,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        _ => Action::None,
    }
}

/// Whether `key` quits (`q` or Ctrl-C).
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')))
}
