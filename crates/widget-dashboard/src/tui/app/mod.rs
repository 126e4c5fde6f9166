//! Application state and main event loop for the TUI.
//!
//! Manages terminal setup/teardown, the panic hook, the loader channel and
//! the render loop. All view state lives in [`BoardView`]; `App` adds what
//! only the terminal needs: the cell scale, scrolling, the status line and
//! the share backends.

use crate::share::{
    self, ClipboardWriter, NativeShare, ShareOutcome, SystemClipboard, CLIPBOARD_FALLBACK_NOTICE,
};
use crate::tui::canvas::CanvasScale;
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render_dashboard;
use crate::view::{spawn_load, spawn_save, BoardView, LoadTicket, ViewMessage, ViewMode};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_api::DashboardApi;
use ratatui::layout::Rect;
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a status message stays in the footer.
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// Default event loop tick interval.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(250);

/// Rows scrolled per mouse wheel step.
const WHEEL_SCROLL_ROWS: u16 = 3;

/// Capacity of the loader channel.
const CHANNEL_CAPACITY: usize = 64;

/// Core application state for the TUI.
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// The open dashboard.
    pub view: BoardView,
    /// Pixels per terminal cell.
    pub scale: CanvasScale,
    /// Board rows scrolled off the top.
    pub scroll: u16,
    /// Temporary status message shown in the footer, with expiry time.
    pub status_message: Option<(String, Instant)>,
    /// Board area of the last render. Used to map mouse cells to pixels.
    pub board_area: Option<Rect>,
    /// Count of ticks processed.
    pub tick_count: u64,
    tick_rate: Duration,
    api: Arc<dyn DashboardApi>,
    tx: mpsc::Sender<ViewMessage>,
    rx: mpsc::Receiver<ViewMessage>,
    native_share: Option<Box<dyn NativeShare>>,
    clipboard: Box<dyn ClipboardWriter>,
}

impl App {
    /// Creates an app over `view`, loading through `api`.
    ///
    /// Sharing defaults to the system clipboard with no native facility.
    pub fn new(view: BoardView, api: Arc<dyn DashboardApi>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            should_quit: false,
            view,
            scale: CanvasScale::default(),
            scroll: 0,
            status_message: None,
            board_area: None,
            tick_count: 0,
            tick_rate: DEFAULT_TICK_RATE,
            api,
            tx,
            rx,
            native_share: None,
            clipboard: Box::new(SystemClipboard),
        }
    }

    /// Sets the pixel scale of terminal cells.
    pub fn with_scale(mut self, scale: CanvasScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the event loop tick interval.
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Replaces the share backends.
    pub fn with_share(
        mut self,
        native: Option<Box<dyn NativeShare>>,
        clipboard: Box<dyn ClipboardWriter>,
    ) -> Self {
        self.native_share = native;
        self.clipboard = clipboard;
        self
    }

    /// Starts loading the current dashboard. Must run inside a tokio runtime.
    pub fn start_load(&mut self) {
        let ticket = self.view.reload();
        self.spawn_load(ticket);
    }

    /// Switches to another dashboard and starts loading it.
    pub fn navigate(&mut self, dashboard_id: &str) {
        let ticket = self.view.navigate(dashboard_id);
        self.scroll = 0;
        self.spawn_load(ticket);
    }

    fn spawn_load(&self, ticket: LoadTicket) {
        let username = self.view.session().username.clone();
        spawn_load(Arc::clone(&self.api), &username, ticket, self.tx.clone());
    }

    /// Applies every loader result received so far. Returns `true` if any
    /// changed what is on screen.
    pub fn drain_messages(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.rx.try_recv() {
            changed |= self.handle_view_message(message);
        }
        changed
    }

    /// Applies one loader result.
    pub fn handle_view_message(&mut self, message: ViewMessage) -> bool {
        match message {
            ViewMessage::Saved(result) => {
                let status = match &result {
                    Ok(_) => "Dashboard saved".to_string(),
                    Err(e) => format!("Save failed: {e}"),
                };
                self.view.apply(ViewMessage::Saved(result));
                self.set_status(status);
                true
            }
            other => {
                let changed = self.view.apply(other);
                if changed {
                    self.clamp_scroll();
                }
                changed
            }
        }
    }

    /// Performs a key action.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::ToggleEdit => self.toggle_edit(),
            Action::Share => self.share(),
            Action::Reload => {
                if self.view.controller().active().is_none() {
                    self.start_load();
                }
            }
            Action::PreviousDashboard => self.cycle_dashboard(-1),
            Action::NextDashboard => self.cycle_dashboard(1),
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
        }
    }

    /// Flips edit mode; leaving edit mode saves the whole widget list.
    pub fn toggle_edit(&mut self) {
        match self.view.toggle_edit() {
            Ok(Some(request)) => {
                tracing::info!(
                    dashboard_id = %request.dashboard_id,
                    count = request.widgets.len(),
                    "saving dashboard"
                );
                self.set_status("Saving...");
                spawn_save(Arc::clone(&self.api), request, self.tx.clone());
            }
            Ok(None) if self.view.is_editing() => {
                self.set_status("Editing: drag a widget to move it, drag its corner to resize")
            }
            Ok(None) => self.set_status("Not saved: dashboard has not loaded"),
            Err(e) => {
                tracing::debug!("edit toggle refused: {}", e);
                self.set_status(e.to_string());
            }
        }
    }

    /// Shares the dashboard link natively or via the clipboard.
    pub fn share(&mut self) {
        if self.view.mode() != ViewMode::Editable {
            return;
        }
        let Some(details) = self.view.share_details() else {
            tracing::warn!("share origin cannot carry a path");
            self.set_status("Share failed: invalid share origin");
            return;
        };
        let outcome = share::share(
            self.native_share.as_deref(),
            self.clipboard.as_mut(),
            &details,
        );
        let status = match outcome {
            ShareOutcome::Shared => format!("Shared {}", details.url),
            ShareOutcome::CopiedToClipboard => CLIPBOARD_FALLBACK_NOTICE.to_string(),
            ShareOutcome::Failed(message) => format!("Share failed: {message}"),
        };
        self.set_status(status);
    }

    /// Opens the dashboard `offset` steps away in the user's listing.
    pub fn cycle_dashboard(&mut self, offset: isize) {
        if self.view.is_editing() {
            return;
        }
        let Some(next) = self.view.adjacent_dashboard(offset).map(str::to_string) else {
            return;
        };
        if next != self.view.dashboard_id() {
            self.navigate(&next);
        }
    }

    fn max_scroll(&self) -> u16 {
        let content = self.scale.content_rows(self.view.widgets());
        let visible = self.board_area.map(|a| a.height).unwrap_or(0);
        content.saturating_sub(visible)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scrolls the board down by `rows`.
    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows).min(self.max_scroll());
    }

    /// Scrolls the board up by `rows`.
    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    /// Records a new terminal width and re-flows when the device class
    /// changes.
    pub fn handle_resize(&mut self, columns: u16) {
        let width = self.scale.viewport_width(columns);
        if self.view.set_viewport_width(width) {
            self.clamp_scroll();
        }
    }

    /// Handles mouse input: gestures in edit mode, wheel scrolling always.
    ///
    /// A left press on a widget's bottom-right cell starts a resize, anywhere
    /// else on the widget a drag. The topmost widget under the pointer wins.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_down(WHEEL_SCROLL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_up(WHEEL_SCROLL_ROWS),
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(board) = self.board_area else {
                    return;
                };
                if !self.view.is_editing() {
                    return;
                }
                let Some(hit) =
                    self.scale
                        .hit_test(self.view.widgets(), board, self.scroll, mouse.column, mouse.row)
                else {
                    return;
                };
                let pointer = self.scale.pointer_to_px(mouse.column, mouse.row, board, self.scroll);
                let controller = self.view.controller_mut();
                if hit.on_handle {
                    controller.begin_resize(hit.index, pointer);
                } else {
                    controller.begin_drag(hit.index, pointer);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(board) = self.board_area else {
                    return;
                };
                let pointer = self.scale.pointer_to_px(mouse.column, mouse.row, board, self.scroll);
                self.view.controller_mut().pointer_moved(pointer);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.view.controller_mut().pointer_released();
            }
            _ => {}
        }
    }

    /// Shows `message` in the footer for [`STATUS_MESSAGE_DURATION`].
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + STATUS_MESSAGE_DURATION));
    }

    /// Clears the status message if its expiry time has passed.
    pub fn expire_status_message(&mut self) {
        if let Some((_, expiry)) = &self.status_message {
            if Instant::now() >= *expiry {
                self.status_message = None;
            }
        }
    }

    /// Runs the TUI: sets up the terminal, runs the event loop, restores on
    /// exit.
    pub async fn run(&mut self) -> io::Result<()> {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();

        self.handle_resize(terminal.size()?.width);
        self.start_load();

        let mut should_render = true;
        loop {
            should_render |= self.drain_messages();

            if should_render {
                terminal.draw(|frame| render_dashboard(frame, self))?;
            }

            should_render = match event_handler.next(&mut reader).await? {
                Event::Key(key) => {
                    let action = handle_key_event(self, key);
                    self.dispatch(action);
                    if self.should_quit {
                        return Ok(());
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse_event(mouse);
                    true
                }
                Event::Resize(columns, _) => {
                    self.handle_resize(columns);
                    true
                }
                Event::Tick => {
                    self.tick_count += 1;
                    let had_status = self.status_message.is_some();
                    self.expire_status_message();
                    had_status && self.status_message.is_none()
                }
            };
        }
    }
}

/// Enables raw mode, switches to the alternate screen and captures the mouse.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

#[cfg(test)]
mod tests;
