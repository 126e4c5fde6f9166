//! Shared test utilities for TUI tests with ratatui `TestBackend`.
//!
//! Buffer inspection helpers plus fixtures: an in-memory [`StubApi`], a
//! [`MemoryClipboard`] and builders for loaded apps.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashboard_api::{ApiError, Dashboard, DashboardApi, Position, UpdateResponse, Widget};
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};
use url::Url;

use crate::session::SessionContext;
use crate::share::{ClipboardWriter, NativeShare, ShareDetails, ShareError};
use crate::tui::app::App;
use crate::view::{BoardView, ViewMessage, ViewMode};

/// Creates a Terminal with TestBackend at the specified dimensions.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Extracts all text from a specific row in the buffer as a single String.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Finds the first row index that contains the given text.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    (0..buffer.area().height).find(|&row| row_text(buffer, row).contains(text))
}

/// Symbol of the cell at `(col, row)`.
pub fn symbol_at(buffer: &Buffer, col: u16, row: u16) -> String {
    buffer
        .cell((col, row))
        .map(|cell| cell.symbol().to_string())
        .unwrap_or_default()
}

/// Asserts that the cell at (col, row) has the specified foreground color.
pub fn assert_fg_color(buffer: &Buffer, col: u16, row: u16, color: Color) {
    let cell = buffer
        .cell((col, row))
        .unwrap_or_else(|| panic!("cell at ({}, {}) does not exist", col, row));
    assert_eq!(
        cell.fg, color,
        "expected fg color {:?} at ({}, {}), got {:?}",
        color, col, row, cell.fg
    );
}

/// Renders the full dashboard to a buffer for inspection.
pub fn render_dashboard_to_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = test_terminal(width, height);
    terminal
        .draw(|frame| crate::tui::ui::render_dashboard(frame, app))
        .expect("draw failed");
    terminal.backend().buffer().clone()
}

/// Backend fake serving canned data and recording saves.
#[derive(Default)]
pub struct StubApi {
    /// Listing returned for any user.
    pub dashboards: Vec<Dashboard>,
    /// Widgets returned for any dashboard.
    pub widgets: Vec<Widget>,
    /// Saved `(dashboard_id, widgets)` pairs.
    pub updates: Mutex<Vec<(String, Vec<Widget>)>>,
}

#[async_trait]
impl DashboardApi for StubApi {
    async fn list_dashboards(&self, _username: &str) -> Result<Vec<Dashboard>, ApiError> {
        Ok(self.dashboards.clone())
    }

    async fn fetch_widgets(&self, _dashboard_id: &str) -> Result<Vec<Widget>, ApiError> {
        Ok(self.widgets.clone())
    }

    async fn update_widgets(
        &self,
        dashboard_id: &str,
        widgets: &[Widget],
    ) -> Result<UpdateResponse, ApiError> {
        self.updates
            .lock()
            .expect("updates lock")
            .push((dashboard_id.to_string(), widgets.to_vec()));
        Ok(UpdateResponse {
            success: true,
            message: None,
        })
    }
}

/// Clipboard fake whose contents stay observable after boxing.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    /// Last text written.
    pub text: Arc<Mutex<Option<String>>>,
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        *self.text.lock().expect("clipboard lock") = Some(text.to_string());
        Ok(())
    }
}

/// Native share fake recording shared URLs.
#[derive(Clone, Default)]
pub struct RecordingShare {
    /// URLs shared so far.
    pub urls: Arc<Mutex<Vec<String>>>,
}

impl NativeShare for RecordingShare {
    fn share(&self, details: &ShareDetails) -> Result<(), ShareError> {
        self.urls.lock().expect("share lock").push(details.url.clone());
        Ok(())
    }
}

/// A named dashboard record.
pub fn make_dashboard(id: &str, name: &str) -> Dashboard {
    Dashboard {
        dashboard_id: id.to_string(),
        dashboard_name: Some(name.to_string()),
        widgets: Vec::new(),
        extra: Default::default(),
    }
}

/// Two widgets side by side at the top of the board.
pub fn sample_widgets() -> Vec<Widget> {
    vec![
        Widget::new(1, Position::new(0, 0), 200, 100).with_html("<p>Revenue</p>"),
        Widget::new(2, Position::new(300, 0), 200, 100).with_html("<b>Users</b>"),
    ]
}

/// Session for `user3` sharing against `http://localhost:3000`.
pub fn test_session() -> SessionContext {
    SessionContext::new(
        "user3",
        Url::parse("http://localhost:3000").expect("valid origin"),
    )
}

/// App whose view already holds `widgets` and the dashboards `dash-1`
/// ("Sales") and `dash-2` ("Ops"), with `dash-1` open. The clipboard is
/// an in-memory fake.
pub fn make_loaded_app(mode: ViewMode, widgets: Vec<Widget>) -> (App, Arc<StubApi>, MemoryClipboard) {
    let dashboards = vec![make_dashboard("dash-1", "Sales"), make_dashboard("dash-2", "Ops")];
    let api = Arc::new(StubApi {
        dashboards: dashboards.clone(),
        widgets: widgets.clone(),
        ..StubApi::default()
    });
    let mut view = match mode {
        ViewMode::Editable => BoardView::editable(test_session(), "dash-1"),
        ViewMode::Shared => BoardView::shared(test_session(), "dash-1"),
    };
    let ticket = view.reload();
    view.apply(ViewMessage::Dashboards(ticket.clone(), Ok(dashboards)));
    view.apply(ViewMessage::Widgets(ticket, Ok(widgets)));

    let clipboard = MemoryClipboard::default();
    let app = App::new(view, api.clone()).with_share(None, Box::new(clipboard.clone()));
    (app, api, clipboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_has_requested_size() {
        let terminal = test_terminal(80, 24);
        let size = terminal.size().expect("should have size");
        assert_eq!((size.width, size.height), (80, 24));
    }

    #[test]
    fn test_row_helpers_find_text() {
        let mut terminal = test_terminal(20, 3);
        terminal
            .draw(|frame| {
                frame.render_widget(ratatui::widgets::Paragraph::new("\nHello World"), frame.area());
            })
            .expect("draw failed");
        let buffer = terminal.backend().buffer();
        assert!(row_text(buffer, 1).contains("Hello World"));
        assert_eq!(find_row_with_text(buffer, "World"), Some(1));
        assert_eq!(find_row_with_text(buffer, "Missing"), None);
        assert_eq!(symbol_at(buffer, 0, 1), "H");
        assert!(row_text(buffer, 99).is_empty());
    }
}
