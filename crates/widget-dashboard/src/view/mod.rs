//! Dashboard view state shared by the editable and the shared view.
//!
//! A [`BoardView`] holds everything one open dashboard needs: the session it
//! belongs to, the dashboard metadata, the widgets as fetched, the
//! interaction controller and the current device class. It performs no I/O
//! itself. Loads are started through [`loader`], whose tasks post
//! [`ViewMessage`]s back to the event loop, which hands them to
//! [`BoardView::apply`].
//!
//! Every load carries a [`LoadTicket`]. Navigating or reloading bumps the
//! view's generation, so a response that arrives after the user moved on is
//! dropped instead of overwriting newer state.

pub mod loader;

use dashboard_api::{select_dashboard, ApiError, Dashboard, UpdateResponse, Widget};

use crate::gesture::{EditToggle, EditToggleError, InteractionController};
use crate::layout::{reflow, DeviceClass};
use crate::session::SessionContext;
use crate::share::{share_url, ShareDetails};

pub use loader::{spawn_load, spawn_save};

/// Title shown until dashboard metadata is available.
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Text attached to shared links.
pub const SHARE_TEXT: &str = "Check out this dashboard";

/// Which flavour of the view is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Owner's view: desktop positions, edit mode, save and share.
    Editable,
    /// Read-only view re-flowed for the device class.
    Shared,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Editable => write!(f, "editable"),
            ViewMode::Shared => write!(f, "shared"),
        }
    }
}

/// Identifies one load request of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    dashboard_id: String,
}

impl LoadTicket {
    /// Generation the ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dashboard the ticket loads.
    pub fn dashboard_id(&self) -> &str {
        &self.dashboard_id
    }
}

/// Results posted back to the event loop by loader tasks.
#[derive(Debug)]
pub enum ViewMessage {
    /// Dashboard listing for the view's user.
    Dashboards(LoadTicket, Result<Vec<Dashboard>, ApiError>),
    /// Widget list of the view's dashboard.
    Widgets(LoadTicket, Result<Vec<Widget>, ApiError>),
    /// Outcome of a save.
    Saved(Result<UpdateResponse, ApiError>),
}

/// Wholesale replacement of a dashboard's widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Dashboard to update.
    pub dashboard_id: String,
    /// Complete widget list to store.
    pub widgets: Vec<Widget>,
}

/// State of one open dashboard.
#[derive(Debug, Clone)]
pub struct BoardView {
    mode: ViewMode,
    session: SessionContext,
    dashboard_id: String,
    generation: u64,
    /// Listing the metadata was selected from, in backend order.
    dashboards: Vec<Dashboard>,
    dashboard: Option<Dashboard>,
    /// Widgets exactly as fetched. Re-flow always starts from these.
    original: Vec<Widget>,
    controller: InteractionController,
    device: DeviceClass,
    /// Shared view only: `original` re-flowed for `device`.
    laid_out: Vec<Widget>,
    /// Whether the current generation's widgets have arrived.
    widgets_loaded: bool,
}

impl BoardView {
    fn new(mode: ViewMode, session: SessionContext, dashboard_id: impl Into<String>) -> Self {
        Self {
            mode,
            session,
            dashboard_id: dashboard_id.into(),
            generation: 0,
            dashboards: Vec::new(),
            dashboard: None,
            original: Vec::new(),
            controller: InteractionController::default(),
            device: DeviceClass::default(),
            laid_out: Vec::new(),
            widgets_loaded: false,
        }
    }

    /// Owner's view of `dashboard_id`. Nothing is loaded until
    /// [`reload`](Self::reload) or [`navigate`](Self::navigate).
    pub fn editable(session: SessionContext, dashboard_id: impl Into<String>) -> Self {
        Self::new(ViewMode::Editable, session, dashboard_id)
    }

    /// Read-only view of `dashboard_id` owned by `session.username`.
    pub fn shared(session: SessionContext, dashboard_id: impl Into<String>) -> Self {
        Self::new(ViewMode::Shared, session, dashboard_id)
    }

    /// Mode of the view.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Session the view belongs to.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Identifier of the open dashboard.
    pub fn dashboard_id(&self) -> &str {
        &self.dashboard_id
    }

    /// Selected dashboard metadata, once loaded.
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// The user's dashboards, in backend order, once loaded.
    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    /// Current device class.
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// Current load generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switches to another dashboard.
    ///
    /// Clears the loaded state and returns the ticket for the new load.
    /// Edit mode is kept.
    pub fn navigate(&mut self, dashboard_id: impl Into<String>) -> LoadTicket {
        self.dashboard_id = dashboard_id.into();
        self.reload()
    }

    /// Starts a fresh load of the current dashboard.
    ///
    /// Clears the loaded state, so unsaved edits are discarded.
    pub fn reload(&mut self) -> LoadTicket {
        self.generation += 1;
        self.dashboard = None;
        self.original.clear();
        self.laid_out.clear();
        self.widgets_loaded = false;
        self.controller.replace_widgets(Vec::new());
        tracing::debug!(
            dashboard_id = %self.dashboard_id,
            generation = self.generation,
            "loading dashboard"
        );
        LoadTicket {
            generation: self.generation,
            dashboard_id: self.dashboard_id.clone(),
        }
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.dashboard_id == self.dashboard_id
    }

    /// Applies a loader result.
    ///
    /// Returns `true` when the view changed. Results for an outdated ticket
    /// are discarded. Failures are logged and leave the view in its empty or
    /// loading state. Save outcomes never change the view.
    pub fn apply(&mut self, message: ViewMessage) -> bool {
        match message {
            ViewMessage::Dashboards(ticket, result) => {
                if !self.is_current(&ticket) {
                    tracing::debug!(generation = ticket.generation, "discarding stale dashboard listing");
                    return false;
                }
                match result {
                    Ok(dashboards) => {
                        self.dashboard =
                            select_dashboard(&dashboards, Some(&self.dashboard_id)).cloned();
                        if self.dashboard.is_none() {
                            tracing::warn!(
                                dashboard_id = %self.dashboard_id,
                                "dashboard not found for user {}",
                                self.session.username
                            );
                        }
                        self.dashboards = dashboards;
                    }
                    Err(e) => {
                        tracing::error!("Error fetching dashboard data: {}", e);
                    }
                }
                true
            }
            ViewMessage::Widgets(ticket, result) => {
                if !self.is_current(&ticket) {
                    tracing::debug!(generation = ticket.generation, "discarding stale widget list");
                    return false;
                }
                match result {
                    Ok(widgets) => {
                        tracing::debug!(count = widgets.len(), "widgets loaded");
                        self.controller.replace_widgets(widgets.clone());
                        self.original = widgets;
                        self.widgets_loaded = true;
                        self.relayout();
                    }
                    Err(e) => {
                        tracing::error!("Error fetching widgets: {}", e);
                    }
                }
                true
            }
            ViewMessage::Saved(result) => {
                match result {
                    Ok(_) => tracing::info!("Widgets updated successfully"),
                    Err(e) => tracing::error!("Error saving widgets: {}", e),
                }
                false
            }
        }
    }

    /// Dashboard name, or [`LOADING_PLACEHOLDER`] until one is known.
    pub fn title(&self) -> &str {
        self.dashboard
            .as_ref()
            .and_then(Dashboard::display_name)
            .unwrap_or(LOADING_PLACEHOLDER)
    }

    /// Widgets to draw, in draw order.
    ///
    /// The editable view shows the controller's list with any edits; the
    /// shared view shows the fetched widgets re-flowed for the device class.
    pub fn widgets(&self) -> &[Widget] {
        match self.mode {
            ViewMode::Editable => self.controller.widgets(),
            ViewMode::Shared => &self.laid_out,
        }
    }

    /// Widgets exactly as last fetched.
    pub fn original_widgets(&self) -> &[Widget] {
        &self.original
    }

    /// Updates the viewport width in pixels.
    ///
    /// Returns `true` when the device class changed. The shared view then
    /// re-flows from the fetched widgets.
    pub fn set_viewport_width(&mut self, width: u32) -> bool {
        let device = DeviceClass::from_viewport_width(width);
        if device == self.device {
            return false;
        }
        tracing::debug!(%device, width, "device class changed");
        self.device = device;
        self.relayout();
        true
    }

    fn relayout(&mut self) {
        if self.mode == ViewMode::Shared {
            self.laid_out = reflow(&self.original, self.device);
        }
    }

    /// Whether the widgets of the current load have arrived.
    pub fn widgets_loaded(&self) -> bool {
        self.widgets_loaded
    }

    /// Whether edit mode is on.
    pub fn is_editing(&self) -> bool {
        self.controller.is_editing()
    }

    /// The interaction controller.
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Mutable access to the interaction controller for pointer events.
    ///
    /// The shared view never enters edit mode, so gestures started through
    /// this handle are refused there.
    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Flips edit mode.
    ///
    /// Leaving edit mode returns the save request carrying the whole widget
    /// list. The save is skipped when the current widgets never arrived, so
    /// an unloaded board cannot overwrite the stored one. The shared view is
    /// read-only.
    pub fn toggle_edit(&mut self) -> Result<Option<SaveRequest>, EditToggleError> {
        if self.mode == ViewMode::Shared {
            return Err(EditToggleError::ReadOnly);
        }
        match self.controller.toggle_edit()? {
            EditToggle::Entered => {
                tracing::debug!("edit mode on");
                Ok(None)
            }
            EditToggle::Exited(_) if !self.widgets_loaded => {
                tracing::warn!(
                    dashboard_id = %self.dashboard_id,
                    "edit mode off before widgets loaded, not saving"
                );
                Ok(None)
            }
            EditToggle::Exited(widgets) => {
                tracing::debug!(count = widgets.len(), "edit mode off, saving");
                Ok(Some(SaveRequest {
                    dashboard_id: self.dashboard_id.clone(),
                    widgets,
                }))
            }
        }
    }

    /// Identifier of the dashboard `offset` steps away in the listing,
    /// wrapping around. `None` until the listing is loaded.
    pub fn adjacent_dashboard(&self, offset: isize) -> Option<&str> {
        let len = self.dashboards.len();
        if len == 0 {
            return None;
        }
        let current = self
            .dashboards
            .iter()
            .position(|d| d.dashboard_id == self.dashboard_id)
            .unwrap_or(0);
        let next = (current as isize + offset).rem_euclid(len as isize) as usize;
        Some(&self.dashboards[next].dashboard_id)
    }

    /// Share link and metadata for this dashboard, or `None` when the
    /// configured origin cannot carry a path.
    pub fn share_details(&self) -> Option<ShareDetails> {
        let url = share_url(
            &self.session.share_origin,
            &self.session.username,
            &self.dashboard_id,
        )?;
        let title = self
            .dashboard
            .as_ref()
            .and_then(Dashboard::display_name)
            .unwrap_or("Dashboard")
            .to_string();
        Some(ShareDetails {
            url: url.to_string(),
            title,
            text: SHARE_TEXT.to_string(),
        })
    }
}
