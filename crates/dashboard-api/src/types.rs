//! Type definitions for dashboard API payloads.
//!
//! These structures map to the JSON bodies exchanged with the dashboard
//! backend. Unknown fields on widgets and dashboards are kept in an `extra`
//! map so that a wholesale save writes back everything the client received.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Pixel offset of a widget from the top-left corner of its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl Position {
    /// Creates a position from pixel coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Stable widget identifier within a dashboard.
///
/// The backend has stored both numeric and string card numbers, so either
/// JSON form is accepted and written back in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardNumber {
    /// Numeric identifier (`"cardNumber": 3`).
    Number(i64),
    /// Textual identifier (`"cardNumber": "3"`).
    Text(String),
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardNumber::Number(n) => write!(f, "{}", n),
            CardNumber::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CardNumber {
    fn from(n: i64) -> Self {
        CardNumber::Number(n)
    }
}

impl From<i32> for CardNumber {
    fn from(n: i32) -> Self {
        CardNumber::Number(i64::from(n))
    }
}

/// One positioned, sized block of markup on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Identifier used as render key and index correlator.
    #[serde(rename = "cardNumber")]
    pub card_number: CardNumber,

    /// Offset from the container origin. Missing positions load as `(0, 0)`.
    #[serde(default)]
    pub position: Position,

    /// Width in pixels.
    pub width: i32,

    /// Height in pixels.
    pub height: i32,

    /// Opaque markup shown inside the widget body.
    ///
    /// Stored and written back untouched; the client never sanitizes it.
    #[serde(default)]
    pub html: String,

    /// Fields this client does not model, preserved across saves.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Widget {
    /// Creates a widget with no markup and no extra fields.
    pub fn new(card_number: impl Into<CardNumber>, position: Position, width: i32, height: i32) -> Self {
        Self {
            card_number: card_number.into(),
            position,
            width,
            height,
            html: String::new(),
            extra: Map::new(),
        }
    }

    /// Returns a copy of this widget with the given markup.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }
}

/// A named collection of widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Unique identifier, also used in share URLs.
    pub dashboard_id: String,

    /// Display label.
    #[serde(default)]
    pub dashboard_name: Option<String>,

    /// Widgets embedded in the listing, if the backend includes them.
    #[serde(default)]
    pub widgets: Vec<Widget>,

    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    /// Returns the display name, or `None` when it is absent or empty.
    pub fn display_name(&self) -> Option<&str> {
        self.dashboard_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Picks a dashboard from a listing.
///
/// With an identifier, returns the dashboard whose `dashboard_id` matches.
/// Without one, returns the first dashboard in API order.
pub fn select_dashboard<'a>(dashboards: &'a [Dashboard], id: Option<&str>) -> Option<&'a Dashboard> {
    match id {
        Some(id) => dashboards.iter().find(|d| d.dashboard_id == id),
        None => dashboards.first(),
    }
}

/// Body of `GET /api/dashboards?username=...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardsResponse {
    /// Whether the backend considered the request successful.
    pub success: bool,

    /// Dashboards keyed by identifier, in the order the backend sent them.
    #[serde(default)]
    pub dashboards: IndexMap<String, Dashboard>,

    /// Failure description when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /api/get_cards/{dashboardId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardsResponse {
    /// Container for the widget list; may be absent.
    #[serde(default)]
    pub dashboard_items: Option<DashboardItems>,
}

/// The `dashboard_items` object of a [`CardsResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardItems {
    /// Widget list; may be absent.
    #[serde(default)]
    pub widgets: Option<Vec<Widget>>,
}

impl CardsResponse {
    /// Extracts the widget list. Absence at any level means no widgets.
    pub fn into_widgets(self) -> Vec<Widget> {
        self.dashboard_items
            .and_then(|items| items.widgets)
            .unwrap_or_default()
    }
}

/// Body of `POST /api/update_card`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest<'a> {
    /// Dashboard whose widget list is replaced.
    pub dashboard_id: &'a str,
    /// Complete widget list; replaces the stored one wholesale.
    pub widgets: &'a [Widget],
}

/// Response of `POST /api/update_card`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Whether the update was stored.
    pub success: bool,
    /// Optional status or failure description.
    #[serde(default)]
    pub message: Option<String>,
}
