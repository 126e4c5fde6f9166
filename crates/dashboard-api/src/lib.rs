//! # dashboard-api
//!
//! Typed client for the widget dashboard backend.
//!
//! The backend stores named dashboards, each holding a list of absolutely
//! positioned widgets. This crate models those records and exposes the three
//! endpoints the dashboard frontend uses:
//!
//! - `GET /api/dashboards?username={name}`
//! - `GET /api/get_cards/{dashboardId}`
//! - `POST /api/update_card`
//!
//! ## Example
//!
//! ```rust,ignore
//! use dashboard_api::{DashboardApi, DashboardClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
//!
//! let client = DashboardClient::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)?;
//! let widgets = client.fetch_widgets("dash-1").await?;
//! println!("{} widgets", widgets.len());
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{DashboardApi, DashboardClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use types::{
    select_dashboard, CardNumber, CardsResponse, Dashboard, DashboardItems, DashboardsResponse,
    Position, UpdateRequest, UpdateResponse, Widget,
};
