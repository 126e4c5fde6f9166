//! Identity and origin of the person viewing a dashboard.
//!
//! Built once at startup from configuration (or from a share link) and
//! handed to each view.

use url::Url;

/// Per-run user context passed into views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Owner of the dashboards being viewed.
    pub username: String,
    /// Origin share links are built against.
    pub share_origin: Url,
}

impl SessionContext {
    /// Creates a session context.
    pub fn new(username: impl Into<String>, share_origin: Url) -> Self {
        Self {
            username: username.into(),
            share_origin,
        }
    }
}
