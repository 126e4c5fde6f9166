//! Widget Dashboard library
//!
//! A terminal client for dashboards made of positioned, sized widgets stored
//! by a remote backend. The owner's view supports drag and resize editing
//! with save-on-exit; the shared view is read-only and re-flows widgets for
//! the terminal width.
//!
//! The HTTP client and data model live in the `dashboard-api` crate; this
//! crate holds everything on top of it.

/// Configuration file loading, schema and XDG paths.
pub mod config;

/// Drag and resize gestures over an editable widget list.
pub mod gesture;

/// Device classification and responsive re-flow.
pub mod layout;

/// Tracing subscriber setup.
pub mod logging;

/// Widget markup reduced to terminal text.
pub mod markup;

/// Identity of the person using the client.
pub mod session;

/// Share links, native share and clipboard fallback.
pub mod share;

/// TUI module providing the terminal user interface for the dashboard.
pub mod tui;

/// Dashboard view state and background loading.
pub mod view;
