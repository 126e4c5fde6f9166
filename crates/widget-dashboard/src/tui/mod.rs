//! Terminal user interface for the widget dashboard.
//!
//! Built on ratatui and crossterm. The pixel layout of the widgets is
//! projected onto terminal cells by [`canvas::CanvasScale`]; the mouse drives
//! drag and resize in edit mode.

pub mod app;
pub mod canvas;
pub mod event;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;
