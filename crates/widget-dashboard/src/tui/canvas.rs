//! Projection of the widget pixel space onto terminal cells.
//!
//! One terminal column is `cell_width` pixels wide and one row
//! `cell_height` pixels tall. A widget's origin is floored to the cell it
//! falls in and its size is rounded up, so every widget covers at least one
//! cell. The board can be scrolled vertically by whole rows.

use dashboard_api::Widget;
use ratatui::layout::Rect;

use crate::gesture::Point;

/// Pixels per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasScale {
    /// Pixels per column.
    pub cell_width: u16,
    /// Pixels per row.
    pub cell_height: u16,
}

impl Default for CanvasScale {
    fn default() -> Self {
        Self {
            cell_width: 10,
            cell_height: 20,
        }
    }
}

/// A widget's footprint in board cells, before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    col: i64,
    row: i64,
    cols: i64,
    rows: i64,
}

/// Result of a pointer hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index of the widget in draw order.
    pub index: usize,
    /// Whether the pointer is on the widget's resize handle.
    pub on_handle: bool,
}

impl CanvasScale {
    /// Creates a scale; zero dimensions are raised to one pixel.
    pub fn new(cell_width: u16, cell_height: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Viewport width in pixels for a terminal `columns` wide.
    pub fn viewport_width(&self, columns: u16) -> u32 {
        u32::from(columns) * u32::from(self.cell_width)
    }

    fn span(&self, widget: &Widget) -> CellSpan {
        let cw = i64::from(self.cell_width);
        let ch = i64::from(self.cell_height);
        CellSpan {
            col: i64::from(widget.position.x).div_euclid(cw),
            row: i64::from(widget.position.y).div_euclid(ch),
            cols: ceil_div(i64::from(widget.width), cw).max(1),
            rows: ceil_div(i64::from(widget.height), ch).max(1),
        }
    }

    /// Screen rectangle of `widget` inside `board`, clipped to the board.
    ///
    /// `scroll` is the number of board rows scrolled off the top. Returns
    /// `None` when no part of the widget is visible.
    pub fn widget_rect(&self, widget: &Widget, board: Rect, scroll: u16) -> Option<Rect> {
        let span = self.span(widget);
        let left = i64::from(board.x) + span.col;
        let top = i64::from(board.y) + span.row - i64::from(scroll);
        let right = (left + span.cols).min(i64::from(board.right()));
        let bottom = (top + span.rows).min(i64::from(board.bottom()));
        let left = left.max(i64::from(board.x));
        let top = top.max(i64::from(board.y));
        if left >= right || top >= bottom {
            return None;
        }
        Some(Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }

    /// Screen cell of the widget's resize handle (its bottom-right cell),
    /// when that cell is visible.
    pub fn handle_cell(&self, widget: &Widget, board: Rect, scroll: u16) -> Option<(u16, u16)> {
        let span = self.span(widget);
        let col = i64::from(board.x) + span.col + span.cols - 1;
        let row = i64::from(board.y) + span.row + span.rows - 1 - i64::from(scroll);
        let inside = col >= i64::from(board.x)
            && col < i64::from(board.right())
            && row >= i64::from(board.y)
            && row < i64::from(board.bottom());
        inside.then_some((col as u16, row as u16))
    }

    /// Board pixel coordinates of the top-left corner of a screen cell.
    pub fn pointer_to_px(&self, column: u16, row: u16, board: Rect, scroll: u16) -> Point {
        let col = i64::from(column) - i64::from(board.x);
        let row = i64::from(row) - i64::from(board.y) + i64::from(scroll);
        Point::new(
            saturate(col * i64::from(self.cell_width)),
            saturate(row * i64::from(self.cell_height)),
        )
    }

    /// Finds the topmost widget under a screen cell.
    ///
    /// Later widgets are drawn over earlier ones, so the search runs from
    /// the end of the list.
    pub fn hit_test(
        &self,
        widgets: &[Widget],
        board: Rect,
        scroll: u16,
        column: u16,
        row: u16,
    ) -> Option<Hit> {
        widgets.iter().enumerate().rev().find_map(|(index, widget)| {
            let rect = self.widget_rect(widget, board, scroll)?;
            let inside = column >= rect.x
                && column < rect.right()
                && row >= rect.y
                && row < rect.bottom();
            inside.then(|| Hit {
                index,
                on_handle: self.handle_cell(widget, board, scroll) == Some((column, row)),
            })
        })
    }

    /// Number of board rows needed to show every widget.
    pub fn content_rows(&self, widgets: &[Widget]) -> u16 {
        let rows = widgets
            .iter()
            .map(|w| {
                let span = self.span(w);
                span.row + span.rows
            })
            .max()
            .unwrap_or(0);
        rows.clamp(0, i64::from(u16::MAX)) as u16
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    -((-value).div_euclid(divisor))
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
