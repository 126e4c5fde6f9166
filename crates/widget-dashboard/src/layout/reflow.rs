//! Position re-flow policies per device class.

use dashboard_api::{Position, Widget};

use super::DeviceClass;

/// Vertical gap between stacked widgets on mobile, in pixels.
pub const MOBILE_GAP: i32 = 30;

/// Gap between widgets (both axes) on tablet, in pixels.
pub const TABLET_GAP: i32 = 10;

/// Computes widget positions for `device`.
///
/// Returns a new sequence in the original order. Width, height, markup and
/// identifiers pass through unchanged; the input is never modified.
pub fn reflow(widgets: &[Widget], device: DeviceClass) -> Vec<Widget> {
    match device {
        DeviceClass::Desktop => widgets.to_vec(),
        DeviceClass::Mobile => stack_single_column(widgets),
        DeviceClass::Tablet => balance_two_columns(widgets),
    }
}

fn stack_single_column(widgets: &[Widget]) -> Vec<Widget> {
    let mut cursor: i32 = 0;
    widgets
        .iter()
        .map(|widget| {
            let mut placed = widget.clone();
            placed.position = Position::new(0, cursor);
            cursor = cursor
                .saturating_add(widget.height)
                .saturating_add(MOBILE_GAP);
            placed
        })
        .collect()
}

/// Greedy shortest-column placement; ties go to the left column.
///
/// Never reorders and never revisits earlier placements.
fn balance_two_columns(widgets: &[Widget]) -> Vec<Widget> {
    let mut columns: [i32; 2] = [0, 0];
    widgets
        .iter()
        .map(|widget| {
            let column = if columns[0] <= columns[1] { 0 } else { 1 };
            let x = (column as i32).saturating_mul(widget.width.saturating_add(TABLET_GAP));
            let mut placed = widget.clone();
            placed.position = Position::new(x, columns[column]);
            columns[column] = columns[column]
                .saturating_add(widget.height)
                .saturating_add(TABLET_GAP);
            placed
        })
        .collect()
}
