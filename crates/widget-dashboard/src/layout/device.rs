//! Device class detection from viewport width.

use std::fmt;

/// Viewports narrower than this many pixels are mobile.
pub const MOBILE_MAX_WIDTH: u32 = 768;

/// Viewports narrower than this many pixels (and not mobile) are tablet.
pub const TABLET_MAX_WIDTH: u32 = 1024;

/// Layout policy selector derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceClass {
    /// Single column, stacked in original order.
    Mobile,
    /// Two columns balanced by shortest-column assignment.
    Tablet,
    /// Stored positions used as-is.
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Classifies a viewport width in pixels.
    pub fn from_viewport_width(width: u32) -> Self {
        if width < MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if width < TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        };
        f.write_str(s)
    }
}
