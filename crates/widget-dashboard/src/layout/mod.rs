//! Responsive layout for the shared dashboard view.
//!
//! Widgets carry desktop pixel positions. Narrower viewports re-flow them:
//! mobile stacks everything in one column, tablet balances two columns by
//! always filling the currently shorter one. Only `position` is recomputed.

mod device;
mod reflow;

pub use device::{DeviceClass, MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH};
pub use reflow::{reflow, MOBILE_GAP, TABLET_GAP};
