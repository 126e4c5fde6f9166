//! Pointer-driven drag and resize of widgets in edit mode.
//!
//! The controller owns the editable widget list. A gesture starts on pointer
//! press, follows every pointer move, and ends on release:
//!
//! ```text
//!  Idle --begin_drag/begin_resize--> Active --pointer_released--> Idle
//!                                     |  ^
//!                                     +--+ pointer_moved
//! ```
//!
//! The active gesture is an owned [`ActiveGesture`] value. Ending a gesture
//! drops it, and dropping the controller ends any gesture in progress, so
//! there is no listener to forget to detach.

use dashboard_api::{Position, Widget};
use thiserror::Error;

/// Smallest width and height a live resize may produce, in pixels.
pub const MIN_WIDGET_SIZE: i32 = 100;

/// Pointer location in board pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal pixel coordinate.
    pub x: i32,
    /// Vertical pixel coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Which widget fields a gesture mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Moves the widget (`position`).
    Drag,
    /// Resizes the widget (`width` and `height`).
    Resize,
}

/// State captured when a gesture starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGesture {
    kind: GestureKind,
    index: usize,
    origin: Point,
    /// Initial position (drag) or initial `(width, height)` (resize).
    initial: (i32, i32),
}

impl ActiveGesture {
    /// Kind of the gesture.
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// Index of the widget being mutated.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pointer location at gesture start.
    pub fn origin(&self) -> Point {
        self.origin
    }

    fn apply(&self, widget: &mut Widget, pointer: Point) {
        let dx = pointer.x.saturating_sub(self.origin.x);
        let dy = pointer.y.saturating_sub(self.origin.y);
        let (ix, iy) = self.initial;
        match self.kind {
            GestureKind::Drag => {
                widget.position = Position::new(ix.saturating_add(dx), iy.saturating_add(dy));
            }
            GestureKind::Resize => {
                widget.width = ix.saturating_add(dx).max(MIN_WIDGET_SIZE);
                widget.height = iy.saturating_add(dy).max(MIN_WIDGET_SIZE);
            }
        }
    }
}

/// Result of a successful edit-mode toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum EditToggle {
    /// Edit mode is now on.
    Entered,
    /// Edit mode is now off; carries the full widget list to persist.
    Exited(Vec<Widget>),
}

/// Reasons an edit-mode toggle is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditToggleError {
    /// A drag or resize is still in progress.
    #[error("cannot toggle edit mode while a gesture is in progress")]
    GestureActive,
    /// The view is read-only.
    #[error("shared dashboards are read-only")]
    ReadOnly,
}

/// Edit-mode state machine over an owned widget list.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    widgets: Vec<Widget>,
    editing: bool,
    active: Option<ActiveGesture>,
}

impl InteractionController {
    /// Creates a controller over `widgets`, not in edit mode.
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            widgets,
            editing: false,
            active: None,
        }
    }

    /// Current widget list, including any edits.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Installs a freshly fetched widget list, ending any gesture.
    pub fn replace_widgets(&mut self, widgets: Vec<Widget>) {
        self.active = None;
        self.widgets = widgets;
    }

    /// Whether edit mode is on.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The gesture in progress, if any.
    pub fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    /// Whether a resize is in progress. Drag starts are suppressed while true.
    pub fn is_resizing(&self) -> bool {
        matches!(self.active, Some(ActiveGesture { kind: GestureKind::Resize, .. }))
    }

    /// Starts moving the widget at `index`.
    ///
    /// Returns `false` (and changes nothing) outside edit mode, while another
    /// gesture is active, or for an unknown index.
    pub fn begin_drag(&mut self, index: usize, pointer: Point) -> bool {
        self.begin(GestureKind::Drag, index, pointer)
    }

    /// Starts resizing the widget at `index`. Same preconditions as
    /// [`begin_drag`](Self::begin_drag).
    pub fn begin_resize(&mut self, index: usize, pointer: Point) -> bool {
        self.begin(GestureKind::Resize, index, pointer)
    }

    fn begin(&mut self, kind: GestureKind, index: usize, pointer: Point) -> bool {
        if !self.editing || self.active.is_some() {
            return false;
        }
        let Some(widget) = self.widgets.get(index) else {
            return false;
        };
        let initial = match kind {
            GestureKind::Drag => (widget.position.x, widget.position.y),
            GestureKind::Resize => (widget.width, widget.height),
        };
        tracing::trace!(?kind, index, "gesture started");
        self.active = Some(ActiveGesture {
            kind,
            index,
            origin: pointer,
            initial,
        });
        true
    }

    /// Applies a pointer sample to the active gesture.
    ///
    /// Each sample overwrites the previous result; only the widget under the
    /// gesture changes. Returns `false` when no gesture is active.
    pub fn pointer_moved(&mut self, pointer: Point) -> bool {
        let Some(gesture) = &self.active else {
            return false;
        };
        match self.widgets.get_mut(gesture.index) {
            Some(widget) => {
                gesture.apply(widget, pointer);
                true
            }
            None => false,
        }
    }

    /// Ends the active gesture, returning its kind.
    pub fn pointer_released(&mut self) -> Option<GestureKind> {
        let ended = self.active.take()?;
        tracing::trace!(kind = ?ended.kind, index = ended.index, "gesture ended");
        Some(ended.kind)
    }

    /// Flips edit mode.
    ///
    /// Leaving edit mode hands back the whole widget list for persistence.
    /// Refused while a gesture is active.
    pub fn toggle_edit(&mut self) -> Result<EditToggle, EditToggleError> {
        if self.active.is_some() {
            return Err(EditToggleError::GestureActive);
        }
        self.editing = !self.editing;
        if self.editing {
            Ok(EditToggle::Entered)
        } else {
            Ok(EditToggle::Exited(self.widgets.clone()))
        }
    }
}
