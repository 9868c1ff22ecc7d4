//! Input abstraction layer.
//!
//! Normalizes mouse, touch and stylus events into a single `InputEvent`
//! enum in canvas pixels, consumed by the drag tool. Only position matters
//! to a drag, so device extras such as pressure are dropped at the edge.

use kurbo::Point;

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pencil contact).
    PointerDown { x: f64, y: f64 },

    /// Pointer moved.
    PointerMove { x: f64, y: f64 },

    /// Pointer released.
    PointerUp { x: f64, y: f64 },

    /// Pointer left the canvas mid-gesture. Ends any drag in progress.
    PointerLeave,
}

impl InputEvent {
    pub fn down(x: f64, y: f64) -> Self {
        InputEvent::PointerDown { x, y }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        InputEvent::PointerMove { x, y }
    }

    pub fn up(x: f64, y: f64) -> Self {
        InputEvent::PointerUp { x, y }
    }

    /// Canvas position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => Some(Point::new(x, y)),
            InputEvent::PointerLeave => None,
        }
    }
}
