//! Tool system for canvas interactions.
//!
//! A tool translates input events into `DoodleMutation`s that are applied
//! through the `DrawingEngine`. Hit testing is done by the caller before
//! the press reaches the tool, using [`DragTool::hit`].

use crate::input::InputEvent;
use crate::sync::DoodleMutation;
use ed_core::{DoodleId, Drawing};
use ed_render::{hit_test, hit_test_handle};
use kurbo::Point;

/// What lies under the pointer when it is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hit {
    Handle { id: DoodleId, index: usize },
    Doodle(DoodleId),
    #[default]
    Nothing,
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    /// Handle an input event, returning zero or more mutations.
    fn handle(&mut self, event: &InputEvent, hit: Hit) -> Vec<DoodleMutation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Move(DoodleId),
    Handle(DoodleId, usize),
}

impl Gesture {
    fn id(self) -> DoodleId {
        match self {
            Gesture::Move(id) | Gesture::Handle(id, _) => id,
        }
    }
}

// ─── Drag Tool ───────────────────────────────────────────────────────────

/// Select, move and reshape doodles.
#[derive(Debug, Clone, Default)]
pub struct DragTool {
    pub selected: Option<DoodleId>,
    gesture: Option<Gesture>,
    last: Point,
}

impl DragTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Handles of the selected doodle take priority, then doodle bodies
    /// front to back.
    pub fn hit(&self, drawing: &Drawing, canvas: Point) -> Hit {
        let radius = drawing.config().handle_radius;
        if let Some(doodle) = self.selected.and_then(|id| drawing.doodle(id)) {
            if let Some(index) = hit_test_handle(drawing, doodle, canvas, radius) {
                return Hit::Handle {
                    id: doodle.id(),
                    index,
                };
            }
        }
        match hit_test(drawing, canvas) {
            Some(id) => Hit::Doodle(id),
            None => Hit::Nothing,
        }
    }

    fn end(&mut self) -> Vec<DoodleMutation> {
        match self.gesture.take() {
            Some(gesture) => vec![DoodleMutation::EndGesture { id: gesture.id() }],
            None => Vec::new(),
        }
    }
}

impl Tool for DragTool {
    fn handle(&mut self, event: &InputEvent, hit: Hit) -> Vec<DoodleMutation> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.last = Point::new(x, y);
                self.gesture = match hit {
                    Hit::Handle { id, index } => {
                        self.selected = Some(id);
                        Some(Gesture::Handle(id, index))
                    }
                    Hit::Doodle(id) => {
                        self.selected = Some(id);
                        Some(Gesture::Move(id))
                    }
                    Hit::Nothing => {
                        self.selected = None;
                        None
                    }
                };
                Vec::new()
            }
            InputEvent::PointerMove { x, y } => {
                let Some(gesture) = self.gesture else {
                    return Vec::new();
                };
                let at = Point::new(x, y);
                let delta = at - self.last;
                self.last = at;
                match gesture {
                    Gesture::Move(id) => vec![DoodleMutation::MoveDoodle {
                        id,
                        dx: delta.x,
                        dy: delta.y,
                    }],
                    Gesture::Handle(id, index) => {
                        vec![DoodleMutation::DragHandle { id, index, x, y }]
                    }
                }
            }
            InputEvent::PointerUp { .. } => self.end(),
            InputEvent::PointerLeave => {
                if let Some(gesture) = self.gesture {
                    log::debug!("pointer left mid-gesture on {}", gesture.id());
                }
                self.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed_core::shapes::{Lens, RecordGrid};
    use ed_core::Shape;
    use pretty_assertions::assert_eq;

    fn lens_drawing() -> (Drawing, DoodleId) {
        let mut drawing = Drawing::default();
        drawing.add_doodle(Shape::RecordGrid(RecordGrid)).unwrap();
        let lens = drawing.add_doodle(Shape::Lens(Lens)).unwrap();
        (drawing, lens)
    }

    #[test]
    fn handles_only_hit_when_selected() {
        let (drawing, lens) = lens_drawing();
        let d = drawing.doodle(lens).unwrap();
        // Just outside the lens rim, still within the handle radius.
        let at = drawing.plane().to_canvas(d.base.handles[0].location) + (6.0, 6.0);
        let mut tool = DragTool::new();
        assert_eq!(tool.hit(&drawing, at), Hit::Nothing);
        tool.selected = Some(lens);
        assert_eq!(tool.hit(&drawing, at), Hit::Handle { id: lens, index: 0 });
    }

    #[test]
    fn press_move_release() {
        let (drawing, lens) = lens_drawing();
        let centre = drawing.plane().to_canvas(Point::ZERO);
        let mut tool = DragTool::new();

        let hit = tool.hit(&drawing, centre);
        assert_eq!(hit, Hit::Doodle(lens));
        assert!(tool.handle(&InputEvent::down(centre.x, centre.y), hit).is_empty());
        assert_eq!(tool.selected, Some(lens));

        let m = tool.handle(&InputEvent::move_to(centre.x + 5.0, centre.y - 2.0), Hit::Nothing);
        assert!(matches!(
            m.as_slice(),
            [DoodleMutation::MoveDoodle { dx, dy, .. }] if *dx == 5.0 && *dy == -2.0
        ));
        let m = tool.handle(&InputEvent::up(centre.x + 5.0, centre.y - 2.0), Hit::Nothing);
        assert!(matches!(m.as_slice(), [DoodleMutation::EndGesture { id }] if *id == lens));
        assert!(!tool.is_dragging());
    }

    #[test]
    fn press_on_empty_space_clears_selection() {
        let mut tool = DragTool::new();
        tool.selected = Some(DoodleId::intern("Lens_9"));
        tool.handle(&InputEvent::down(1.0, 1.0), Hit::Nothing);
        assert_eq!(tool.selected, None);
        assert!(tool.handle(&InputEvent::move_to(9.0, 9.0), Hit::Nothing).is_empty());
        assert!(tool.handle(&InputEvent::PointerLeave, Hit::Nothing).is_empty());
    }

    #[test]
    fn leave_ends_the_gesture() {
        let mut tool = DragTool::new();
        let id = DoodleId::intern("Lens_3");
        tool.handle(&InputEvent::down(0.0, 0.0), Hit::Handle { id, index: 0 });
        let m = tool.handle(&InputEvent::move_to(4.0, 4.0), Hit::Nothing);
        assert!(matches!(
            m.as_slice(),
            [DoodleMutation::DragHandle { index: 0, x, y, .. }] if *x == 4.0 && *y == 4.0
        ));
        let m = tool.handle(&InputEvent::PointerLeave, Hit::Nothing);
        assert!(matches!(m.as_slice(), [DoodleMutation::EndGesture { id: e }] if *e == id));
    }
}
