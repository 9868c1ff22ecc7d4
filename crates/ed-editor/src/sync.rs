//! The drawing engine: canvas gestures → doodle parameters.
//!
//! Mutations arrive in canvas pixels from the drag tool or as programmatic
//! parameter sets. Every mutation runs synchronously in one order: handle
//! clamp, then parameter write, then (at the end of a gesture) dependency
//! resolution and linked-doodle propagation, then transform rebuild.
//!
//! Dependents are deliberately not resolved on every drag frame. Each
//! doodle keeps a list of the parameters its gesture wrote, and the
//! `EndGesture` mutation resolves them once.

use crate::animate::Animator;
use ed_core::{Doodle, DoodleId, Drawing, EngineError, Param, ParamValue, Resolution, Touched};
use kurbo::Point;

/// The engine holds the authoritative drawing and any tweens in flight.
pub struct DrawingEngine {
    pub drawing: Drawing,
    pub animator: Animator,
    /// Parameters written directly during the open gesture, per doodle.
    gestures: Vec<(DoodleId, Touched)>,
}

impl DrawingEngine {
    pub fn new(drawing: Drawing) -> Self {
        let animator = Animator::new(drawing.config().animation_ms);
        Self {
            drawing,
            animator,
            gestures: Vec::new(),
        }
    }

    /// Apply one mutation. Returns the resolution pass for mutations that
    /// resolve dependents.
    pub fn apply_mutation(
        &mut self,
        mutation: DoodleMutation,
    ) -> Result<Option<Resolution>, EngineError> {
        match mutation {
            DoodleMutation::AddDoodle { doodle } => {
                let id = self.drawing.insert_doodle(*doodle)?;
                log::debug!("ADD {id}");
                Ok(None)
            }
            DoodleMutation::RemoveDoodle { id } => {
                self.drawing
                    .remove_doodle(id)
                    .ok_or(EngineError::UnknownDoodle(id))?;
                self.gestures.retain(|(g, _)| *g != id);
                log::debug!("REMOVE {id}");
                Ok(None)
            }
            DoodleMutation::SetParameter { id, param, value } => {
                let resolution = self.drawing.set_parameter(id, param, value)?;
                self.animator
                    .start(&mut self.drawing, id, &resolution.animated);
                Ok(Some(resolution))
            }
            DoodleMutation::MoveDoodle { id, dx, dy } => {
                let plane = self.drawing.plane();
                let delta = plane.to_plane(Point::new(dx, dy)) - plane.to_plane(Point::ZERO);
                let env = self.drawing.env();
                let doodle = self
                    .drawing
                    .doodle_mut(id)
                    .ok_or(EngineError::UnknownDoodle(id))?;
                let touched = doodle.move_by(delta, &env)?;
                self.record(id, &touched);
                Ok(None)
            }
            DoodleMutation::DragHandle { id, index, x, y } => {
                let to = self.drawing.plane().to_plane(Point::new(x, y));
                let env = self.drawing.env();
                let doodle = self
                    .drawing
                    .doodle_mut(id)
                    .ok_or(EngineError::UnknownDoodle(id))?;
                let touched = doodle.drag_handle(index, to, &env)?;
                self.record(id, &touched);
                Ok(None)
            }
            DoodleMutation::EndGesture { id } => {
                let touched = self.take_gesture(id);
                if touched.is_empty() {
                    return Ok(None);
                }
                let resolution = self.drawing.finish_change(id, &touched)?;
                log::debug!("END {id} resolved {} parameters", resolution.applied.len());
                self.animator
                    .start(&mut self.drawing, id, &resolution.animated);
                Ok(Some(resolution))
            }
        }
    }

    fn record(&mut self, id: DoodleId, touched: &[Param]) {
        if touched.is_empty() {
            return;
        }
        let slot = match self.gestures.iter().position(|(g, _)| *g == id) {
            Some(i) => &mut self.gestures[i].1,
            None => {
                self.gestures.push((id, Touched::new()));
                let last = self.gestures.len() - 1;
                &mut self.gestures[last].1
            }
        };
        for param in touched {
            if !slot.contains(param) {
                slot.push(*param);
            }
        }
    }

    fn take_gesture(&mut self, id: DoodleId) -> Touched {
        match self.gestures.iter().position(|(g, _)| *g == id) {
            Some(i) => self.gestures.remove(i).1,
            None => Touched::new(),
        }
    }

    /// Parameters written so far by the open gesture on `id`.
    pub fn touched(&self, id: DoodleId) -> &[Param] {
        self.gestures
            .iter()
            .find(|(g, _)| *g == id)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }

    /// Advance animations. Returns whether anything is still moving.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.animator.tick(&mut self.drawing, dt_ms)
    }

    /// Copy of every doodle with running tweens already at their targets.
    pub fn snapshot(&self) -> Vec<Doodle> {
        let mut doodles = self.drawing.doodles().to_vec();
        self.animator.settle(&mut doodles, &self.drawing.env());
        doodles
    }

    /// Replace the drawing contents, dropping tweens and open gestures.
    pub fn restore(&mut self, doodles: Vec<Doodle>) {
        self.animator.clear();
        self.gestures.clear();
        self.drawing.restore(doodles);
    }
}

/// A change to the drawing. Pointer-driven variants carry canvas pixels.
#[derive(Debug, Clone)]
pub enum DoodleMutation {
    AddDoodle {
        doodle: Box<Doodle>,
    },
    RemoveDoodle {
        id: DoodleId,
    },
    SetParameter {
        id: DoodleId,
        param: Param,
        value: ParamValue,
    },
    /// Translate a moveable doodle by a canvas-pixel delta.
    MoveDoodle {
        id: DoodleId,
        dx: f64,
        dy: f64,
    },
    /// Drag handle `index` to a canvas position.
    DragHandle {
        id: DoodleId,
        index: usize,
        x: f64,
        y: f64,
    },
    /// Pointer released or left the canvas. Resolves whatever the gesture
    /// wrote, at its last clamped values.
    EndGesture {
        id: DoodleId,
    },
}

impl DoodleMutation {
    pub fn id(&self) -> Option<DoodleId> {
        match self {
            DoodleMutation::AddDoodle { .. } => None,
            DoodleMutation::RemoveDoodle { id }
            | DoodleMutation::SetParameter { id, .. }
            | DoodleMutation::MoveDoodle { id, .. }
            | DoodleMutation::DragHandle { id, .. }
            | DoodleMutation::EndGesture { id } => Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed_core::shapes::{Lens, Pulse};
    use ed_core::Shape;
    use pretty_assertions::assert_eq;

    #[test]
    fn move_converts_canvas_pixels_to_plane_units() {
        let mut drawing = Drawing::default();
        let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
        let scale = drawing.plane().scale();
        let mut engine = DrawingEngine::new(drawing);

        engine
            .apply_mutation(DoodleMutation::MoveDoodle {
                id: pulse,
                dx: 10.0 * scale,
                dy: 0.0,
            })
            .unwrap();
        let origin = engine.drawing.doodle(pulse).unwrap().base.origin();
        assert!((origin.x - 10.0).abs() < 1e-9);
        assert_eq!(engine.touched(pulse), &[Param::OriginX, Param::OriginY]);
    }

    #[test]
    fn gesture_resolves_once_at_the_end() {
        let mut drawing = Drawing::default();
        let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
        let mut engine = DrawingEngine::new(drawing);

        for _ in 0..3 {
            engine
                .apply_mutation(DoodleMutation::MoveDoodle {
                    id: pulse,
                    dx: 0.0,
                    dy: -20.0,
                })
                .unwrap();
        }
        let value = |e: &DrawingEngine| e.drawing.doodle(pulse).unwrap().base.number(Param::Value);
        assert_eq!(value(&engine), 120.0);

        let r = engine
            .apply_mutation(DoodleMutation::EndGesture { id: pulse })
            .unwrap()
            .unwrap();
        assert!(r.value_of(Param::Value).is_some());
        assert!(value(&engine) > 120.0);
        assert!(engine.touched(pulse).is_empty());
    }

    #[test]
    fn end_without_writes_is_a_no_op() {
        let mut drawing = Drawing::default();
        let lens = drawing.add_doodle(Shape::Lens(Lens)).unwrap();
        let mut engine = DrawingEngine::new(drawing);
        let r = engine
            .apply_mutation(DoodleMutation::EndGesture { id: lens })
            .unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn unknown_doodle_is_reported() {
        let mut engine = DrawingEngine::new(Drawing::default());
        let ghost = DoodleId::intern("Ghost_1");
        let err = engine
            .apply_mutation(DoodleMutation::RemoveDoodle { id: ghost })
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownDoodle(ghost));
    }
}
