//! Undo/Redo command stack.
//!
//! Single mutations keep the forward mutation plus a snapshot of the
//! doodles taken just before it. Undo restores the snapshot; redo replays
//! the mutation against that same state.
//!
//! Drag gestures are batched: the doodles are captured when the pointer
//! goes down and again after the gesture has resolved, so the whole drag
//! undoes in one step.

use crate::sync::{DoodleMutation, DrawingEngine};
use ed_core::{Doodle, EngineError, Resolution};

#[derive(Debug, Clone)]
pub enum Command {
    Single {
        forward: Box<DoodleMutation>,
        before: Vec<Doodle>,
        description: String,
    },
    Snapshot {
        before: Vec<Doodle>,
        after: Vec<Doodle>,
        description: String,
    },
}

impl Command {
    pub fn description(&self) -> &str {
        match self {
            Command::Single { description, .. } | Command::Snapshot { description, .. } => {
                description
            }
        }
    }
}

/// Manages undo/redo stacks with batch grouping for drag gestures.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    batch_snapshot: Option<Vec<Doodle>>,
    /// Whether anything changed during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch. Mutations until the matching `end_batch` apply live
    /// and undo as one step.
    pub fn begin_batch(&mut self, engine: &DrawingEngine) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(engine.snapshot());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// Close a batch. When the outermost batch closes after a change, one
    /// snapshot command is pushed.
    pub fn end_batch(&mut self, engine: &DrawingEngine, description: &str) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }
        let before = self.batch_snapshot.take();
        if self.batch_dirty {
            if let Some(before) = before {
                self.push(Command::Snapshot {
                    before,
                    after: engine.snapshot(),
                    description: description.to_string(),
                });
            }
        }
        self.batch_dirty = false;
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Apply a mutation through the engine and record it. A failed mutation
    /// leaves the stacks untouched.
    pub fn execute(
        &mut self,
        engine: &mut DrawingEngine,
        mutation: DoodleMutation,
        description: &str,
    ) -> Result<Option<Resolution>, EngineError> {
        if self.batch_depth > 0 {
            let moved = match mutation {
                DoodleMutation::MoveDoodle { id, .. } => Some(id),
                _ => None,
            };
            let ends = matches!(mutation, DoodleMutation::EndGesture { .. });
            let result = engine.apply_mutation(mutation)?;
            // A click, or a drag on something immovable, writes nothing.
            let changed = match moved {
                Some(id) => !engine.touched(id).is_empty(),
                None => !ends || result.is_some(),
            };
            self.batch_dirty |= changed;
            return Ok(result);
        }

        let before = engine.snapshot();
        let result = engine.apply_mutation(mutation.clone())?;
        self.push(Command::Single {
            forward: Box::new(mutation),
            before,
            description: description.to_string(),
        });
        Ok(result)
    }

    fn push(&mut self, cmd: Command) {
        log::debug!("COMMAND {}", cmd.description());
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the last command. Returns its description.
    pub fn undo(&mut self, engine: &mut DrawingEngine) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        match &cmd {
            Command::Single { before, .. } | Command::Snapshot { before, .. } => {
                engine.restore(before.clone());
            }
        }
        let description = cmd.description().to_string();
        self.redo_stack.push(cmd);
        Some(description)
    }

    /// Redo the last undone command. Returns its description.
    pub fn redo(&mut self, engine: &mut DrawingEngine) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        match &cmd {
            Command::Single { forward, .. } => {
                if let Err(e) = engine.apply_mutation(*forward.clone()) {
                    log::warn!("redo of {} failed: {e}", cmd.description());
                }
            }
            Command::Snapshot { after, .. } => engine.restore(after.clone()),
        }
        let description = cmd.description().to_string();
        self.undo_stack.push(cmd);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed_core::shapes::Lens;
    use ed_core::{Drawing, Param, Shape};
    use pretty_assertions::assert_eq;

    fn engine_with_lens() -> (DrawingEngine, ed_core::DoodleId) {
        let mut drawing = Drawing::default();
        let lens = drawing.add_doodle(Shape::Lens(Lens)).unwrap();
        (DrawingEngine::new(drawing), lens)
    }

    fn set_origin_x(id: ed_core::DoodleId, x: f64) -> DoodleMutation {
        DoodleMutation::SetParameter {
            id,
            param: Param::OriginX,
            value: x.into(),
        }
    }

    #[test]
    fn max_depth_drops_oldest() {
        let (mut engine, lens) = engine_with_lens();
        let mut stack = CommandStack::new(2);
        for x in [10.0, 20.0, 30.0] {
            stack
                .execute(&mut engine, set_origin_x(lens, x), "move")
                .unwrap();
        }
        assert_eq!(stack.depth(), 2);
        stack.undo(&mut engine);
        stack.undo(&mut engine);
        assert!(!stack.can_undo());
        let x = engine.drawing.doodle(lens).unwrap().base.origin().x;
        assert_eq!(x, 10.0);
    }

    #[test]
    fn failed_mutation_is_not_recorded() {
        let (mut engine, lens) = engine_with_lens();
        let mut stack = CommandStack::new(10);
        let bad = DoodleMutation::SetParameter {
            id: lens,
            param: Param::Type,
            value: "Sunflower".into(),
        };
        assert!(stack.execute(&mut engine, bad, "type").is_err());
        assert!(!stack.can_undo());
    }

    #[test]
    fn empty_batch_pushes_nothing() {
        let (mut engine, lens) = engine_with_lens();
        let mut stack = CommandStack::new(10);
        stack.begin_batch(&engine);
        stack
            .execute(&mut engine, DoodleMutation::EndGesture { id: lens }, "drag")
            .unwrap();
        stack.end_batch(&engine, "drag");
        assert!(!stack.can_undo());
        assert!(!stack.is_batching());
    }
}
