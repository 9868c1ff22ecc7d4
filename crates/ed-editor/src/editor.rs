//! One editing session: engine, drag tool and undo history wired together.

use crate::commands::CommandStack;
use crate::input::InputEvent;
use crate::sync::{DoodleMutation, DrawingEngine};
use crate::tools::{DragTool, Hit, Tool};
use ed_core::{Doodle, DoodleId, Drawing, EngineError, Param, ParamValue, Resolution};

pub struct Editor {
    pub engine: DrawingEngine,
    pub tool: DragTool,
    pub commands: CommandStack,
}

impl Editor {
    pub fn new(drawing: Drawing) -> Self {
        let commands = CommandStack::new(drawing.config().undo_depth);
        Self {
            engine: DrawingEngine::new(drawing),
            tool: DragTool::new(),
            commands,
        }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.engine.drawing
    }

    pub fn selected(&self) -> Option<DoodleId> {
        self.tool.selected
    }

    /// Feed one pointer event through the tool. A press that starts a drag
    /// opens an undo batch; the release or leave that ends it closes the
    /// batch after dependents have resolved.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<(), EngineError> {
        let hit = match *event {
            InputEvent::PointerDown { x, y } => {
                self.tool.hit(&self.engine.drawing, kurbo::Point::new(x, y))
            }
            _ => Hit::Nothing,
        };
        let mutations = self.tool.handle(event, hit);
        if matches!(event, InputEvent::PointerDown { .. }) && self.tool.is_dragging() {
            self.commands.begin_batch(&self.engine);
        }
        for mutation in mutations {
            let ends = matches!(mutation, DoodleMutation::EndGesture { .. });
            let result = self.commands.execute(&mut self.engine, mutation, "drag");
            if ends {
                self.commands.end_batch(&self.engine, "drag");
            }
            result?;
        }
        Ok(())
    }

    pub fn set_parameter(
        &mut self,
        id: DoodleId,
        param: Param,
        value: impl Into<ParamValue>,
    ) -> Result<Option<Resolution>, EngineError> {
        let mutation = DoodleMutation::SetParameter {
            id,
            param,
            value: value.into(),
        };
        self.commands
            .execute(&mut self.engine, mutation, &format!("set {param}"))
    }

    pub fn add_doodle(&mut self, doodle: Doodle) -> Result<(), EngineError> {
        let description = format!("add {}", doodle.class_name());
        let mutation = DoodleMutation::AddDoodle {
            doodle: Box::new(doodle),
        };
        self.commands
            .execute(&mut self.engine, mutation, &description)
            .map(|_| ())
    }

    pub fn remove_doodle(&mut self, id: DoodleId) -> Result<(), EngineError> {
        if self.tool.selected == Some(id) {
            self.tool.selected = None;
        }
        self.commands
            .execute(
                &mut self.engine,
                DoodleMutation::RemoveDoodle { id },
                &format!("remove {id}"),
            )
            .map(|_| ())
    }

    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.engine.tick(dt_ms)
    }

    pub fn undo(&mut self) -> Option<String> {
        self.commands.undo(&mut self.engine)
    }

    pub fn redo(&mut self) -> Option<String> {
        self.commands.redo(&mut self.engine)
    }
}
