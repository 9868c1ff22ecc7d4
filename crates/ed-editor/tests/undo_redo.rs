//! Integration tests: undo/redo through the command stack.

use ed_core::kurbo::Point;
use ed_core::shapes::{Drusen, Lens, Pulse, PulseTrace, SubretinalFluid};
use ed_core::{Doodle, DoodleId, Drawing, Param, ParamValue, Shape};
use ed_editor::{Editor, InputEvent};
use pretty_assertions::assert_eq;

fn number(editor: &Editor, id: DoodleId, param: Param) -> f64 {
    editor.drawing().doodle(id).unwrap().base.number(param)
}

#[test]
fn undo_redo_set_parameter() {
    let mut drawing = Drawing::default();
    let lens = drawing.add_doodle(Shape::Lens(Lens)).unwrap();
    let mut editor = Editor::new(drawing);

    editor.set_parameter(lens, Param::Type, "Cortical").unwrap();
    editor.set_parameter(lens, Param::ScaleX, 0.5).unwrap();
    assert_eq!(number(&editor, lens, Param::ScaleY), 0.5);

    assert_eq!(editor.undo().as_deref(), Some("set scaleX"));
    assert_eq!(number(&editor, lens, Param::ScaleX), 1.0);
    assert_eq!(number(&editor, lens, Param::ScaleY), 1.0);
    let text = |e: &Editor| e.drawing().doodle(lens).unwrap().base.text(Param::Type).map(str::to_owned);
    assert_eq!(text(&editor).as_deref(), Some("Cortical"));

    editor.undo();
    assert_eq!(text(&editor).as_deref(), Some("Nuclear"));
    assert!(!editor.commands.can_undo());

    editor.redo();
    editor.redo();
    assert_eq!(text(&editor).as_deref(), Some("Cortical"));
    assert_eq!(number(&editor, lens, Param::ScaleY), 0.5);
    assert!(!editor.commands.can_redo());
}

#[test]
fn drag_gesture_is_one_undo_step() {
    let mut drawing = Drawing::default();
    let trace = drawing.add_doodle(Shape::PulseTrace(PulseTrace)).unwrap();
    let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
    let mut editor = Editor::new(drawing);
    let start = editor.drawing().plane().to_canvas(Point::ZERO);

    editor.handle_event(&InputEvent::down(start.x, start.y)).unwrap();
    for step in 1..=5 {
        let y = start.y - 10.0 * step as f64;
        editor.handle_event(&InputEvent::move_to(start.x, y)).unwrap();
    }
    editor.handle_event(&InputEvent::up(start.x, start.y - 50.0)).unwrap();
    assert_eq!(editor.commands.depth(), 1);
    let moved_y = number(&editor, pulse, Param::OriginY);
    assert_eq!(number(&editor, pulse, Param::Value), 144.0);

    assert_eq!(editor.undo().as_deref(), Some("drag"));
    assert_eq!(number(&editor, pulse, Param::OriginY), 0.0);
    assert_eq!(number(&editor, pulse, Param::Value), 120.0);
    assert_eq!(number(&editor, trace, Param::ReadingY), 0.0);

    editor.redo();
    assert_eq!(number(&editor, pulse, Param::OriginY), moved_y);
    assert_eq!(number(&editor, pulse, Param::Value), 144.0);
    assert_eq!(number(&editor, trace, Param::ReadingY), moved_y);
}

#[test]
fn squiggle_handle_drag_is_undoable() {
    let mut drawing = Drawing::default();
    let fluid = drawing
        .add_doodle(Shape::SubretinalFluid(SubretinalFluid))
        .unwrap();
    let mut editor = Editor::new(drawing);
    let canvas = |e: &Editor, p: Point| e.drawing().plane().to_canvas(p);
    let arm = |e: &Editor| e.drawing().doodle(fluid).unwrap().base.squiggle_point(0, 0).unwrap();
    let before = arm(&editor);

    let centre = canvas(&editor, Point::ZERO);
    editor.handle_event(&InputEvent::down(centre.x, centre.y)).unwrap();
    editor.handle_event(&InputEvent::up(centre.x, centre.y)).unwrap();

    let grab = canvas(&editor, Point::new(0.0, -100.0));
    let to = canvas(&editor, Point::new(0.0, -150.0));
    editor.handle_event(&InputEvent::down(grab.x, grab.y)).unwrap();
    editor.handle_event(&InputEvent::move_to(to.x, to.y)).unwrap();
    editor.handle_event(&InputEvent::up(to.x, to.y)).unwrap();
    assert!((arm(&editor).y + 150.0).abs() < 1e-9);
    assert_eq!(editor.commands.depth(), 1);

    editor.undo();
    assert_eq!(arm(&editor), before);
}

#[test]
fn clicks_do_not_create_undo_steps() {
    let mut drawing = Drawing::default();
    drawing.add_doodle(Shape::Lens(Lens)).unwrap();
    let mut editor = Editor::new(drawing);
    let centre = editor.drawing().plane().to_canvas(Point::ZERO);

    editor.handle_event(&InputEvent::down(centre.x, centre.y)).unwrap();
    editor.handle_event(&InputEvent::up(centre.x, centre.y)).unwrap();
    // Empty space.
    editor.handle_event(&InputEvent::down(5.0, 5.0)).unwrap();
    editor.handle_event(&InputEvent::move_to(50.0, 50.0)).unwrap();
    editor.handle_event(&InputEvent::up(50.0, 50.0)).unwrap();
    assert!(!editor.commands.can_undo());
    assert_eq!(editor.selected(), None);
}

#[test]
fn new_action_clears_redo() {
    let mut drawing = Drawing::default();
    let lens = drawing.add_doodle(Shape::Lens(Lens)).unwrap();
    let mut editor = Editor::new(drawing);

    editor.set_parameter(lens, Param::OriginX, 50.0).unwrap();
    editor.undo();
    assert!(editor.commands.can_redo());
    editor.set_parameter(lens, Param::OriginY, 20.0).unwrap();
    assert!(!editor.commands.can_redo());
}

#[test]
fn add_and_remove_are_undoable() {
    let mut editor = Editor::new(Drawing::default());
    let env = editor.drawing().env();
    let drusen = Doodle::new(Shape::Drusen(Drusen), &env).unwrap();
    let id = drusen.id();

    editor.add_doodle(drusen).unwrap();
    assert!(editor.drawing().has_doodle_of_class("Drusen"));
    editor.remove_doodle(id).unwrap();
    assert!(!editor.drawing().has_doodle_of_class("Drusen"));

    assert_eq!(editor.undo(), Some(format!("remove {id}")));
    assert!(editor.drawing().doodle(id).is_some());
    editor.undo();
    assert!(editor.drawing().doodles().is_empty());
    editor.redo();
    assert_eq!(editor.drawing().doodle(id).map(Doodle::class_name), Some("Drusen"));
}

#[test]
fn undo_stops_animation_and_redo_lands_on_target() {
    let mut drawing = Drawing::default();
    let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
    let mut editor = Editor::new(drawing);

    editor
        .set_parameter(pulse, Param::Value, ParamValue::Int(60))
        .unwrap();
    assert!(editor.engine.animator.is_animating());
    let target = Pulse::origin_y_for_value(60.0, editor.drawing().plane_height());

    editor.undo();
    assert!(!editor.engine.animator.is_animating());
    assert_eq!(number(&editor, pulse, Param::OriginY), 0.0);

    editor.redo();
    while editor.tick(16.0) {}
    assert_eq!(number(&editor, pulse, Param::OriginY), target);
    assert_eq!(number(&editor, pulse, Param::Value), 60.0);
}
