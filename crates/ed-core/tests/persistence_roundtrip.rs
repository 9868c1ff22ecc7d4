//! Integration tests: save → load → save produces identical JSON.

use ed_core::kurbo::Point;
use ed_core::persist::{load, save};
use ed_core::shapes::{Drusen, Lens, Pulse, PulseTrace, RecordGrid, RetinalDetachment, SubretinalFluid};
use ed_core::{Drawing, DrawingConfig, Param, ParamValue, Shape};
use pretty_assertions::assert_eq;

fn sample_drawing() -> Drawing {
    let mut drawing = Drawing::default();
    let env = drawing.env();
    drawing.add_doodle(Shape::RecordGrid(RecordGrid)).unwrap();
    drawing.add_doodle(Shape::PulseTrace(PulseTrace)).unwrap();

    let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
    drawing
        .set_parameter(pulse, Param::Value, ParamValue::Int(72))
        .unwrap();
    drawing.set_parameter(pulse, Param::OriginX, -123.456).unwrap();

    let lens = drawing.add_doodle(Shape::Lens(Lens)).unwrap();
    drawing.set_parameter(lens, Param::ScaleX, 0.75).unwrap();
    drawing.set_parameter(lens, Param::Type, "Posterior subcapsular").unwrap();
    drawing.set_parameter(lens, Param::Colour, "#a0b0c0ff").unwrap();

    let rd = drawing
        .add_doodle(Shape::RetinalDetachment(RetinalDetachment))
        .unwrap();
    drawing.set_parameter(rd, Param::Rotation, 2.2).unwrap();
    drawing.set_parameter(rd, Param::Arc, 1.3).unwrap();

    let fluid = drawing
        .add_doodle(Shape::SubretinalFluid(SubretinalFluid))
        .unwrap();
    drawing
        .doodle_mut(fluid)
        .unwrap()
        .drag_handle(3, Point::new(90.0, 70.0), &env)
        .unwrap();

    let drusen = drawing.add_doodle(Shape::Drusen(Drusen)).unwrap();
    drawing.set_parameter(drusen, Param::Grade, "Many").unwrap();
    drawing
}

#[test]
fn save_load_save_is_byte_identical() {
    let drawing = sample_drawing();
    let first = save(&drawing).unwrap();
    let loaded = load(&first, DrawingConfig::default()).unwrap();
    let second = save(&loaded).unwrap();
    assert_eq!(first, second);
    assert_eq!(loaded.doodles().len(), drawing.doodles().len());
}

#[test]
fn loaded_values_match_originals() {
    let drawing = sample_drawing();
    let loaded = load(&save(&drawing).unwrap(), DrawingConfig::default()).unwrap();
    for (a, b) in drawing.doodles().iter().zip(loaded.doodles()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.class_name(), b.class_name());
        assert_eq!(a.base.values(), b.base.values());
        assert_eq!(a.base.squiggles, b.base.squiggles);
    }
}

#[test]
fn loaded_ranges_follow_loaded_scale() {
    let drawing = sample_drawing();
    let loaded = load(&save(&drawing).unwrap(), DrawingConfig::default()).unwrap();
    let lens = loaded.last_doodle_of_class("Lens").unwrap();
    assert_eq!(
        lens.base.validator.range(Param::OriginX),
        Some(Lens::origin_range(0.75))
    );
}

#[test]
fn load_does_not_clamp_or_resolve() {
    let json = r#"[
      { "id": "Pulse_500", "subclass": "Pulse",
        "params": { "originX": 0.0, "originY": 9999.0, "value": 17 } }
    ]"#;
    let drawing = load(json, DrawingConfig::default()).unwrap();
    let pulse = &drawing.doodles()[0];
    assert_eq!(pulse.base.value(Param::OriginY), Some(&ParamValue::Float(9999.0)));
    assert_eq!(pulse.base.value(Param::Value), Some(&ParamValue::Int(17)));
}
