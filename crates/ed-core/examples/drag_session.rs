//! Scripted editing session: builds a drawing, drags a few handles, resolves
//! dependents and prints the report and saved JSON.
//!
//! Run with `RUST_LOG=debug` to see the resolver at work.

use ed_core::kurbo::{Point, Vec2};
use ed_core::persist::save;
use ed_core::shapes::{Lens, Pulse, PulseTrace, RetinalDetachment};
use ed_core::{Drawing, DrawingConfig, Param, ParamValue, Shape};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("drag_session: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(json) => DrawingConfig::from_json(&json)?,
        None => DrawingConfig::default(),
    };
    let mut drawing = Drawing::new(config)?;
    let env = drawing.env();

    drawing.add_doodle(Shape::PulseTrace(PulseTrace))?;
    let pulse = drawing.add_doodle(Shape::Pulse(Pulse))?;
    let lens = drawing.add_doodle(Shape::Lens(Lens))?;
    let rd = drawing.add_doodle(Shape::RetinalDetachment(RetinalDetachment))?;

    // Pulse: drag up, resolve on release.
    if let Some(d) = drawing.doodle_mut(pulse) {
        let touched = d.move_by(Vec2::new(0.0, -180.0), &env)?;
        drawing.finish_change(pulse, &touched)?;
    }

    // Lens: grow past its limit, which also squeezes the origin range.
    drawing.set_parameter(lens, Param::OriginX, 190.0)?;
    let r = drawing.set_parameter(lens, Param::ScaleX, 2.0)?;
    println!("lens scale clamped: {}, applied: {:?}", r.clamped, r.applied);

    // Detachment: pull the end handle round to 6 o'clock.
    if let Some(d) = drawing.doodle_mut(rd) {
        let touched = d.drag_handle(1, Point::new(0.0, 450.0), &env)?;
        drawing.finish_change(rd, &touched)?;
    }

    if let Some(value) = drawing
        .doodle(pulse)
        .and_then(|d| d.base.value(Param::Value))
        .and_then(ParamValue::as_f64)
    {
        println!("pulse reading: {value}");
    }
    for line in drawing.report() {
        println!("{line}");
    }
    println!("{}", save(&drawing)?);
    Ok(())
}
