//! Concrete doodle classes.

mod anterior;
mod record;
mod retina;

pub use anterior::{Incision, Lens, PeripheralIridectomy};
pub use record::{Pulse, PulseTrace, RecordGrid};
pub use retina::{Drusen, RetinalDetachment, SubretinalFluid};

use crate::doodle::DoodleShape;
use crate::point::Polar;
use kurbo::{BezPath, Point};
use std::f64::consts::TAU;

/// Every doodle class the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    RecordGrid(RecordGrid),
    Pulse(Pulse),
    PulseTrace(PulseTrace),
    Lens(Lens),
    RetinalDetachment(RetinalDetachment),
    Incision(Incision),
    SubretinalFluid(SubretinalFluid),
    PeripheralIridectomy(PeripheralIridectomy),
    Drusen(Drusen),
}

impl Shape {
    /// Class names accepted by `from_class_name`.
    pub const CLASS_NAMES: &[&str] = &[
        "RecordGrid",
        "Pulse",
        "PulseTrace",
        "Lens",
        "RetinalDetachment",
        "Incision",
        "SubretinalFluid",
        "PeripheralIridectomy",
        "Drusen",
    ];

    pub fn from_class_name(name: &str) -> Option<Self> {
        let shape = match name {
            "RecordGrid" => Shape::RecordGrid(RecordGrid),
            "Pulse" => Shape::Pulse(Pulse),
            "PulseTrace" => Shape::PulseTrace(PulseTrace),
            "Lens" => Shape::Lens(Lens),
            "RetinalDetachment" => Shape::RetinalDetachment(RetinalDetachment),
            "Incision" => Shape::Incision(Incision),
            "SubretinalFluid" => Shape::SubretinalFluid(SubretinalFluid),
            "PeripheralIridectomy" => Shape::PeripheralIridectomy(PeripheralIridectomy),
            "Drusen" => Shape::Drusen(Drusen),
            _ => return None,
        };
        Some(shape)
    }

    pub fn as_shape(&self) -> &dyn DoodleShape {
        match self {
            Shape::RecordGrid(s) => s,
            Shape::Pulse(s) => s,
            Shape::PulseTrace(s) => s,
            Shape::Lens(s) => s,
            Shape::RetinalDetachment(s) => s,
            Shape::Incision(s) => s,
            Shape::SubretinalFluid(s) => s,
            Shape::PeripheralIridectomy(s) => s,
            Shape::Drusen(s) => s,
        }
    }
}

// ─── Path helpers ────────────────────────────────────────────────────────

const ARC_STEPS: usize = 32;

/// Points along the clockwise arc of `radius` from `start` sweeping `arc`.
pub(crate) fn arc_points(radius: f64, start: f64, arc: f64) -> impl Iterator<Item = Point> {
    (0..=ARC_STEPS).map(move |i| {
        let t = i as f64 / ARC_STEPS as f64;
        Point::from_polars(radius, start + t * arc)
    })
}

pub(crate) fn circle(centre: Point, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in arc_points(radius, 0.0, TAU).take(ARC_STEPS).enumerate() {
        let p = p + centre.to_vec2();
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

pub(crate) fn rect(width: f64, height: f64) -> BezPath {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let mut path = BezPath::new();
    path.move_to((-hw, -hh));
    path.line_to((hw, -hh));
    path.line_to((hw, hh));
    path.line_to((-hw, hh));
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DoodleEnv;
    use crate::doodle::Doodle;
    use kurbo::Shape as _;

    #[test]
    fn every_class_name_round_trips() {
        let env = DoodleEnv::default();
        for name in Shape::CLASS_NAMES {
            let doodle = Doodle::from_class_name(name, &env).unwrap();
            assert_eq!(doodle.class_name(), *name);
        }
    }

    #[test]
    fn circle_contains_centre() {
        let c = circle(Point::new(10.0, 10.0), 5.0);
        assert!(c.contains(Point::new(10.0, 10.0)));
        assert!(!c.contains(Point::new(20.0, 10.0)));
    }
}
