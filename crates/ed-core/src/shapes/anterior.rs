//! Anterior segment doodles.

use super::{arc_points, circle};
use crate::clock::clock_hour;
use crate::config::DoodleEnv;
use crate::doodle::{DoodleBase, DoodleShape, Dependents};
use crate::error::ConfigError;
use crate::handle::{ArcRule, Axis, Handle, HandleMode, HandleRange};
use crate::param::{Param, ParamType, ParamValue, ParameterDescriptor};
use crate::point::Polar;
use crate::range::Range;
use kurbo::{BezPath, Point};
use smallvec::{SmallVec, smallvec};
use std::f64::consts::{FRAC_PI_2, PI};

// ─── Lens ────────────────────────────────────────────────────────────────

/// Crystalline lens with a cataract type. Scaling the lens shrinks the
/// area its centre may move in so the outline stays inside the pupil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lens;

impl Lens {
    pub const RADIUS: f64 = 100.0;
    const TYPES: [&'static str; 3] = ["Nuclear", "Cortical", "Posterior subcapsular"];

    /// Legal origin range at `scale`.
    pub fn origin_range(scale: f64) -> Range {
        Range::new(-300.0 + Self::RADIUS * scale, 300.0 - Self::RADIUS * scale)
    }
}

impl DoodleShape for Lens {
    fn class_name(&self) -> &'static str {
        "Lens"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_moveable = true;
        let origin = Self::origin_range(1.0);
        let scale = Range::new(0.5, 1.5);
        base.define(
            Param::OriginX,
            ParameterDescriptor::simple(ParamType::Float, origin),
            0.0,
        )?;
        base.define(
            Param::OriginY,
            ParameterDescriptor::simple(ParamType::Float, origin),
            0.0,
        )?;
        base.define(
            Param::ScaleX,
            ParameterDescriptor::simple(ParamType::Float, scale),
            1.0,
        )?;
        base.define(
            Param::ScaleY,
            ParameterDescriptor::simple(ParamType::Float, scale),
            1.0,
        )?;
        base.define(
            Param::Type,
            ParameterDescriptor::derived(ParamType::String).with_list(&Self::TYPES),
            Self::TYPES[0],
        )?;
        base.define(
            Param::Colour,
            ParameterDescriptor::derived(ParamType::ColourString),
            "E8E0C0FF",
        )
    }

    fn dependent_parameter_values(
        &self,
        base: &DoodleBase,
        _env: &DoodleEnv,
        param: Param,
        value: &ParamValue,
    ) -> Dependents {
        let sibling = match param {
            Param::ScaleX => Param::ScaleY,
            Param::ScaleY => Param::ScaleX,
            _ => return Dependents::new(),
        };
        let origin = base.origin();
        smallvec![
            (sibling, value.clone()),
            (Param::OriginX, ParamValue::Float(origin.x)),
            (Param::OriginY, ParamValue::Float(origin.y)),
        ]
    }

    fn dependent_range(
        &self,
        base: &DoodleBase,
        _env: &DoodleEnv,
        changed: Param,
        dependent: Param,
    ) -> Option<Range> {
        match (changed, dependent) {
            (Param::ScaleX | Param::ScaleY, Param::OriginX | Param::OriginY) => {
                Some(Self::origin_range(base.number(changed)))
            }
            _ => None,
        }
    }

    fn handles(&self) -> SmallVec<[(Handle, HandleRange); 4]> {
        smallvec![(Handle::new(HandleMode::Scale), HandleRange::Free)]
    }

    fn handle_location(&self, _base: &DoodleBase, _index: usize) -> Point {
        Point::from_polars(Self::RADIUS, 3.0 * PI / 4.0)
    }

    fn boundary(&self, _base: &DoodleBase) -> BezPath {
        circle(Point::ZERO, Self::RADIUS)
    }

    fn description(&self, base: &DoodleBase, _env: &DoodleEnv) -> String {
        format!("{} cataract", base.text(Param::Type).unwrap_or(Self::TYPES[0]))
    }
}

// ─── Incision ────────────────────────────────────────────────────────────

/// Limbal incision. Its width is set by one handle on the chord
/// tangent to the incision circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Incision;

impl Incision {
    pub const RADIUS: f64 = 380.0;
    const THICKNESS: f64 = 10.0;
}

impl DoodleShape for Incision {
    fn class_name(&self) -> &'static str {
        "Incision"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_rotatable = true;
        base.define(
            Param::Rotation,
            ParameterDescriptor::simple(ParamType::Mod, Range::full_circle()),
            0.0,
        )?;
        base.define(
            Param::Arc,
            ParameterDescriptor::simple(ParamType::Float, Range::new(PI / 18.0, FRAC_PI_2)),
            PI / 6.0,
        )
    }

    fn handles(&self) -> SmallVec<[(Handle, HandleRange); 4]> {
        let chord = Range::new(-Self::RADIUS, -Self::RADIUS);
        smallvec![
            (
                Handle::new(HandleMode::Arc),
                HandleRange::Axis {
                    axis: Axis::Y,
                    range: chord,
                },
            ),
            (Handle::new(HandleMode::Rotate).rotatable(), HandleRange::Free),
        ]
    }

    fn handle_location(&self, base: &DoodleBase, index: usize) -> Point {
        match index {
            0 => Point::new(Self::RADIUS * (base.arc() / 2.0).tan(), -Self::RADIUS),
            _ => Point::new(0.0, -Self::RADIUS - 40.0),
        }
    }

    fn arc_rule(&self) -> Option<ArcRule> {
        Some(ArcRule::Perpendicular {
            radius: Self::RADIUS,
        })
    }

    fn boundary(&self, base: &DoodleBase) -> BezPath {
        let arc = base.arc();
        let mut path = BezPath::new();
        let outer = arc_points(Self::RADIUS + Self::THICKNESS, -arc / 2.0, arc);
        for (i, p) in outer.enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        for p in arc_points(Self::RADIUS - Self::THICKNESS, arc / 2.0, -arc) {
            path.line_to(p);
        }
        path.close_path();
        path
    }

    fn description(&self, base: &DoodleBase, _env: &DoodleEnv) -> String {
        format!("Incision at {} o'clock", clock_hour(base.rotation()))
    }
}

// ─── Peripheral iridectomy ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeripheralIridectomy;

impl DoodleShape for PeripheralIridectomy {
    fn class_name(&self) -> &'static str {
        "PeripheralIridectomy"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_moveable = true;
        let limit = Range::new(-380.0, 380.0);
        base.define(
            Param::OriginX,
            ParameterDescriptor::simple(ParamType::Float, limit),
            0.0,
        )?;
        base.define(
            Param::OriginY,
            ParameterDescriptor::simple(ParamType::Float, limit),
            -300.0,
        )
    }

    fn boundary(&self, _base: &DoodleBase) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, -15.0));
        path.line_to((13.0, 10.0));
        path.line_to((-13.0, 10.0));
        path.close_path();
        path
    }

    fn description(&self, base: &DoodleBase, _env: &DoodleEnv) -> String {
        format!(
            "Peripheral iridectomy at {} o'clock",
            clock_hour(base.origin().direction())
        )
    }
}
