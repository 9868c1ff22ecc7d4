//! Record-chart doodles: the background grid and pulse readings.

use super::{circle, rect};
use crate::config::DoodleEnv;
use crate::doodle::{DoodleBase, DoodleShape, Dependents};
use crate::error::ConfigError;
use crate::linked::LinkLink;
use crate::param::{Param, ParamType, ParamValue, ParameterDescriptor};
use crate::range::Range;
use kurbo::{BezPath, Point};
use smallvec::smallvec;

/// Full scale of a record reading.
const READING_SCALE: f64 = 240.0;

/// Background chart grid. Not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordGrid;

impl DoodleShape for RecordGrid {
    fn class_name(&self) -> &'static str {
        "RecordGrid"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_selectable = false;
        Ok(())
    }

    fn boundary(&self, _base: &DoodleBase) -> BezPath {
        rect(1000.0, 1000.0)
    }
}

/// A pulse-rate reading on the record chart.
///
/// The vertical position and the displayed value are two views of the same
/// reading: `value = round(240 · (H/2 − originY) / H)` over the plane
/// height `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pulse;

impl Pulse {
    pub fn value_for_origin_y(origin_y: f64, plane_height: f64) -> f64 {
        (READING_SCALE * (plane_height / 2.0 - origin_y) / plane_height).round()
    }

    pub fn origin_y_for_value(value: f64, plane_height: f64) -> f64 {
        -(value * plane_height / READING_SCALE) + plane_height / 2.0
    }
}

static PULSE_LINKS: [LinkLink; 2] = [
    LinkLink {
        source: Param::OriginX,
        target_class: "PulseTrace",
        target: Param::ReadingX,
    },
    LinkLink {
        source: Param::OriginY,
        target_class: "PulseTrace",
        target: Param::ReadingY,
    },
];

impl DoodleShape for Pulse {
    fn class_name(&self) -> &'static str {
        "Pulse"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_moveable = true;
        let (hw, hh) = (env.plane_width / 2.0, env.plane_height / 2.0);
        base.define(
            Param::OriginX,
            ParameterDescriptor::simple(ParamType::Float, Range::new(-hw, hw)),
            0.0,
        )?;
        base.define(
            Param::OriginY,
            ParameterDescriptor::simple(ParamType::Float, Range::new(-hh, hh)).animated(),
            0.0,
        )?;
        base.define(
            Param::Value,
            ParameterDescriptor::derived(ParamType::Int).with_range(Range::new(0.0, READING_SCALE)),
            Self::value_for_origin_y(0.0, env.plane_height),
        )
    }

    fn dependent_parameter_values(
        &self,
        _base: &DoodleBase,
        env: &DoodleEnv,
        param: Param,
        value: &ParamValue,
    ) -> Dependents {
        let Some(x) = value.as_f64() else {
            return Dependents::new();
        };
        match param {
            Param::OriginY => smallvec![(
                Param::Value,
                ParamValue::Float(Self::value_for_origin_y(x, env.plane_height))
            )],
            Param::Value => smallvec![(
                Param::OriginY,
                ParamValue::Float(Self::origin_y_for_value(x, env.plane_height))
            )],
            _ => Dependents::new(),
        }
    }

    fn boundary(&self, _base: &DoodleBase) -> BezPath {
        circle(Point::ZERO, 10.0)
    }

    fn description(&self, base: &DoodleBase, _env: &DoodleEnv) -> String {
        format!("Pulse {} bpm", base.number(Param::Value))
    }

    fn links(&self) -> &'static [LinkLink] {
        &PULSE_LINKS
    }
}

/// Companion trace that caches the position of the pulse reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseTrace;

impl DoodleShape for PulseTrace {
    fn class_name(&self) -> &'static str {
        "PulseTrace"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_selectable = false;
        base.define(
            Param::ReadingX,
            ParameterDescriptor::other(ParamType::Float),
            0.0,
        )?;
        base.define(
            Param::ReadingY,
            ParameterDescriptor::other(ParamType::Float),
            0.0,
        )
    }

    fn boundary(&self, base: &DoodleBase) -> BezPath {
        let reading = Point::new(base.number(Param::ReadingX), base.number(Param::ReadingY));
        circle(reading, 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doodle::Doodle;
    use crate::shapes::Shape;
    use pretty_assertions::assert_eq;

    #[test]
    fn reading_maps_top_to_full_scale() {
        let h = 1001.0;
        assert_eq!(Pulse::value_for_origin_y(-h / 2.0, h), 240.0);
        assert_eq!(Pulse::value_for_origin_y(h / 2.0, h), 0.0);
        assert_eq!(Pulse::value_for_origin_y(0.0, h), 120.0);
        assert_eq!(Pulse::origin_y_for_value(120.0, h), 0.0);
    }

    #[test]
    fn pulse_defaults() {
        let d = Doodle::new(Shape::Pulse(Pulse), &DoodleEnv::default()).unwrap();
        assert_eq!(d.base.value(Param::Value), Some(&ParamValue::Int(120)));
        assert!(d.base.is_moveable);
        assert!(d.base.validator.descriptor(Param::OriginY).unwrap().animate);
        assert_eq!(d.links().len(), 2);
    }
}
