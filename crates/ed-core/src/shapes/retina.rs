//! Fundus doodles.

use super::{arc_points, rect};
use crate::clock::{Quadrant, clock_hour_extent};
use crate::config::DoodleEnv;
use crate::doodle::{DoodleBase, DoodleShape, Squiggle};
use crate::error::ConfigError;
use crate::handle::{ArcRule, Axis, Handle, HandleMode, HandleRange, VectorRange};
use crate::param::{Param, ParamType, ParameterDescriptor};
use crate::point::Polar;
use crate::random::SpeckleSequence;
use crate::range::Range;
use kurbo::{BezPath, Point};
use smallvec::{SmallVec, smallvec};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

// ─── Retinal detachment ──────────────────────────────────────────────────

/// Detachment spanning a clockwise arc of the periphery, from the ora
/// inwards to the apex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetinalDetachment;

impl RetinalDetachment {
    pub const RADIUS: f64 = 450.0;
    const APEX: Range = Range::new(-400.0, -100.0);
}

impl DoodleShape for RetinalDetachment {
    fn class_name(&self) -> &'static str {
        "RetinalDetachment"
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
            ParameterDescriptor::simple(ParamType::Float, Range::new(PI / 6.0, TAU)),
            FRAC_PI_2,
        )?;
        base.define(
            Param::ApexY,
            ParameterDescriptor::simple(ParamType::Float, Self::APEX),
            -200.0,
        )
    }

    fn handles(&self) -> SmallVec<[(Handle, HandleRange); 4]> {
        smallvec![
            (Handle::new(HandleMode::Arc), HandleRange::Free),
            (Handle::new(HandleMode::Arc), HandleRange::Free),
            (
                Handle::new(HandleMode::Apex),
                HandleRange::Axis {
                    axis: Axis::Y,
                    range: Self::APEX,
                },
            ),
        ]
    }

    fn handle_location(&self, base: &DoodleBase, index: usize) -> Point {
        let half = base.arc() / 2.0;
        match index {
            0 => Point::from_polars(Self::RADIUS, -half),
            1 => Point::from_polars(Self::RADIUS, half),
            _ => Point::new(0.0, base.number(Param::ApexY)),
        }
    }

    fn arc_rule(&self) -> Option<ArcRule> {
        Some(ArcRule::BetweenHandles { start: 0, end: 1 })
    }

    fn boundary(&self, base: &DoodleBase) -> BezPath {
        let arc = base.arc();
        let inner = base.number(Param::ApexY).abs();
        let mut path = BezPath::new();
        for (i, p) in arc_points(Self::RADIUS, -arc / 2.0, arc).enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        for p in arc_points(inner, arc / 2.0, -arc) {
            path.line_to(p);
        }
        path.close_path();
        path
    }

    fn description(&self, base: &DoodleBase, _env: &DoodleEnv) -> String {
        let arc = base.arc();
        format!(
            "Retinal detachment {}",
            clock_hour_extent(base.rotation() - arc / 2.0, arc)
        )
    }
}

// ─── Subretinal fluid ────────────────────────────────────────────────────

/// Star-shaped fluid outline with one handle per arm. Each arm may only
/// lengthen or shorten and swing within its own sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubretinalFluid;

impl SubretinalFluid {
    pub const ARMS: usize = 8;
    const ARM_LENGTH: Range = Range::new(40.0, 200.0);

    fn arm_angle(i: usize) -> f64 {
        i as f64 * FRAC_PI_4
    }
}

impl DoodleShape for SubretinalFluid {
    fn class_name(&self) -> &'static str {
        "SubretinalFluid"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_moveable = true;
        let limit = Range::new(-400.0, 400.0);
        base.define(
            Param::OriginX,
            ParameterDescriptor::simple(ParamType::Float, limit),
            0.0,
        )?;
        base.define(
            Param::OriginY,
            ParameterDescriptor::simple(ParamType::Float, limit),
            0.0,
        )?;
        base.define(
            Param::Complete,
            ParameterDescriptor::derived(ParamType::Bool).hidden(),
            true,
        )?;
        base.squiggles.push(Squiggle {
            points: (0..Self::ARMS)
                .map(|i| Point::from_polars(100.0, Self::arm_angle(i)))
                .collect(),
            complete: true,
        });
        Ok(())
    }

    fn handles(&self) -> SmallVec<[(Handle, HandleRange); 4]> {
        (0..Self::ARMS)
            .map(|i| {
                let a = Self::arm_angle(i);
                let range = VectorRange {
                    length: Self::ARM_LENGTH,
                    angle: Range::new(a - PI / 8.0, a + PI / 8.0),
                };
                (Handle::new(HandleMode::Handles), HandleRange::Vector(range))
            })
            .collect()
    }

    fn handle_location(&self, base: &DoodleBase, index: usize) -> Point {
        base.squiggle_point(0, index).unwrap_or(Point::ZERO)
    }

    fn boundary(&self, base: &DoodleBase) -> BezPath {
        let mut path = BezPath::new();
        let Some(points) = base.squiggles.first().map(|s| &s.points) else {
            return path;
        };
        let Some(&first) = points.first() else {
            return path;
        };
        path.move_to(first);
        for (i, &p) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            let control = p.tangential_control_point(p.clockwise_angle_to(next) / 2.0);
            path.quad_to(control, next);
        }
        path.close_path();
        path
    }

    fn description(&self, base: &DoodleBase, env: &DoodleEnv) -> String {
        let origin = base.origin();
        let mut text = if origin.to_vec2().hypot() < 50.0 {
            "Subretinal fluid at the macula".to_string()
        } else {
            format!(
                "Subretinal fluid, {}",
                Quadrant::from_direction(origin.direction(), env.eye)
            )
        };
        if !base.flag(Param::Complete) {
            text.push_str(" (incomplete)");
        }
        text
    }

    fn mirrors_with_laterality(&self) -> bool {
        true
    }
}

// ─── Drusen ──────────────────────────────────────────────────────────────

/// Rectangular patch of drusen. The dots are scattered from a caller
/// supplied sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drusen;

impl Drusen {
    const GRADES: [&'static str; 3] = ["Few", "Moderate", "Many"];

    /// Dot positions in local coordinates.
    pub fn speckles(&self, base: &DoodleBase, sequence: &mut SpeckleSequence) -> Vec<Point> {
        let count = match base.text(Param::Grade) {
            Some("Few") => 10,
            Some("Many") => 50,
            _ => 25,
        };
        let (w, h) = (base.number(Param::Width), base.number(Param::Height));
        (0..count).map(|_| sequence.point_in_rect(w, h)).collect()
    }
}

impl DoodleShape for Drusen {
    fn class_name(&self) -> &'static str {
        "Drusen"
    }

    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        _env: &DoodleEnv,
    ) -> Result<(), ConfigError> {
        base.is_moveable = true;
        let limit = Range::new(-400.0, 400.0);
        let size = Range::new(50.0, 400.0);
        base.define(
            Param::OriginX,
            ParameterDescriptor::simple(ParamType::Float, limit),
            0.0,
        )?;
        base.define(
            Param::OriginY,
            ParameterDescriptor::simple(ParamType::Float, limit),
            0.0,
        )?;
        base.define(
            Param::Width,
            ParameterDescriptor::simple(ParamType::Float, size).with_precision(0),
            200.0,
        )?;
        base.define(
            Param::Height,
            ParameterDescriptor::simple(ParamType::Float, size).with_precision(0),
            100.0,
        )?;
        base.define(
            Param::Grade,
            ParameterDescriptor::derived(ParamType::String).with_list(&Self::GRADES),
            Self::GRADES[1],
        )
    }

    fn handles(&self) -> SmallVec<[(Handle, HandleRange); 4]> {
        smallvec![(Handle::new(HandleMode::Size), HandleRange::Free)]
    }

    fn handle_location(&self, base: &DoodleBase, _index: usize) -> Point {
        Point::new(
            base.number(Param::Width) / 2.0,
            base.number(Param::Height) / 2.0,
        )
    }

    fn boundary(&self, base: &DoodleBase) -> BezPath {
        rect(base.number(Param::Width), base.number(Param::Height))
    }

    fn description(&self, base: &DoodleBase, _env: &DoodleEnv) -> String {
        format!("{} drusen", base.text(Param::Grade).unwrap_or(Self::GRADES[1]))
    }
}
