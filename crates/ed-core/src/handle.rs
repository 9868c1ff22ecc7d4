//! Drag handles and the constraints applied while dragging them.

use crate::point::Polar;
use crate::range::{AngleUnit, Range};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// What dragging a handle does to its doodle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleMode {
    /// One end of an arc; changes `arc` and `rotation`.
    Arc,
    /// Uniform scale by distance from the origin.
    Scale,
    /// Moves the apex point.
    Apex,
    /// Rotates the doodle about its origin.
    Rotate,
    /// Moves one squiggle point.
    Handles,
    /// Changes width/height.
    Size,
}

/// A drag handle. `local` is authoritative while dragging; `location` is
/// the plane position recomputed from parameters on every rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub location: Point,
    pub local: Point,
    pub is_visible: bool,
    pub mode: HandleMode,
    pub is_rotatable: bool,
}

impl Handle {
    pub fn new(mode: HandleMode) -> Self {
        Self {
            location: Point::ZERO,
            local: Point::ZERO,
            is_visible: true,
            mode,
            is_rotatable: false,
        }
    }

    #[must_use]
    pub fn rotatable(mut self) -> Self {
        self.is_rotatable = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }
}

/// Polar region a handle may occupy: length and clockwise angle ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorRange {
    pub length: Range,
    pub angle: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Constraint applied to a handle's local position on every move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HandleRange {
    #[default]
    Free,
    /// Clamp one Cartesian component, pass the other through.
    Axis { axis: Axis, range: Range },
    Vector(VectorRange),
}

impl HandleRange {
    /// Clamp a single number driven by a handle, such as a scale factor.
    /// Only an axis range bounds it; other ranges pass it through.
    pub fn constrain_scalar(&self, x: f64) -> f64 {
        match self {
            HandleRange::Axis { range, .. } => range.constrain(x),
            HandleRange::Free | HandleRange::Vector(_) => x,
        }
    }
}

/// Clamp a raw local drag position into the handle's legal region.
///
/// For vector ranges the angle of a zero-length drag is undefined, so the
/// angle of `previous` is kept instead.
pub fn clamp_drag(range: &HandleRange, raw: Point, previous: Point) -> Point {
    match range {
        HandleRange::Free => raw,
        HandleRange::Axis { axis: Axis::X, range } => Point::new(range.constrain(raw.x), raw.y),
        HandleRange::Axis { axis: Axis::Y, range } => Point::new(raw.x, range.constrain(raw.y)),
        HandleRange::Vector(vr) => {
            let length = raw.polar_length();
            let angle = if length > f64::EPSILON {
                raw.direction()
            } else {
                log::debug!("zero-length handle drag, keeping previous angle");
                previous.direction()
            };
            let angle = vr.angle.constrain_to_angular_range(angle, AngleUnit::Radians);
            Point::from_polars(vr.length.constrain(length), angle)
        }
    }
}

/// How a doodle derives `arc` from its arc handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcRule {
    /// Arc is the clockwise angle from the `start` handle to the `end`
    /// handle, both measured from the origin.
    BetweenHandles { start: usize, end: usize },
    /// A single handle at half-width `x` on a chord at distance `radius`:
    /// `arc = 2·atan(|x| / radius)`.
    Perpendicular { radius: f64 },
}

/// Arc swept clockwise from `start` to `end`.
pub fn arc_between(start: Vec2, end: Vec2) -> f64 {
    start.clockwise_angle_to(end)
}

/// Full arc subtended by a chord of half-width `half_width` at `radius`.
/// `None` for a zero radius.
pub fn perpendicular_arc(half_width: f64, radius: f64) -> Option<f64> {
    if radius.abs() < f64::EPSILON || !half_width.is_finite() {
        return None;
    }
    Some(2.0 * (half_width.abs() / radius.abs()).atan())
}
