//! Polar helpers on top of `kurbo` points and vectors.
//!
//! Angles follow the clock face of the doodle plane: 0 points north
//! (negative y, 12 o'clock) and angles grow clockwise on screen, so
//! `π/2` is east (3 o'clock). This matches `kurbo::Affine::rotate` in a
//! y-down coordinate system.

use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

/// Polar construction and clock-face angles.
pub trait Polar: Sized + Copy {
    /// Build from a length and a clock-face angle in radians.
    fn from_polars(length: f64, angle: f64) -> Self;

    /// Cartesian view of the value.
    fn as_vec2(self) -> Vec2;

    fn set_with_polars(&mut self, length: f64, angle: f64) {
        *self = Self::from_polars(length, angle);
    }

    /// Distance from the origin.
    fn polar_length(self) -> f64 {
        self.as_vec2().hypot()
    }

    /// Clock-face direction in `[0, 2π)`. The zero vector points north.
    fn direction(self) -> f64 {
        let v = self.as_vec2();
        if v.x == 0.0 && v.y == 0.0 {
            return 0.0;
        }
        let d = v.x.atan2(-v.y).rem_euclid(TAU);
        if d >= TAU { 0.0 } else { d }
    }

    /// Clockwise angle swept from `self` to `other`, in `[0, 2π)`.
    fn clockwise_angle_to(self, other: Self) -> f64 {
        crate::range::clockwise(self.direction(), other.direction(), TAU)
    }

    /// Point on the tangent at `self`, `phi` radians further round.
    ///
    /// Used as a quadratic control point when smoothing an outline through
    /// points that sit roughly on a circle.
    fn tangential_control_point(self, phi: f64) -> Self {
        let c = phi.cos();
        if c.abs() < f64::EPSILON {
            return self;
        }
        Self::from_polars(self.polar_length() / c, self.direction() + phi)
    }
}

impl Polar for Vec2 {
    fn from_polars(length: f64, angle: f64) -> Self {
        Vec2::new(length * angle.sin(), -length * angle.cos())
    }

    fn as_vec2(self) -> Vec2 {
        self
    }
}

impl Polar for Point {
    fn from_polars(length: f64, angle: f64) -> Self {
        Vec2::from_polars(length, angle).to_point()
    }

    fn as_vec2(self) -> Vec2 {
        self.to_vec2()
    }
}
