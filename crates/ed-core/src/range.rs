//! Linear and angular intervals.
//!
//! A `Range` is used two ways. Linearly it clamps numbers into `[min, max]`.
//! Angularly it describes the clockwise arc that starts at `min` and ends at
//! `max`, so `{ min: 350°, max: 10° }` is a 20° arc across north. Angular
//! membership and snapping always measure clockwise distances around the
//! circle and never compare the raw numbers.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Unit of the angles handed to the angular operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Length of one full turn in this unit.
    pub const fn full_turn(self) -> f64 {
        match self {
            AngleUnit::Radians => TAU,
            AngleUnit::Degrees => 360.0,
        }
    }
}

/// A `{min, max}` interval. Bounds are rewritten in place with
/// `set_min_and_max`; the owning descriptor never swaps the object out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[0, 2π]`, which never clamps angularly.
    pub const fn full_circle() -> Self {
        Self::new(0.0, TAU)
    }

    pub fn set_min_and_max(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    pub fn is_below(&self, x: f64) -> bool {
        x < self.min
    }

    pub fn is_above(&self, x: f64) -> bool {
        x > self.max
    }

    pub fn includes(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Clamp `x` into `[min, max]`.
    pub fn constrain(&self, x: f64) -> f64 {
        self.constrain_scaled(x, 1.0)
    }

    /// Clamp `x` into `[min * scale, max * scale]`.
    ///
    /// Lets one range follow a zoom level without rewriting its bounds.
    pub fn constrain_scaled(&self, x: f64, scale: f64) -> f64 {
        let lo = self.min * scale;
        let hi = self.max * scale;
        if x < lo {
            lo
        } else if x > hi {
            hi
        } else {
            x
        }
    }

    /// Whether `angle` lies on the clockwise arc from `min` to `max`.
    pub fn includes_in_angular_range(&self, angle: f64, unit: AngleUnit) -> bool {
        let turn = unit.full_turn();
        clockwise(self.min, angle, turn) <= clockwise(self.min, self.max, turn)
    }

    /// Snap `angle` onto the arc.
    ///
    /// Ranges spanning a full turn never clamp. An angle outside the arc
    /// snaps to `max` only when it is strictly closer to `max` (clockwise
    /// from `max` to the angle) than to `min` (clockwise from the angle to
    /// `min`); an exact tie snaps to `min`.
    pub fn constrain_to_angular_range(&self, angle: f64, unit: AngleUnit) -> f64 {
        let turn = unit.full_turn();
        if self.max - self.min >= turn || self.includes_in_angular_range(angle, unit) {
            return angle;
        }
        let to_min = clockwise(angle, self.min, turn);
        let past_max = clockwise(self.max, angle, turn);
        if past_max < to_min { self.max } else { self.min }
    }
}

/// Clockwise angle travelled from `from` to `to`, in `[0, turn)`.
pub(crate) fn clockwise(from: f64, to: f64, turn: f64) -> f64 {
    let d = (to - from).rem_euclid(turn);
    // rem_euclid can round up to exactly `turn` for tiny negative inputs
    if d >= turn { 0.0 } else { d }
}
