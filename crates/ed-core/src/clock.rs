//! Clock-hour and quadrant descriptions of angular positions.
//!
//! Rotations use the plane's clock-face convention (0 = 12 o'clock,
//! clockwise positive). Each hour owns the half-open sector that starts
//! half an hour before it, so rotation `k·π/6` always lands on hour `k`.

use crate::config::Eye;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_6, PI};
use std::fmt;

/// Clock hour in `1..=12` for a rotation in radians.
pub fn clock_hour(rotation: f64) -> u8 {
    clock_hour_with_offset(rotation, 0.0)
}

/// Clock hour of `rotation + offset`; `offset` is typically half an arc so
/// the centre of the arc is reported.
pub fn clock_hour_with_offset(rotation: f64, offset: f64) -> u8 {
    let hours = ((rotation + offset + PI / 12.0) * 6.0 / PI + 12.0).rem_euclid(12.0);
    match hours.floor() as u8 {
        0 | 12 => 12,
        h => h,
    }
}

/// `"2 to 5 o'clock"` for the clockwise arc that starts at `start`.
pub fn clock_hour_extent(start: f64, arc: f64) -> String {
    format!(
        "{} to {} o'clock",
        clock_hour(start),
        clock_hour(start + arc)
    )
}

/// Rotation in radians at the centre of clock hour `hour`.
pub fn hour_rotation(hour: u8) -> f64 {
    f64::from(hour % 12) * FRAC_PI_6
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Superior,
    Inferior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Nasal,
    Temporal,
}

/// Anatomical quadrant of a direction on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrant {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Quadrant {
    /// Quadrant of a clock-face `direction` for the given eye.
    ///
    /// The plane is drawn as seen by the examiner, so for a right eye the
    /// east half is nasal and for a left eye it is temporal. Directions on
    /// the horizontal meridian count as superior; the vertical meridian
    /// counts as east.
    pub fn from_direction(direction: f64, eye: Eye) -> Self {
        // cos(3π/2) comes out a hair below zero.
        const MERIDIAN: f64 = -1e-9;
        let vertical = if direction.cos() >= MERIDIAN {
            Vertical::Superior
        } else {
            Vertical::Inferior
        };
        let east = direction.sin() >= MERIDIAN;
        let horizontal = match (eye, east) {
            (Eye::Right, true) | (Eye::Left, false) => Horizontal::Nasal,
            (Eye::Right, false) | (Eye::Left, true) => Horizontal::Temporal,
        };
        Self {
            vertical,
            horizontal,
        }
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Vertical::Superior => "superior",
            Vertical::Inferior => "inferior",
        })
    }
}

impl fmt::Display for Horizontal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Horizontal::Nasal => "nasal",
            Horizontal::Temporal => "temporal",
        })
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vertical, self.horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn cardinal_hours() {
        assert_eq!(clock_hour(0.0), 12);
        assert_eq!(clock_hour(FRAC_PI_2), 3);
        assert_eq!(clock_hour(PI), 6);
        assert_eq!(clock_hour(-FRAC_PI_2), 9);
        assert_eq!(clock_hour(2.0 * PI), 12);
    }

    #[test]
    fn sector_edges_roll_over_at_half_hours() {
        // Just before half past twelve is still 12, just after is 1.
        assert_eq!(clock_hour(PI / 12.0 - 1e-9), 12);
        assert_eq!(clock_hour(PI / 12.0 + 1e-9), 1);
        assert_eq!(clock_hour(-PI / 12.0 - 1e-9), 11);
    }

    #[test]
    fn offset_reports_arc_centre() {
        assert_eq!(clock_hour_with_offset(0.0, FRAC_PI_2), 3);
        assert_eq!(clock_hour_with_offset(FRAC_PI_2, -FRAC_PI_2), 12);
    }

    #[test]
    fn extent_text() {
        assert_eq!(clock_hour_extent(FRAC_PI_2, FRAC_PI_2), "3 to 6 o'clock");
        assert_eq!(clock_hour_extent(-FRAC_PI_2, PI), "9 to 3 o'clock");
    }

    #[test]
    fn hour_rotation_inverts_clock_hour() {
        for h in 1..=12u8 {
            assert_eq!(clock_hour(hour_rotation(h)), h);
        }
    }

    #[test]
    fn quadrant_depends_on_eye() {
        let upper_east = PI / 4.0;
        assert_eq!(
            Quadrant::from_direction(upper_east, Eye::Right).to_string(),
            "superior nasal"
        );
        assert_eq!(
            Quadrant::from_direction(upper_east, Eye::Left).to_string(),
            "superior temporal"
        );
        let lower_west = 5.0 * PI / 4.0;
        assert_eq!(
            Quadrant::from_direction(lower_west, Eye::Right),
            Quadrant {
                vertical: Vertical::Inferior,
                horizontal: Horizontal::Temporal
            }
        );
    }

    #[test]
    fn cardinal_directions_for_both_eyes() {
        let cases = [
            (0.0, "superior nasal", "superior temporal"),
            (FRAC_PI_2, "superior nasal", "superior temporal"),
            (PI, "inferior nasal", "inferior temporal"),
            (3.0 * FRAC_PI_2, "superior temporal", "superior nasal"),
            (-FRAC_PI_2, "superior temporal", "superior nasal"),
        ];
        for (direction, right, left) in cases {
            assert_eq!(Quadrant::from_direction(direction, Eye::Right).to_string(), right);
            assert_eq!(Quadrant::from_direction(direction, Eye::Left).to_string(), left);
        }
    }
}
