//! Doodle-local ↔ plane ↔ canvas transforms.
//!
//! Shapes are defined in local coordinates around their own origin. A
//! `DoodleTransform` places them on the doodle plane (scale, then rotate,
//! then translate) and a `PlaneTransform` maps the plane onto the canvas.

use crate::config::{DrawingConfig, Eye};
use kurbo::{Affine, Point, Vec2};

/// Cached local → plane transform of one doodle, with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoodleTransform {
    affine: Affine,
    /// `None` when a zero scale collapses the shape.
    inverse: Option<Affine>,
}

impl Default for DoodleTransform {
    fn default() -> Self {
        Self {
            affine: Affine::IDENTITY,
            inverse: Some(Affine::IDENTITY),
        }
    }
}

impl DoodleTransform {
    /// `translate(origin) · rotate(rotation) · scale(sx, sy)`, with the
    /// local x axis flipped first when `mirror` is set.
    pub fn build(origin: Point, rotation: f64, scale_x: f64, scale_y: f64, mirror: bool) -> Self {
        let sx = if mirror { -scale_x } else { scale_x };
        let affine = Affine::translate(origin.to_vec2())
            * Affine::rotate(rotation)
            * Affine::scale_non_uniform(sx, scale_y);
        let det = affine.determinant();
        let inverse = (det.is_finite() && det.abs() > f64::EPSILON).then(|| affine.inverse());
        Self { affine, inverse }
    }

    pub fn affine(&self) -> Affine {
        self.affine
    }

    pub fn transform_point(&self, local: Point) -> Point {
        self.affine * local
    }

    /// Map a plane point back into local space for hit testing.
    pub fn inverse_transform_point(&self, plane: Point) -> Option<Point> {
        self.inverse.map(|inv| inv * plane)
    }

    /// Plane position of the local origin.
    pub fn translation(&self) -> Vec2 {
        self.affine.translation()
    }
}

/// Doodle plane (centred, plane units) → canvas (top-left origin, pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneTransform {
    affine: Affine,
    inverse: Affine,
    scale: f64,
}

impl PlaneTransform {
    pub fn new(config: &DrawingConfig) -> Self {
        let scale = (config.canvas_width / config.plane_width)
            .min(config.canvas_height / config.plane_height);
        let flip = if config.mirror_left_eye && config.eye == Eye::Left {
            -1.0
        } else {
            1.0
        };
        let affine = Affine::translate((config.canvas_width / 2.0, config.canvas_height / 2.0))
            * Affine::scale_non_uniform(flip * scale, scale);
        Self {
            affine,
            inverse: affine.inverse(),
            scale,
        }
    }

    /// Canvas pixels per plane unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn affine(&self) -> Affine {
        self.affine
    }

    pub fn to_canvas(&self, plane: Point) -> Point {
        self.affine * plane
    }

    pub fn to_plane(&self, canvas: Point) -> Point {
        self.inverse * canvas
    }
}
