//! Hit testing: canvas point → doodle or handle.
//!
//! Doodles are tested front to back. A canvas point is mapped onto the
//! doodle plane, then through each doodle's inverse transform into local
//! space, where it is tested against the doodle's boundary path.

use ed_core::{Doodle, DoodleId, Drawing};
use kurbo::{Point, Rect, Shape as _};

/// Topmost selectable doodle under `canvas`, if any.
pub fn hit_test(drawing: &Drawing, canvas: Point) -> Option<DoodleId> {
    let plane = drawing.plane().to_plane(canvas);
    drawing
        .doodles()
        .iter()
        .rev()
        .filter(|d| d.base.is_selectable)
        .find(|d| contains(d, plane))
        .map(Doodle::id)
}

fn contains(doodle: &Doodle, plane: Point) -> bool {
    match doodle.base.transform().inverse_transform_point(plane) {
        Some(local) => doodle.boundary().contains(local),
        None => false,
    }
}

/// Index of the visible handle of `doodle` within `radius` canvas pixels of
/// `canvas`. Later handles win when they overlap.
pub fn hit_test_handle(drawing: &Drawing, doodle: &Doodle, canvas: Point, radius: f64) -> Option<usize> {
    doodle
        .base
        .handles
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, h)| h.is_visible)
        .find(|(_, h)| drawing.plane().to_canvas(h.location).distance(canvas) <= radius)
        .map(|(i, _)| i)
}

/// Selectable doodles whose canvas bounding box intersects `rect`.
/// Used for marquee selection.
pub fn hit_test_rect(drawing: &Drawing, rect: Rect) -> Vec<DoodleId> {
    let rect = rect.abs();
    drawing
        .doodles()
        .iter()
        .filter(|d| d.base.is_selectable)
        .filter(|d| {
            let to_canvas = drawing.plane().affine() * d.base.transform().affine();
            let bbox = (to_canvas * d.boundary()).bounding_box();
            !bbox.intersect(rect).is_zero_area()
        })
        .map(Doodle::id)
        .collect()
}
