//! Drawing → canvas-space render list.
//!
//! The host UI owns the actual canvas. This module hands it, per doodle and
//! back to front, the boundary path already transformed into canvas pixels,
//! the canvas positions of the visible handles, and any scattered dots.

use ed_core::random::SpeckleSequence;
use ed_core::shapes::Shape;
use ed_core::{DoodleId, Drawing};
use kurbo::{Affine, BezPath, Point};

/// Everything the host needs to paint one doodle.
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub id: DoodleId,
    pub class: &'static str,
    /// Local → canvas.
    pub transform: Affine,
    /// Boundary in canvas pixels.
    pub path: BezPath,
    /// Visible handle positions in canvas pixels. Empty unless selected.
    pub handles: Vec<Point>,
    /// Decoration dots in canvas pixels.
    pub speckles: Vec<Point>,
    pub selected: bool,
}

/// Build the render list. `seed` fixes the speckle pattern so repeated
/// frames look identical.
pub fn render_list(drawing: &Drawing, selected: Option<DoodleId>, seed: u64) -> Vec<RenderItem> {
    let plane = drawing.plane().affine();
    drawing
        .doodles()
        .iter()
        .map(|d| {
            let transform = plane * d.base.transform().affine();
            let is_selected = selected == Some(d.id());
            let handles = if is_selected {
                d.base
                    .handles
                    .iter()
                    .filter(|h| h.is_visible)
                    .map(|h| plane * h.location)
                    .collect()
            } else {
                Vec::new()
            };
            let speckles = match d.shape {
                Shape::Drusen(drusen) => {
                    let mut sequence = SpeckleSequence::seeded(seed);
                    drusen
                        .speckles(&d.base, &mut sequence)
                        .into_iter()
                        .map(|p| transform * p)
                        .collect()
                }
                _ => Vec::new(),
            };
            log::trace!(
                "RENDER {} {} handles={} speckles={}",
                d.id(),
                d.class_name(),
                handles.len(),
                speckles.len()
            );
            RenderItem {
                id: d.id(),
                class: d.class_name(),
                transform,
                path: transform * d.boundary(),
                handles,
                speckles,
                selected: is_selected,
            }
        })
        .collect()
}
