//! Deterministic pseudo-random sequence for scattered decorations.
//!
//! Shapes that sprinkle dots (drusen, haemorrhages) draw from a sequence
//! passed in by the caller, so the same seed always produces the same
//! picture.

use kurbo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SpeckleSequence {
    rng: StdRng,
}

impl SpeckleSequence {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform point inside the `width × height` rectangle centred on the
    /// local origin.
    pub fn point_in_rect(&mut self, width: f64, height: f64) -> Point {
        let x = (self.next_unit() - 0.5) * width;
        let y = (self.next_unit() - 0.5) * height;
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SpeckleSequence::seeded(7);
        let mut b = SpeckleSequence::seeded(7);
        for _ in 0..16 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn points_stay_inside_rect() {
        let mut s = SpeckleSequence::seeded(42);
        for _ in 0..100 {
            let p = s.point_in_rect(200.0, 50.0);
            assert!(p.x >= -100.0 && p.x < 100.0);
            assert!(p.y >= -25.0 && p.y < 25.0);
        }
    }
}
