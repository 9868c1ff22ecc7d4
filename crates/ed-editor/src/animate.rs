//! Parameter tweening.
//!
//! When a resolution pass moves a dependent parameter that is flagged for
//! animation, the value already holds its target. The animator rewinds it to
//! the starting value and walks it forward on every `tick`, so the doodle
//! glides instead of jumping. The last tick always writes the exact target.

use ed_core::{AnimatedChange, Doodle, DoodleId, Drawing, Param, ParamValue};

/// Easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// One parameter in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub id: DoodleId,
    pub param: Param,
    pub from: f64,
    /// Exact value written on completion.
    pub target: ParamValue,
    pub elapsed_ms: f64,
    pub duration_ms: f64,
}

impl Tween {
    fn to(&self) -> f64 {
        self.target.as_f64().unwrap_or(self.from)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Value to show at the current elapsed time.
    pub fn value(&self, easing: Easing) -> ParamValue {
        if self.is_done() {
            return self.target.clone();
        }
        let k = easing.apply(self.elapsed_ms / self.duration_ms);
        let v = self.from + (self.to() - self.from) * k;
        match self.target {
            ParamValue::Int(_) => ParamValue::Int(v.round() as i64),
            _ => ParamValue::Float(v),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    tweens: Vec<Tween>,
    duration_ms: f64,
    easing: Easing,
}

impl Animator {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            tweens: Vec::new(),
            duration_ms: f64::from(duration_ms),
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Begin tweening `changes` on doodle `id`. Each parameter is rewound to
    /// its `from` value. A tween already running on the same parameter is
    /// replaced and starts from wherever it had got to.
    pub fn start(&mut self, drawing: &mut Drawing, id: DoodleId, changes: &[AnimatedChange]) {
        if changes.is_empty() || self.duration_ms <= 0.0 {
            return;
        }
        let env = drawing.env();
        let Some(doodle) = drawing.doodle_mut(id) else {
            return;
        };
        for change in changes {
            let Some(target) = doodle.base.value(change.param).cloned() else {
                continue;
            };
            let from = match self.position(id, change.param) {
                Some(i) => {
                    let running = self.tweens.remove(i);
                    running.value(self.easing).as_f64().unwrap_or(change.from)
                }
                None => change.from,
            };
            let tween = Tween {
                id,
                param: change.param,
                from,
                target,
                elapsed_ms: 0.0,
                duration_ms: self.duration_ms,
            };
            log::debug!(
                "ANIMATE {} {} {} → {}",
                id,
                change.param,
                tween.from,
                tween.target
            );
            doodle
                .base
                .set_unvalidated(change.param, tween.value(self.easing));
            self.tweens.push(tween);
        }
        doodle.rebuild(&env);
    }

    fn position(&self, id: DoodleId, param: Param) -> Option<usize> {
        self.tweens
            .iter()
            .position(|t| t.id == id && t.param == param)
    }

    /// Advance every tween by `dt_ms` and write the new values. Returns
    /// whether anything is still running.
    pub fn tick(&mut self, drawing: &mut Drawing, dt_ms: f64) -> bool {
        if self.tweens.is_empty() {
            return false;
        }
        let env = drawing.env();
        for tween in &mut self.tweens {
            tween.elapsed_ms = (tween.elapsed_ms + dt_ms).min(tween.duration_ms);
            if let Some(doodle) = drawing.doodle_mut(tween.id) {
                doodle
                    .base
                    .set_unvalidated(tween.param, tween.value(self.easing));
                doodle.rebuild(&env);
            }
        }
        self.tweens.retain(|t| !t.is_done());
        self.is_animating()
    }

    /// Jump every running tween to its target.
    pub fn finish(&mut self, drawing: &mut Drawing) {
        let remaining = self.duration_ms;
        self.tick(drawing, remaining);
    }

    /// Write every running tween's target into copies of the doodles,
    /// leaving the live drawing untouched.
    pub fn settle(&self, doodles: &mut [Doodle], env: &ed_core::DoodleEnv) {
        for tween in &self.tweens {
            if let Some(doodle) = doodles.iter_mut().find(|d| d.id() == tween.id) {
                doodle.base.set_unvalidated(tween.param, tween.target.clone());
                doodle.rebuild(env);
            }
        }
    }

    /// Drop every tween without writing anything.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed_core::shapes::Pulse;
    use ed_core::Shape;
    use pretty_assertions::assert_eq;

    fn origin_y(drawing: &Drawing, id: DoodleId) -> f64 {
        drawing.doodle(id).unwrap().base.origin().y
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn tween_walks_to_exact_target() {
        let mut drawing = Drawing::default();
        let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
        let r = drawing
            .set_parameter(pulse, Param::Value, ParamValue::Int(60))
            .unwrap();
        let target = origin_y(&drawing, pulse);
        assert_eq!(r.animated.len(), 1);

        let mut animator = Animator::new(200).with_easing(Easing::Linear);
        animator.start(&mut drawing, pulse, &r.animated);
        assert_eq!(origin_y(&drawing, pulse), 0.0);

        assert!(animator.tick(&mut drawing, 100.0));
        let halfway = origin_y(&drawing, pulse);
        assert!((halfway - target / 2.0).abs() < 1e-9);

        assert!(!animator.tick(&mut drawing, 150.0));
        assert_eq!(origin_y(&drawing, pulse), target);
        assert!(!animator.is_animating());
    }

    #[test]
    fn zero_duration_leaves_target_in_place() {
        let mut drawing = Drawing::default();
        let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
        let r = drawing
            .set_parameter(pulse, Param::Value, ParamValue::Int(60))
            .unwrap();
        let target = origin_y(&drawing, pulse);
        let mut animator = Animator::new(0);
        animator.start(&mut drawing, pulse, &r.animated);
        assert!(!animator.is_animating());
        assert_eq!(origin_y(&drawing, pulse), target);
    }

    #[test]
    fn settle_writes_targets_into_copies() {
        let mut drawing = Drawing::default();
        let pulse = drawing.add_doodle(Shape::Pulse(Pulse)).unwrap();
        let r = drawing
            .set_parameter(pulse, Param::Value, ParamValue::Int(200))
            .unwrap();
        let target = origin_y(&drawing, pulse);
        let mut animator = Animator::new(200);
        animator.start(&mut drawing, pulse, &r.animated);

        let mut copy = drawing.doodles().to_vec();
        animator.settle(&mut copy, &drawing.env());
        assert_eq!(copy[0].base.origin().y, target);
        assert_eq!(origin_y(&drawing, pulse), 0.0);
    }
}
