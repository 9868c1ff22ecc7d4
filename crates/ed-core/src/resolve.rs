//! Dependent-parameter resolution.
//!
//! A parameter change runs as one deterministic pass:
//!
//! 1. validate and apply the changed parameter,
//! 2. ask the shape for the dependent values,
//! 3. for each dependent, recompute its range if the shape says the change
//!    affects it, then re-validate and apply the dependent value,
//! 4. cascade breadth-first through the dependents of each applied value.
//!
//! Every parameter is applied at most once per pass. Mutually dependent
//! pairs such as `value ↔ originY` therefore settle after one hop instead of
//! bouncing, and re-running the same change is a no-op.

use crate::config::DoodleEnv;
use crate::doodle::Doodle;
use crate::error::{ConfigError, EngineError, ParamError};
use crate::param::{Param, ParamValue};
use smallvec::SmallVec;
use std::collections::{BTreeSet, VecDeque};

/// A dependent numeric change the UI should tween rather than snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedChange {
    pub param: Param,
    pub from: f64,
    pub to: f64,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Every parameter written, in application order; the changed parameter
    /// comes first.
    pub applied: SmallVec<[(Param, ParamValue); 4]>,
    pub animated: SmallVec<[AnimatedChange; 2]>,
    /// The changed parameter itself had to be clamped.
    pub clamped: bool,
}

impl Resolution {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.applied.iter().map(|(p, _)| *p)
    }

    pub fn value_of(&self, param: Param) -> Option<&ParamValue> {
        self.applied
            .iter()
            .find_map(|(p, v)| (*p == param).then_some(v))
    }

    /// Fold a later pass into this one. Later values win.
    pub fn merge(&mut self, other: Resolution) {
        for (param, value) in other.applied {
            match self.applied.iter_mut().find(|(p, _)| *p == param) {
                Some(slot) => slot.1 = value,
                None => self.applied.push((param, value)),
            }
        }
        self.animated.extend(other.animated);
        self.clamped |= other.clamped;
    }
}

/// Apply `raw` to `param` and every parameter that depends on it.
///
/// A rejected primary value (bad enum, bad colour, wrong type) leaves the
/// doodle untouched. A dependent referencing an unregistered parameter is a
/// definition bug: the pass is rolled back, ranges included, and the
/// `ConfigError` returned.
/// A dependent value that fails validation is skipped with a warning.
pub fn on_parameter_changed(
    doodle: &mut Doodle,
    env: &DoodleEnv,
    param: Param,
    raw: ParamValue,
) -> Result<Resolution, EngineError> {
    let Doodle { base, shape } = doodle;
    let shape = shape.as_shape();

    let validated = base.validator.validate(param, &raw).inspect_err(|e| {
        if matches!(e, ParamError::InvalidEnum { .. } | ParamError::InvalidColour { .. }) {
            log::warn!("{}: {e}", base.id);
        }
    })?;

    let snapshot = (base.values().clone(), base.validator.clone());
    base.set_unvalidated(param, validated.value.clone());

    let mut resolution = Resolution {
        clamped: validated.clamped,
        ..Resolution::default()
    };
    resolution.applied.push((param, validated.value.clone()));

    let mut visited = BTreeSet::from([param]);
    let mut queue = VecDeque::from([(param, validated.value)]);

    while let Some((changed, value)) = queue.pop_front() {
        for (dep, dep_value) in shape.dependent_parameter_values(base, env, changed, &value) {
            if !visited.insert(dep) {
                continue;
            }
            let animate = match base.validator.require(dep) {
                Ok(desc) => desc.animate,
                Err(e) => {
                    let (values, validator) = snapshot;
                    base.replace_values(values);
                    base.validator = validator;
                    return Err(e.into());
                }
            };

            if let Some(range) = shape.dependent_range(base, env, changed, dep)
                && let Some(r) = base.validator.range_mut(dep)
            {
                log::debug!(
                    "{}: {dep} range [{}, {}] after {changed} change",
                    base.id,
                    range.min,
                    range.max
                );
                r.set_min_and_max(range.min, range.max);
            }

            let dep_validated = match base.validator.validate(dep, &dep_value) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("{}: dependent {dep} skipped: {e}", base.id);
                    continue;
                }
            };

            let old = base.value(dep).and_then(ParamValue::as_f64);
            let new = dep_validated.value.as_f64();
            if animate
                && let (Some(from), Some(to)) = (old, new)
                && from != to
            {
                resolution.animated.push(AnimatedChange {
                    param: dep,
                    from,
                    to,
                });
            }

            base.set_unvalidated(dep, dep_validated.value.clone());
            resolution
                .applied
                .push((dep, dep_validated.value.clone()));
            queue.push_back((dep, dep_validated.value));
        }
    }

    log::debug!(
        "{}: {param} resolved, applied {:?}",
        base.id,
        resolution.params().collect::<SmallVec<[Param; 8]>>()
    );
    Ok(resolution)
}

/// Load-time check that every dependent and link a doodle can produce
/// names a registered parameter.
pub fn check_definition(doodle: &Doodle, env: &DoodleEnv) -> Result<(), ConfigError> {
    let shape = doodle.shape.as_shape();
    let base = &doodle.base;
    for param in base.validator.params() {
        let Some(value) = base.value(param) else {
            continue;
        };
        for (dep, _) in shape.dependent_parameter_values(base, env, param, value) {
            base.validator.require(dep)?;
        }
    }
    for link in shape.links() {
        base.validator.require(link.source)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doodle::DoodleBase;
    use crate::id::DoodleId;
    use crate::param::{ParamType, ParameterDescriptor};
    use crate::range::Range;
    use crate::shapes::{Lens, Pulse, Shape};
    use pretty_assertions::assert_eq;

    fn env() -> DoodleEnv {
        DoodleEnv::default()
    }

    #[test]
    fn value_drives_origin_y() {
        let env = env();
        let mut d = Doodle::new(Shape::Pulse(Pulse), &env).unwrap();
        let r = on_parameter_changed(&mut d, &env, Param::Value, ParamValue::Int(80)).unwrap();
        let expected = Pulse::origin_y_for_value(80.0, env.plane_height);
        assert_eq!(
            r.applied.as_slice(),
            &[
                (Param::Value, ParamValue::Int(80)),
                (Param::OriginY, ParamValue::Float(expected)),
            ]
        );
        assert_eq!(r.animated.len(), 1);
        assert_eq!(r.animated[0].param, Param::OriginY);
        assert_eq!(r.animated[0].from, 0.0);
    }

    #[test]
    fn origin_y_drives_value_without_bouncing() {
        let env = env();
        let mut d = Doodle::new(Shape::Pulse(Pulse), &env).unwrap();
        let r = on_parameter_changed(&mut d, &env, Param::OriginY, (-250.25).into()).unwrap();
        assert_eq!(
            r.params().collect::<Vec<_>>(),
            vec![Param::OriginY, Param::Value]
        );
        assert_eq!(d.base.value(Param::Value), Some(&ParamValue::Int(180)));
        // originY is not rewritten from the rounded value.
        assert_eq!(d.base.value(Param::OriginY), Some(&ParamValue::Float(-250.25)));
    }

    #[test]
    fn rejected_primary_leaves_values_alone() {
        let env = env();
        let mut d = Doodle::new(Shape::Lens(Lens), &env).unwrap();
        let before = d.base.values().clone();
        let err = on_parameter_changed(&mut d, &env, Param::Colour, "nope".into()).unwrap_err();
        assert!(matches!(err, EngineError::Param(ParamError::InvalidColour { .. })));
        assert_eq!(d.base.values(), &before);
    }

    #[test]
    fn scale_change_recomputes_origin_range_first() {
        let env = env();
        let mut d = Doodle::new(Shape::Lens(Lens), &env).unwrap();
        on_parameter_changed(&mut d, &env, Param::OriginX, 190.0.into()).unwrap();
        let r = on_parameter_changed(&mut d, &env, Param::ScaleX, 1.5.into()).unwrap();
        assert_eq!(r.value_of(Param::ScaleY), Some(&ParamValue::Float(1.5)));
        assert_eq!(r.value_of(Param::OriginX), Some(&ParamValue::Float(150.0)));
        assert_eq!(
            d.base.validator.range(Param::OriginY),
            Some(Lens::origin_range(1.5))
        );
    }

    #[test]
    fn unregistered_dependent_rolls_back_values_and_ranges() {
        let env = env();
        let mut base = DoodleBase::new(DoodleId::intern("Lens_0"), "Lens");
        let scale = ParameterDescriptor::simple(ParamType::Float, Range::new(0.5, 2.0));
        base.define(Param::ScaleX, scale.clone(), 1.0).unwrap();
        base.define(Param::ScaleY, scale, 1.0).unwrap();
        // originY is missing from this definition.
        base.define(
            Param::OriginX,
            ParameterDescriptor::simple(ParamType::Float, Lens::origin_range(1.0)),
            0.0,
        )
        .unwrap();
        let mut d = Doodle {
            base,
            shape: Shape::Lens(Lens),
        };
        let values = d.base.values().clone();

        let err = on_parameter_changed(&mut d, &env, Param::ScaleX, 1.5.into()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::UnregisteredParameter { .. })
        ));
        assert_eq!(d.base.values(), &values);
        assert_eq!(
            d.base.validator.range(Param::OriginX),
            Some(Lens::origin_range(1.0))
        );
    }

    #[test]
    fn merge_keeps_latest_values() {
        let mut a = Resolution::default();
        a.applied.push((Param::Arc, ParamValue::Float(1.0)));
        let mut b = Resolution::default();
        b.applied.push((Param::Arc, ParamValue::Float(2.0)));
        b.applied.push((Param::Rotation, ParamValue::Float(0.5)));
        b.clamped = true;
        a.merge(b);
        assert_eq!(a.value_of(Param::Arc), Some(&ParamValue::Float(2.0)));
        assert_eq!(a.applied.len(), 2);
        assert!(a.clamped);
    }

    #[test]
    fn shipped_shapes_pass_definition_check() {
        let env = env();
        for name in Shape::CLASS_NAMES {
            let d = Doodle::from_class_name(name, &env).unwrap();
            check_definition(&d, &env).unwrap();
        }
    }
}
