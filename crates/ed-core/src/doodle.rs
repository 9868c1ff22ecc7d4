//! Doodle base state and the shape capability trait.
//!
//! A `Doodle` is a `DoodleBase` (parameters, handles, squiggles, cached
//! transform) paired with a `Shape` variant that supplies the class-specific
//! behaviour through `DoodleShape`.

use crate::clock::{Quadrant, clock_hour};
use crate::config::{DoodleEnv, Eye};
use crate::error::{ConfigError, EngineError, ParamError};
use crate::handle::{
    ArcRule, Handle, HandleMode, HandleRange, arc_between, clamp_drag, perpendicular_arc,
};
use crate::id::DoodleId;
use crate::linked::LinkLink;
use crate::param::{Param, ParamValue, ParameterDescriptor, ParameterValidator, Validated};
use crate::point::Polar;
use crate::range::{AngleUnit, Range};
use crate::resolve::{self, Resolution};
use crate::shapes::Shape;
use crate::transform::DoodleTransform;
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;

/// Dependent `(parameter, value)` pairs returned by a shape.
pub type Dependents = SmallVec<[(Param, ParamValue); 4]>;

/// Parameters written directly by a drag step.
pub type Touched = SmallVec<[Param; 4]>;

/// Ordered free-drawn or multi-handle outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Squiggle {
    pub points: Vec<Point>,
    #[serde(default)]
    pub complete: bool,
}

// ─── Base state ──────────────────────────────────────────────────────────

/// State shared by every doodle class.
#[derive(Debug, Clone)]
pub struct DoodleBase {
    pub id: DoodleId,
    pub validator: ParameterValidator,
    values: BTreeMap<Param, ParamValue>,
    pub handles: SmallVec<[Handle; 4]>,
    /// Parallel to `handles`.
    pub handle_ranges: SmallVec<[HandleRange; 4]>,
    pub squiggles: Vec<Squiggle>,
    pub is_moveable: bool,
    pub is_rotatable: bool,
    pub is_selectable: bool,
    transform: DoodleTransform,
}

impl DoodleBase {
    pub fn new(id: DoodleId, class: &'static str) -> Self {
        Self {
            id,
            validator: ParameterValidator::new(class),
            values: BTreeMap::new(),
            handles: SmallVec::new(),
            handle_ranges: SmallVec::new(),
            squiggles: Vec::new(),
            is_moveable: false,
            is_rotatable: false,
            is_selectable: true,
            transform: DoodleTransform::default(),
        }
    }

    /// Register a parameter and store its validated initial value.
    pub fn define(
        &mut self,
        param: Param,
        descriptor: ParameterDescriptor,
        initial: impl Into<ParamValue>,
    ) -> Result<(), ConfigError> {
        self.validator.register(param, descriptor)?;
        let class = self.validator.class();
        let validated = self
            .validator
            .validate(param, &initial.into())
            .map_err(|_| ConfigError::InvalidDefault { class, param })?;
        self.values.insert(param, validated.value);
        Ok(())
    }

    pub fn class(&self) -> &'static str {
        self.validator.class()
    }

    pub fn value(&self, param: Param) -> Option<&ParamValue> {
        self.values.get(&param)
    }

    pub fn values(&self) -> &BTreeMap<Param, ParamValue> {
        &self.values
    }

    /// Numeric value, or `default` when absent or non-numeric.
    pub fn number_or(&self, param: Param, default: f64) -> f64 {
        self.values
            .get(&param)
            .and_then(ParamValue::as_f64)
            .unwrap_or(default)
    }

    pub fn number(&self, param: Param) -> f64 {
        self.number_or(param, 0.0)
    }

    pub fn text(&self, param: Param) -> Option<&str> {
        self.values.get(&param).and_then(ParamValue::as_str)
    }

    pub fn flag(&self, param: Param) -> bool {
        self.values
            .get(&param)
            .and_then(ParamValue::as_bool)
            .unwrap_or(false)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.number(Param::OriginX), self.number(Param::OriginY))
    }

    pub fn rotation(&self) -> f64 {
        self.number(Param::Rotation)
    }

    pub fn scale_x(&self) -> f64 {
        self.number_or(Param::ScaleX, 1.0)
    }

    pub fn scale_y(&self) -> f64 {
        self.number_or(Param::ScaleY, 1.0)
    }

    pub fn arc(&self) -> f64 {
        self.number(Param::Arc)
    }

    pub fn apex(&self) -> Point {
        Point::new(self.number(Param::ApexX), self.number(Param::ApexY))
    }

    /// Write without validation. Used for cache propagation and restores.
    pub fn set_unvalidated(&mut self, param: Param, value: ParamValue) {
        self.values.insert(param, value);
    }

    pub(crate) fn replace_values(&mut self, values: BTreeMap<Param, ParamValue>) {
        self.values = values;
    }

    pub fn transform(&self) -> &DoodleTransform {
        &self.transform
    }

    /// Add a handle with its drag constraint.
    pub fn push_handle(&mut self, handle: Handle, range: HandleRange) {
        self.handles.push(handle);
        self.handle_ranges.push(range);
    }

    pub fn squiggle_point(&self, squiggle: usize, index: usize) -> Option<Point> {
        self.squiggles.get(squiggle)?.points.get(index).copied()
    }
}

// ─── Shape capabilities ──────────────────────────────────────────────────

/// Class-specific behaviour of a doodle.
pub trait DoodleShape {
    fn class_name(&self) -> &'static str;

    /// Register parameters, set flags and create squiggles.
    fn set_parameter_defaults(
        &self,
        base: &mut DoodleBase,
        env: &DoodleEnv,
    ) -> Result<(), ConfigError>;

    /// Other parameters that must change when `param` becomes `value`.
    /// `base` already holds `value`.
    fn dependent_parameter_values(
        &self,
        _base: &DoodleBase,
        _env: &DoodleEnv,
        _param: Param,
        _value: &ParamValue,
    ) -> Dependents {
        Dependents::new()
    }

    /// New bounds for `dependent`'s range after `changed` was applied.
    fn dependent_range(
        &self,
        _base: &DoodleBase,
        _env: &DoodleEnv,
        _changed: Param,
        _dependent: Param,
    ) -> Option<Range> {
        None
    }

    /// Handles and their drag constraints, created once per doodle.
    fn handles(&self) -> SmallVec<[(Handle, HandleRange); 4]> {
        SmallVec::new()
    }

    /// Local position of handle `index` for the current parameters.
    fn handle_location(&self, _base: &DoodleBase, _index: usize) -> Point {
        Point::ZERO
    }

    fn arc_rule(&self) -> Option<ArcRule> {
        None
    }

    /// Closed outline in local coordinates, used for hit testing.
    fn boundary(&self, base: &DoodleBase) -> BezPath;

    fn description(&self, _base: &DoodleBase, _env: &DoodleEnv) -> String {
        String::new()
    }

    fn links(&self) -> &'static [LinkLink] {
        &[]
    }

    /// Flip local x when drawing a left eye.
    fn mirrors_with_laterality(&self) -> bool {
        false
    }
}

// ─── Doodle ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Doodle {
    pub base: DoodleBase,
    pub shape: Shape,
}

impl Doodle {
    /// A doodle named `{Class}_0`; `Drawing::insert_doodle` renumbers it on a clash.
    pub fn new(shape: Shape, env: &DoodleEnv) -> Result<Self, ConfigError> {
        let class = shape.as_shape().class_name();
        let mut base = DoodleBase::new(DoodleId::numbered(class, 0), class);
        shape.as_shape().set_parameter_defaults(&mut base, env)?;
        for (handle, range) in shape.as_shape().handles() {
            base.push_handle(handle, range);
        }
        let mut doodle = Self { base, shape };
        doodle.refresh_ranges(env);
        doodle.rebuild(env);
        Ok(doodle)
    }

    pub fn from_class_name(name: &str, env: &DoodleEnv) -> Result<Self, ConfigError> {
        let shape = Shape::from_class_name(name).ok_or_else(|| ConfigError::UnknownClass(name.to_string()))?;
        Self::new(shape, env)
    }

    pub fn id(&self) -> DoodleId {
        self.base.id
    }

    pub fn class_name(&self) -> &'static str {
        self.shape.as_shape().class_name()
    }

    pub fn links(&self) -> &'static [LinkLink] {
        self.shape.as_shape().links()
    }

    pub fn boundary(&self) -> BezPath {
        self.shape.as_shape().boundary(&self.base)
    }

    pub fn description(&self, env: &DoodleEnv) -> String {
        self.shape.as_shape().description(&self.base, env)
    }

    /// Validate, apply and resolve dependents, then rebuild the transform.
    pub fn set_parameter(
        &mut self,
        param: Param,
        value: impl Into<ParamValue>,
        env: &DoodleEnv,
    ) -> Result<Resolution, EngineError> {
        let resolution = resolve::on_parameter_changed(self, env, param, value.into())?;
        self.rebuild(env);
        Ok(resolution)
    }

    /// Validate and write one parameter without resolving dependents.
    pub fn set_simple(
        &mut self,
        param: Param,
        value: impl Into<ParamValue>,
    ) -> Result<Validated, ParamError> {
        let validated = self.base.validator.validate(param, &value.into())?;
        self.base
            .set_unvalidated(param, validated.value.clone());
        Ok(validated)
    }

    /// Recompute the transform and the plane position of every handle.
    pub fn rebuild(&mut self, env: &DoodleEnv) {
        let mirror = env.eye == Eye::Left && self.shape.as_shape().mirrors_with_laterality();
        self.base.transform = DoodleTransform::build(
            self.base.origin(),
            self.base.rotation(),
            self.base.scale_x(),
            self.base.scale_y(),
            mirror,
        );
        for i in 0..self.base.handles.len() {
            let local = self.shape.as_shape().handle_location(&self.base, i);
            let location = self.base.transform.transform_point(local);
            let handle = &mut self.base.handles[i];
            handle.local = local;
            handle.location = location;
        }
    }

    /// Bring every dependent range in line with the current values.
    ///
    /// Used after construction and loading, where values arrive without
    /// going through the resolver.
    pub fn refresh_ranges(&mut self, env: &DoodleEnv) {
        let shape = self.shape.as_shape();
        let params: Vec<Param> = self.base.validator.params().collect();
        for param in params {
            let Some(value) = self.base.value(param).cloned() else {
                continue;
            };
            for (dep, _) in shape.dependent_parameter_values(&self.base, env, param, &value) {
                if let Some(range) = shape.dependent_range(&self.base, env, param, dep)
                    && let Some(r) = self.base.validator.range_mut(dep)
                {
                    r.set_min_and_max(range.min, range.max);
                }
            }
        }
    }

    /// Move handle `index` towards `plane` and write the directly affected
    /// parameters. Dependents are left to `Drawing::finish_change`.
    pub fn drag_handle(
        &mut self,
        index: usize,
        plane: Point,
        env: &DoodleEnv,
    ) -> Result<Touched, ParamError> {
        let Some(handle) = self.base.handles.get(index).copied() else {
            return Ok(Touched::new());
        };
        let range = self.base.handle_ranges.get(index).copied().unwrap_or_default();
        let rel = plane - self.base.origin();

        let touched = match handle.mode {
            HandleMode::Arc => self.drag_arc(index, handle, range, plane, rel)?,
            HandleMode::Scale => {
                let unit = handle.local.polar_length();
                let length = match range {
                    HandleRange::Vector(vr) => vr.length.constrain(rel.hypot()),
                    _ => rel.hypot(),
                };
                if unit < f64::EPSILON {
                    log::debug!("{}: scale handle at origin, ignoring drag", self.base.id);
                    Touched::new()
                } else if length < f64::EPSILON {
                    log::debug!("{}: scale handle on origin, keeping scale", self.base.id);
                    Touched::new()
                } else {
                    let scale = range.constrain_scalar(length / unit);
                    self.set_simple(Param::ScaleX, scale)?;
                    self.set_simple(Param::ScaleY, scale)?;
                    smallvec![Param::ScaleX, Param::ScaleY]
                }
            }
            HandleMode::Rotate => {
                if rel.hypot() < f64::EPSILON {
                    log::debug!("{}: rotate handle on origin, keeping rotation", self.base.id);
                    Touched::new()
                } else {
                    let rotation = match range {
                        HandleRange::Vector(vr) => vr
                            .angle
                            .constrain_to_angular_range(rel.direction(), AngleUnit::Radians),
                        _ => rel.direction(),
                    } - handle.local.direction();
                    self.set_simple(Param::Rotation, rotation)?;
                    smallvec![Param::Rotation]
                }
            }
            HandleMode::Apex => match self.local_drag(handle, range, plane) {
                Some(p) => {
                    let mut touched = Touched::new();
                    for (param, v) in [(Param::ApexX, p.x), (Param::ApexY, p.y)] {
                        if self.base.validator.is_registered(param) {
                            self.set_simple(param, v)?;
                            touched.push(param);
                        }
                    }
                    touched
                }
                None => Touched::new(),
            },
            HandleMode::Handles => {
                if let Some(p) = self.local_drag(handle, range, plane)
                    && let Some(point) = self
                        .base
                        .squiggles
                        .first_mut()
                        .and_then(|s| s.points.get_mut(index))
                {
                    *point = p;
                }
                Touched::new()
            }
            HandleMode::Size => match self.local_drag(handle, range, plane) {
                Some(p) => {
                    self.set_simple(Param::Width, 2.0 * p.x.abs())?;
                    self.set_simple(Param::Height, 2.0 * p.y.abs())?;
                    smallvec![Param::Width, Param::Height]
                }
                None => Touched::new(),
            },
        };
        log::trace!("{}: handle {index} dragged, touched {touched:?}", self.base.id);
        self.rebuild(env);
        Ok(touched)
    }

    fn drag_arc(
        &mut self,
        index: usize,
        handle: Handle,
        range: HandleRange,
        plane: Point,
        rel: Vec2,
    ) -> Result<Touched, ParamError> {
        match self.shape.as_shape().arc_rule() {
            Some(ArcRule::BetweenHandles { start, end }) => {
                if rel.hypot() < f64::EPSILON {
                    log::debug!("{}: arc handle on origin, keeping arc", self.base.id);
                    return Ok(Touched::new());
                }
                let half = self.base.arc() / 2.0;
                let start_dir = Vec2::from_polars(1.0, self.base.rotation() - half);
                let end_dir = Vec2::from_polars(1.0, self.base.rotation() + half);
                let (raw_arc, anchored_at_start) = if index == end {
                    (arc_between(start_dir, rel), true)
                } else if index == start {
                    (arc_between(rel, end_dir), false)
                } else {
                    return Ok(Touched::new());
                };
                let arc = self
                    .set_simple(Param::Arc, raw_arc)?
                    .value
                    .as_f64()
                    .unwrap_or(raw_arc);
                let rotation = if anchored_at_start {
                    start_dir.direction() + arc / 2.0
                } else {
                    end_dir.direction() - arc / 2.0
                };
                self.set_simple(Param::Rotation, rotation)?;
                Ok(smallvec![Param::Arc, Param::Rotation])
            }
            Some(ArcRule::Perpendicular { radius }) => {
                let Some(p) = self.local_drag(handle, range, plane) else {
                    return Ok(Touched::new());
                };
                match perpendicular_arc(p.x, radius) {
                    Some(arc) => {
                        self.set_simple(Param::Arc, arc)?;
                        Ok(smallvec![Param::Arc])
                    }
                    None => {
                        log::debug!("{}: zero radius, keeping arc", self.base.id);
                        Ok(Touched::new())
                    }
                }
            }
            None => Ok(Touched::new()),
        }
    }

    /// Plane point → clamped local position for `handle`.
    fn local_drag(&self, handle: Handle, range: HandleRange, plane: Point) -> Option<Point> {
        let local = self.base.transform.inverse_transform_point(plane);
        if local.is_none() {
            log::debug!("{}: degenerate transform, ignoring drag", self.base.id);
        }
        local.map(|p| clamp_drag(&range, p, handle.local))
    }

    /// Translate by `delta` in plane units, clamped to the origin ranges.
    pub fn move_by(&mut self, delta: Vec2, env: &DoodleEnv) -> Result<Touched, ParamError> {
        if !self.base.is_moveable {
            return Ok(Touched::new());
        }
        let origin = self.base.origin() + delta;
        self.set_simple(Param::OriginX, origin.x)?;
        self.set_simple(Param::OriginY, origin.y)?;
        self.rebuild(env);
        Ok(smallvec![Param::OriginX, Param::OriginY])
    }

    /// Angle used for clock-hour and quadrant descriptions: the rotation of
    /// doodles that only rotate, otherwise the direction of the origin.
    pub fn position_angle(&self) -> f64 {
        if self.base.is_rotatable && !self.base.is_moveable {
            self.base.rotation()
        } else {
            self.base.origin().direction()
        }
    }

    pub fn clock_hour(&self) -> u8 {
        clock_hour(self.position_angle())
    }

    pub fn quadrant(&self, eye: Eye) -> Quadrant {
        Quadrant::from_direction(self.position_angle(), eye)
    }
}
