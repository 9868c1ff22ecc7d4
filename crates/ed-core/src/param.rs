//! Parameter identifiers, values, descriptors and the per-doodle validator.
//!
//! Every doodle owns one `ParameterValidator`. Each registered parameter has a
//! `ParameterDescriptor` saying what kind of parameter it is, how its raw
//! value is coerced, and which `Range` or list of values it must respect.
//! Validation clamps numbers silently and only rejects strings that are not
//! in their list (or not a colour).

use crate::error::{ConfigError, ParamError};
use crate::range::{AngleUnit, Range};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::fmt;

// ─── Identifiers ─────────────────────────────────────────────────────────

/// Every parameter name a doodle can carry.
///
/// Declaration order is the save order of the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Param {
    OriginX,
    OriginY,
    Radius,
    ApexX,
    ApexY,
    ScaleX,
    ScaleY,
    Arc,
    Rotation,
    Width,
    Height,
    Value,
    Grade,
    Type,
    Colour,
    Notes,
    ReadingX,
    ReadingY,
    Complete,
}

impl Param {
    /// Saved-parameter name, e.g. `originX`.
    pub const fn name(self) -> &'static str {
        match self {
            Param::OriginX => "originX",
            Param::OriginY => "originY",
            Param::Radius => "radius",
            Param::ApexX => "apexX",
            Param::ApexY => "apexY",
            Param::ScaleX => "scaleX",
            Param::ScaleY => "scaleY",
            Param::Arc => "arc",
            Param::Rotation => "rotation",
            Param::Width => "width",
            Param::Height => "height",
            Param::Value => "value",
            Param::Grade => "grade",
            Param::Type => "type",
            Param::Colour => "colour",
            Param::Notes => "notes",
            Param::ReadingX => "readingX",
            Param::ReadingY => "readingY",
            Param::Complete => "complete",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Values ──────────────────────────────────────────────────────────────

/// A parameter value. Always a plain JSON scalar so it survives persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

// ─── Descriptors ─────────────────────────────────────────────────────────

/// How a parameter relates to the doodle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Geometric field of the doodle itself (origin, scale, arc...).
    Simple,
    /// Computed from simple parameters and shown in the UI.
    Derived,
    /// Cached or free-form data. Type-coerced, never clamped.
    Other,
}

/// Primitive type used for coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Float,
    Bool,
    String,
    /// Angle in radians that wraps around the circle.
    Mod,
    FreeText,
    ColourString,
}

impl ParamType {
    fn is_numeric(self) -> bool {
        matches!(self, ParamType::Int | ParamType::Float | ParamType::Mod)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Bool => "bool",
            ParamType::String => "string",
            ParamType::Mod => "mod",
            ParamType::FreeText => "freeText",
            ParamType::ColourString => "colourString",
        };
        f.write_str(name)
    }
}

/// Validation rules for one named parameter of one doodle instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub kind: ParamKind,
    pub ty: ParamType,
    pub range: Option<Range>,
    pub list: SmallVec<[&'static str; 4]>,
    pub precision: Option<u32>,
    pub animate: bool,
    pub display: bool,
}

impl ParameterDescriptor {
    pub fn new(kind: ParamKind, ty: ParamType) -> Self {
        Self {
            kind,
            ty,
            range: None,
            list: SmallVec::new(),
            precision: None,
            animate: false,
            display: true,
        }
    }

    pub fn simple(ty: ParamType, range: Range) -> Self {
        Self::new(ParamKind::Simple, ty).with_range(range)
    }

    pub fn derived(ty: ParamType) -> Self {
        Self::new(ParamKind::Derived, ty)
    }

    pub fn other(ty: ParamType) -> Self {
        Self::new(ParamKind::Other, ty).hidden()
    }

    #[must_use]
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn with_list(mut self, list: &[&'static str]) -> Self {
        self.list = list.iter().copied().collect();
        self
    }

    #[must_use]
    pub fn with_precision(mut self, digits: u32) -> Self {
        self.precision = Some(digits);
        self
    }

    #[must_use]
    pub fn animated(mut self) -> Self {
        self.animate = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.display = false;
        self
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub value: ParamValue,
    /// The raw input was outside the range and has been pulled back in.
    pub clamped: bool,
}

// ─── Validator ───────────────────────────────────────────────────────────

/// Registry of descriptors for one doodle instance.
#[derive(Debug, Clone)]
pub struct ParameterValidator {
    class: &'static str,
    descriptors: BTreeMap<Param, ParameterDescriptor>,
}

impl ParameterValidator {
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            descriptors: BTreeMap::new(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Register a descriptor. Rejects definitions that could never validate.
    pub fn register(
        &mut self,
        param: Param,
        descriptor: ParameterDescriptor,
    ) -> Result<(), ConfigError> {
        let class = self.class;
        if descriptor.kind != ParamKind::Other
            && descriptor.ty.is_numeric()
            && descriptor.range.is_none()
        {
            return Err(ConfigError::MissingRange { class, param });
        }
        if descriptor.ty == ParamType::String && descriptor.list.is_empty() {
            return Err(ConfigError::MissingList { class, param });
        }
        self.descriptors.insert(param, descriptor);
        Ok(())
    }

    pub fn descriptor(&self, param: Param) -> Option<&ParameterDescriptor> {
        self.descriptors.get(&param)
    }

    /// Descriptor lookup that treats a missing entry as a definition bug.
    pub fn require(&self, param: Param) -> Result<&ParameterDescriptor, ConfigError> {
        self.descriptors
            .get(&param)
            .ok_or(ConfigError::UnregisteredParameter {
                class: self.class,
                param,
            })
    }

    pub fn is_registered(&self, param: Param) -> bool {
        self.descriptors.contains_key(&param)
    }

    /// The range owned by `param`, for in-place bound updates.
    pub fn range_mut(&mut self, param: Param) -> Option<&mut Range> {
        self.descriptors.get_mut(&param)?.range.as_mut()
    }

    pub fn range(&self, param: Param) -> Option<Range> {
        self.descriptors.get(&param)?.range
    }

    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.descriptors.keys().copied()
    }

    /// Coerce `raw` to the descriptor's type and pull it into range.
    pub fn validate(&self, param: Param, raw: &ParamValue) -> Result<Validated, ParamError> {
        let desc = self
            .descriptors
            .get(&param)
            .ok_or(ParamError::NotRegistered(param))?;
        let clamps = desc.kind != ParamKind::Other;

        match desc.ty {
            ParamType::Int => {
                let x = finite_number(param, desc.ty, raw)?.round();
                let v = match desc.range {
                    Some(r) if clamps => r.constrain(x),
                    _ => x,
                };
                Ok(Validated {
                    value: ParamValue::Int(v as i64),
                    clamped: v != x,
                })
            }
            ParamType::Float => {
                let x = finite_number(param, desc.ty, raw)?;
                let mut v = match desc.range {
                    Some(r) if clamps => r.constrain(x),
                    _ => x,
                };
                let clamped = v != x;
                if let Some(digits) = desc.precision {
                    v = round_to(v, digits);
                }
                Ok(Validated {
                    value: ParamValue::Float(v),
                    clamped,
                })
            }
            ParamType::Mod => {
                let x = finite_number(param, desc.ty, raw)?;
                let v = match desc.range {
                    Some(r) if clamps => r.constrain_to_angular_range(x, AngleUnit::Radians),
                    _ => x,
                };
                let clamped = v != x;
                let wrapped = v.rem_euclid(TAU);
                Ok(Validated {
                    value: ParamValue::Float(if wrapped >= TAU { 0.0 } else { wrapped }),
                    clamped,
                })
            }
            ParamType::Bool => Ok(Validated {
                value: ParamValue::Bool(coerce_bool(param, raw)?),
                clamped: false,
            }),
            ParamType::String => {
                let s = text(param, desc.ty, raw)?;
                if desc.list.iter().any(|item| *item == s) {
                    Ok(Validated {
                        value: ParamValue::Text(s.to_string()),
                        clamped: false,
                    })
                } else {
                    Err(ParamError::InvalidEnum {
                        param,
                        value: s.to_string(),
                    })
                }
            }
            ParamType::FreeText => Ok(Validated {
                value: ParamValue::Text(text(param, desc.ty, raw)?.to_string()),
                clamped: false,
            }),
            ParamType::ColourString => {
                let s = text(param, desc.ty, raw)?;
                let hex = s.strip_prefix('#').unwrap_or(s);
                if hex.len() == 8 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    Ok(Validated {
                        value: ParamValue::Text(hex.to_ascii_uppercase()),
                        clamped: false,
                    })
                } else {
                    Err(ParamError::InvalidColour {
                        param,
                        value: s.to_string(),
                    })
                }
            }
        }
    }

    /// Coerce `raw` to the descriptor's type without clamping.
    ///
    /// Used when restoring saved values, which are trusted as-is.
    pub fn coerce(&self, param: Param, raw: &ParamValue) -> Result<ParamValue, ParamError> {
        let desc = self
            .descriptors
            .get(&param)
            .ok_or(ParamError::NotRegistered(param))?;
        match desc.ty {
            ParamType::Int => Ok(ParamValue::Int(
                finite_number(param, desc.ty, raw)?.round() as i64,
            )),
            ParamType::Float | ParamType::Mod => {
                Ok(ParamValue::Float(finite_number(param, desc.ty, raw)?))
            }
            ParamType::Bool => Ok(ParamValue::Bool(coerce_bool(param, raw)?)),
            ParamType::String | ParamType::FreeText | ParamType::ColourString => {
                Ok(ParamValue::Text(text(param, desc.ty, raw)?.to_string()))
            }
        }
    }
}

fn finite_number(param: Param, expected: ParamType, raw: &ParamValue) -> Result<f64, ParamError> {
    let x = match raw {
        ParamValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParamError::TypeMismatch { param, expected })?,
        other => other
            .as_f64()
            .ok_or(ParamError::TypeMismatch { param, expected })?,
    };
    if x.is_finite() {
        Ok(x)
    } else {
        Err(ParamError::NonFinite(param))
    }
}

fn coerce_bool(param: Param, raw: &ParamValue) -> Result<bool, ParamError> {
    match raw {
        ParamValue::Bool(b) => Ok(*b),
        ParamValue::Int(i) => Ok(*i != 0),
        ParamValue::Float(f) => Ok(*f != 0.0),
        ParamValue::Text(s) => match s.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            _ => Err(ParamError::TypeMismatch {
                param,
                expected: ParamType::Bool,
            }),
        },
    }
}

fn text<'a>(param: Param, expected: ParamType, raw: &'a ParamValue) -> Result<&'a str, ParamError> {
    raw.as_str()
        .ok_or(ParamError::TypeMismatch { param, expected })
}

fn round_to(x: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (x * factor).round() / factor
}
