//! Error taxonomy for the constraint engine.
//!
//! Only definition mistakes are fatal (`ConfigError`). Everything a user can
//! provoke by dragging or typing is recoverable: out-of-range numbers are
//! clamped silently and never reach this module, invalid enum or colour
//! strings are rejected per assignment (`ParamError`).

use crate::id::DoodleId;
use crate::param::{Param, ParamType};
use thiserror::Error;

/// Malformed doodle definition or drawing configuration, caught at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{class}: numeric parameter `{param}` was registered without a range")]
    MissingRange { class: &'static str, param: Param },

    #[error("{class}: string parameter `{param}` was registered without a list of values")]
    MissingList { class: &'static str, param: Param },

    #[error("{class}: parameter `{param}` is referenced but was never registered")]
    UnregisteredParameter { class: &'static str, param: Param },

    #[error("{class}: default value for `{param}` does not validate")]
    InvalidDefault { class: &'static str, param: Param },

    #[error("unknown doodle class `{0}`")]
    UnknownClass(String),

    #[error("invalid drawing configuration: {0}")]
    InvalidConfig(String),
}

/// A single rejected assignment. The previous value stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("`{value}` is not an allowed value for `{param}`")]
    InvalidEnum { param: Param, value: String },

    #[error("`{value}` is not an RRGGBBAA colour for `{param}`")]
    InvalidColour { param: Param, value: String },

    #[error("`{param}` expects a {expected} value")]
    TypeMismatch { param: Param, expected: ParamType },

    #[error("`{0}` received a non-finite number")]
    NonFinite(Param),

    #[error("`{0}` is not registered on this doodle")]
    NotRegistered(Param),
}

/// Errors surfaced by drawing-level operations (`set_parameter`, drag end).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no doodle with id {0}")]
    UnknownDoodle(DoodleId),
}

/// Reading or writing the saved-parameter JSON.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed drawing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
